use chrono::{DateTime, SubsecRound, Utc};

pub mod business_service;
pub mod campaign_filter;
pub mod campaign_service;
pub mod campaign_sort;
pub mod category_service;
pub mod digital_contact_service;
pub mod favorite_aggregation;
pub mod favorite_service;
pub mod product_service;
pub mod profile_image_service;
pub mod timezone_service;
pub mod user_service;

/// Current time at the precision PostgreSQL stores, so a value handed to a
/// client compares equal to the one read back later.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
