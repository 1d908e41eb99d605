//! Campaign list filters parsed from loosely-typed query parameters.
//!
//! Every filter has a current key and a legacy key still sent by older
//! clients. The current key wins when it is present and non-blank.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Campaign,
    validation::NAME_MAX_LEN,
};

pub type QueryMap = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignFilter {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub active: Option<bool>,
    pub start_from: Option<DateTime<Utc>>,
    pub start_to: Option<DateTime<Utc>>,
    pub end_from: Option<DateTime<Utc>>,
    pub end_to: Option<DateTime<Utc>>,
}

impl CampaignFilter {
    pub fn from_params(params: &QueryMap) -> AppResult<Self> {
        let filter = Self {
            name: parse_name(params)?,
            category_id: parse_uuid(params, "category_fk", "category_id")?,
            business_id: parse_uuid(params, "business_fk", "business_id")?,
            active: parse_active(params)?,
            start_from: parse_instant(params, "start_from", "start_date_from")?,
            start_to: parse_instant(params, "start_to", "start_date_to")?,
            end_from: parse_instant(params, "end_from", "end_date_from")?,
            end_to: parse_instant(params, "end_to", "end_date_to")?,
        };
        validate_range("start", filter.start_from, filter.start_to)?;
        validate_range("end", filter.end_from, filter.end_to)?;
        Ok(filter)
    }

    pub fn matches(&self, campaign: &Campaign) -> bool {
        if let Some(name) = &self.name {
            if !campaign
                .name
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }
        self.category_id.is_none_or(|id| campaign.category_id == id)
            && self.business_id.is_none_or(|id| campaign.business_id == id)
            && self.active.is_none_or(|active| campaign.active == active)
            && self.start_from.is_none_or(|from| campaign.start_date >= from)
            && self.start_to.is_none_or(|to| campaign.start_date <= to)
            && self.end_from.is_none_or(|from| campaign.end_date >= from)
            && self.end_to.is_none_or(|to| campaign.end_date <= to)
    }
}

fn pick<'a>(params: &'a QueryMap, current: &str, legacy: &str) -> Option<&'a str> {
    let non_blank = |key: &str| {
        params
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };
    non_blank(current).or_else(|| non_blank(legacy))
}

pub fn parse_name(params: &QueryMap) -> AppResult<Option<String>> {
    let Some(name) = pick(params, "name", "q") else {
        return Ok(None);
    };
    if name.chars().count() > NAME_MAX_LEN {
        return Err(AppError::bad_request(format!(
            "name filter must be at most {NAME_MAX_LEN} characters"
        )));
    }
    Ok(Some(name.to_string()))
}

pub fn parse_uuid(params: &QueryMap, current: &str, legacy: &str) -> AppResult<Option<Uuid>> {
    pick(params, current, legacy)
        .map(|raw| {
            Uuid::parse_str(raw)
                .map_err(|_| AppError::bad_request(format!("{current} must be a valid UUID")))
        })
        .transpose()
}

/// Absent or blank means "no filter", never `false`.
pub fn parse_active(params: &QueryMap) -> AppResult<Option<bool>> {
    let Some(raw) = pick(params, "active", "is_active") else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(AppError::bad_request("active must be true or false"))
    }
}

pub fn parse_instant(
    params: &QueryMap,
    current: &str,
    legacy: &str,
) -> AppResult<Option<DateTime<Utc>>> {
    pick(params, current, legacy)
        .map(|raw| {
            parse_datetime(raw).ok_or_else(|| {
                AppError::bad_request(format!("{current} must be an ISO-8601 date-time"))
            })
        })
        .transpose()
}

/// RFC 3339 instants and offset date-times, or zone-less local date-times
/// read as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn validate_range(
    label: &str,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> AppResult<()> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(AppError::bad_request(format!(
            "{label}_from must not be after {label}_to"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(pairs: &[(&str, &str)]) -> QueryMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn name_accepts_current_and_legacy_keys() {
        assert_eq!(parse_name(&params(&[("q", "X")])).unwrap(), Some("X".into()));
        assert_eq!(parse_name(&params(&[("name", "X")])).unwrap(), Some("X".into()));
        assert_eq!(
            parse_name(&params(&[("name", "new"), ("q", "old")])).unwrap(),
            Some("new".into())
        );
        assert_eq!(
            parse_name(&params(&[("name", "  "), ("q", "old")])).unwrap(),
            Some("old".into())
        );
    }

    #[test]
    fn name_longer_than_limit_is_rejected() {
        let long = "a".repeat(121);
        let err = parse_name(&params(&[("name", &long)])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let exact = "a".repeat(120);
        assert!(parse_name(&params(&[("name", &exact)])).unwrap().is_some());
    }

    #[test]
    fn uuid_filters_prefer_fk_keys() {
        let current = Uuid::new_v4();
        let legacy = Uuid::new_v4();
        let map = params(&[
            ("category_fk", &current.to_string()),
            ("category_id", &legacy.to_string()),
        ]);
        assert_eq!(
            parse_uuid(&map, "category_fk", "category_id").unwrap(),
            Some(current)
        );

        let map = params(&[("business_id", &legacy.to_string())]);
        assert_eq!(
            parse_uuid(&map, "business_fk", "business_id").unwrap(),
            Some(legacy)
        );
        assert_eq!(parse_uuid(&params(&[]), "business_fk", "business_id").unwrap(), None);
    }

    #[test]
    fn malformed_uuid_is_rejected() {
        let map = params(&[("category_fk", "not-a-uuid")]);
        assert!(matches!(
            parse_uuid(&map, "category_fk", "category_id"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn active_is_case_insensitive_and_optional() {
        assert_eq!(parse_active(&params(&[("active", "TRUE")])).unwrap(), Some(true));
        assert_eq!(parse_active(&params(&[("active", "False")])).unwrap(), Some(false));
        assert_eq!(parse_active(&params(&[])).unwrap(), None);
        assert_eq!(parse_active(&params(&[("active", "")])).unwrap(), None);
        assert!(parse_active(&params(&[("active", "yes")])).is_err());
    }

    #[test]
    fn datetimes_accept_instant_offset_and_local_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_datetime("2025-01-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("2025-01-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_datetime("2025-01-01T10:00:00"), Some(expected));
        assert_eq!(parse_datetime("2025-01-01T10:00"), Some(expected));
        assert_eq!(parse_datetime("2025-01-01T10:00:00.000"), Some(expected));
        assert_eq!(parse_datetime("01/01/2025"), None);
    }

    #[test]
    fn unparseable_datetime_is_rejected() {
        let map = params(&[("start_from", "tomorrow")]);
        assert!(CampaignFilter::from_params(&map).is_err());
    }

    #[test]
    fn inverted_ranges_are_rejected_independently() {
        let map = params(&[
            ("start_from", "2025-02-01T00:00:00Z"),
            ("start_to", "2025-01-01T00:00:00Z"),
        ]);
        assert!(CampaignFilter::from_params(&map).is_err());

        let map = params(&[
            ("end_date_from", "2025-02-01T00:00:00Z"),
            ("end_date_to", "2025-01-01T00:00:00Z"),
        ]);
        assert!(CampaignFilter::from_params(&map).is_err());

        // start_from after end_to is a different range and is allowed
        let map = params(&[
            ("start_from", "2025-02-01T00:00:00Z"),
            ("end_to", "2025-01-01T00:00:00Z"),
        ]);
        assert!(CampaignFilter::from_params(&map).is_ok());
    }

    #[test]
    fn filter_matches_campaign_fields() {
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            name: "Summer Sale".into(),
            description: None,
            start_date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 8, 31, 0, 0, 0).unwrap(),
            category_id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            active: true,
            created_at: now,
            last_update: now,
        };

        let filter = CampaignFilter {
            name: Some("summer".into()),
            active: Some(true),
            start_from: Some(Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(filter.matches(&campaign));

        let filter = CampaignFilter {
            business_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!filter.matches(&campaign));

        let filter = CampaignFilter {
            end_to: Some(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(!filter.matches(&campaign));
    }
}
