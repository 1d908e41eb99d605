pub mod businesses;
pub mod campaign_products;
pub mod campaigns;
pub mod categories;
pub mod digital_contacts;
pub mod favorites;
pub mod products;
pub mod timezones;

pub use businesses::Entity as Businesses;
pub use campaign_products::Entity as CampaignProducts;
pub use campaigns::Entity as Campaigns;
pub use categories::Entity as Categories;
pub use digital_contacts::Entity as DigitalContacts;
pub use favorites::Entity as Favorites;
pub use products::Entity as Products;
pub use timezones::Entity as Timezones;
