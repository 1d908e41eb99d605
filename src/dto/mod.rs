pub mod auth;
pub mod businesses;
pub mod campaigns;
pub mod digital_contacts;
pub mod favorites;
pub mod products;
pub mod profile_image;
pub mod users;
