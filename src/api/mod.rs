pub mod endpoints;
pub mod geocode;
