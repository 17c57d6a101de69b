pub mod location_cache;
pub mod sql;
