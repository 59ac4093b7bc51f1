//! Repository layer: one zero-sized struct per table, every method takes
//! the pool or connection explicitly.

mod geolocation_repo;

pub use geolocation_repo::GeolocationRepo;
