//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod cta_banner_repo;

pub use cta_banner_repo::CtaBannerRepo;
