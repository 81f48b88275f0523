//! Build-time generator for a real-estate listing site backed by a headless
//! content-delivery GraphQL API.

pub mod config;
pub mod delivery;
pub mod models;
pub mod site;
