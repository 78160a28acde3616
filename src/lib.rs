//! Museum exhibit catalog client.
//!
//! Browses a paginated, filterable exhibit catalog served over HTTP and
//! manages a signed-in user's personal collections.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod logging;
pub mod render;
