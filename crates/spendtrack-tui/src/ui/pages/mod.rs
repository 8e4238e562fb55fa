//! Page content for each route.

pub mod auth;
pub mod overview;
