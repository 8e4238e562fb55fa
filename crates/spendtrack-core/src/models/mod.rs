//! Data models exchanged with the expense-tracker backend.
//!
//! - `User`: the profile record returned on login, opaque to the client
//! - `LoginRequest`, `LoginResponse`: payloads for `POST /login`
//! - `RegisterRequest`: payload for `POST /register`

pub mod auth;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use user::User;
