//! Core library for spendtrack, a client for the expense-tracker backend.
//!
//! - `api`: endpoint registry and HTTP client
//! - `auth`: durable token storage and the shared session context
//! - `flow`: login and signup form state machines
//! - `routes`: the static route table
//! - `notify`: toast notifications
//! - `config`: configuration loading

pub mod api;
pub mod auth;
pub mod config;
pub mod flow;
pub mod models;
pub mod notify;
pub mod routes;
pub mod utils;
