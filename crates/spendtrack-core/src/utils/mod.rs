//! Utility functions shared by the auth flows and the shell.

pub mod validation;

pub use validation::validate_email;
