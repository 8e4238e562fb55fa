//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, toasts and overlays
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling
//! - `pages`: per-route page content (auth forms, ledger pages)

pub mod input;
pub mod pages;
pub mod render;
pub mod styles;
