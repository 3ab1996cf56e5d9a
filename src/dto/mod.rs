//! View models shaped for the Tera templates.

use serde::Serialize;

pub mod admin;
pub mod hearings;
pub mod listings;
pub mod public;
pub mod team;

/// Option of a `<select>` or a filter link.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}
