//! # API Route Modules
//!
//! - `issue`: the badge claim endpoint used by course pages.
//! - `catalog`: catalog listing and cache refresh.
//! - `assertions`: hosting of issued assertion documents.

pub mod assertions;
pub mod catalog;
pub mod issue;
