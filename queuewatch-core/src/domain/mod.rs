//! Core domain types
//!
//! These types are what the monitor stores and hands to the presentation layer.
//! Everything here is already normalized: state labels are canonical enums and
//! numeric fields are real integers regardless of how the backend encoded them.

pub mod job;
pub mod status;
