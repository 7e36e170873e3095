//! Data Transfer Objects for the backend HTTP API
//!
//! The backend keeps jobs and workers as flat string hashes, so payload fields
//! arrive in loose shapes. DTOs accept those shapes and convert them into
//! domain types at the boundary.

pub mod jobs;
pub mod lenient;
pub mod status;
