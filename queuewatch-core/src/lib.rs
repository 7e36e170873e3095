//! Queuewatch Core
//!
//! Core types for the queuewatch monitoring client.
//!
//! This crate contains:
//! - Domain types: the normalized entities the monitor keeps (Job, StatusSnapshot, etc.)
//! - DTOs: wire payloads returned by the job-queue backend, decoded leniently

pub mod domain;
pub mod dto;
