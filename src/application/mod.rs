//! Application layer orchestrating domain operations.
//!
//! # Available Services
//!
//! - [`services::SubmissionService`] - Quota-gated batch submission
//! - [`services::RunService`] - Full enumerate-select-submit runs

pub mod services;
