//! Small shared helpers with no dependencies on the rest of the crate.

pub mod extract_domain;

pub use extract_domain::{DomainParseError, extract_domain};
