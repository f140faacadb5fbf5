//! Domain layer containing business entities and logic.
//!
//! Defines the submission-run data model, the ports the infrastructure
//! layer implements, and the channel selection rule. Nothing here touches
//! the network.
//!
//! # Architecture
//!
//! - [`entities`] - Channels, quota tracking, run outcomes
//! - [`notifier`] - Port for the external URL submission call
//! - [`progress`] - Port for streaming interim run events
//! - [`pool`] - Configuration-ordered channel selection
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Quota accounting is a domain concern; the indexing client only submits
//! - Time (the current UTC day) is always passed in explicitly so logic
//!   stays testable

pub mod entities;
pub mod notifier;
pub mod pool;
pub mod progress;

#[cfg(test)]
pub use notifier::MockUrlNotifier;
