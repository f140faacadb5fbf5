//! Chat front end: menu flows, message texts and update routing.
//!
//! # Modules
//!
//! - [`dialogue`] - Per-chat pending-action state
//! - [`keyboards`] - Menu layouts and callback payloads
//! - [`messages`] - All user-facing texts
//! - [`handlers`] - Conversation logic over the [`crate::infrastructure::telegram::ChatApi`] trait
//! - [`dispatcher`] - Update routing and error containment

pub mod dialogue;
pub mod dispatcher;
pub mod handlers;
pub mod keyboards;
pub mod messages;

pub use dispatcher::Dispatcher;
pub use handlers::BotHandlers;
