//! Processing hooks for verified Notion events.

pub mod events;

pub use events::{dispatch_event, Ack, HandlerError};
