//! Delivery targets for lab alerts.

pub mod teams;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::events::NotifyEvent;

/// A destination that lab alerts can be posted to.
///
/// Implementations are shared across delivery tasks, so they must be
/// `Send + Sync` and must not hold per-request state.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Identifier used in log fields and in `notify_and_wait` results.
    fn name(&self) -> &'static str;

    /// False when the destination has no connector URL.
    fn enabled(&self) -> bool;

    /// Post one event.
    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError>;
}
