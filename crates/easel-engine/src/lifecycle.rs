//! Resource lifecycle state machine.
//!
//! Every resource a painter registers must be materialized asynchronously
//! on the client; the server-side handle walks these states as the client
//! reports progress.

use tracing::error;

use crate::resources::ResourceId;

/// Client-side materialization progress. States are strictly ordered;
/// `ResourceError` and `Ready` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    /// Setup command not yet handed to the batcher.
    #[default]
    PendingTransmission,
    /// Setup command queued for transmission to the client.
    TransmissionQueued,
    /// Client acknowledged and began handling the resource.
    ProcessedByClient,
    /// Client could not materialize the resource.
    ResourceError,
    /// Resource is usable on the client.
    Ready,
}

/// State holder for one registered resource.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Advance toward `next`. A target at or below the current state is a
    /// protocol anomaly: it is logged but the assignment still happens, so
    /// a client that re-reports an earlier phase stays visible in the logs
    /// without the server desynchronizing from it.
    pub fn advance(&mut self, id: ResourceId, next: LifecycleState) {
        if next <= self.state {
            error!(id = %id, from = ?self.state, to = ?next, "resource state regressing");
        }
        self.state = next;
    }

    pub fn is_ready(&self) -> bool {
        self.state == LifecycleState::Ready
    }

    pub fn is_resource_error(&self) -> bool {
        self.state == LifecycleState::ResourceError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_states_are_ordered() {
        assert!(LifecycleState::PendingTransmission < LifecycleState::TransmissionQueued);
        assert!(LifecycleState::TransmissionQueued < LifecycleState::ProcessedByClient);
        assert!(LifecycleState::ProcessedByClient < LifecycleState::ResourceError);
        assert!(LifecycleState::ResourceError < LifecycleState::Ready);
    }

    #[test]
    fn test_initial_state_is_not_terminal() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::PendingTransmission);
        assert!(!lifecycle.is_ready());
        assert!(!lifecycle.is_resource_error());
    }

    #[test]
    fn test_normal_progression() {
        let id = Uuid::new_v4();
        let mut lifecycle = Lifecycle::new();
        lifecycle.advance(id, LifecycleState::TransmissionQueued);
        lifecycle.advance(id, LifecycleState::ProcessedByClient);
        lifecycle.advance(id, LifecycleState::Ready);
        assert!(lifecycle.is_ready());
        assert!(!lifecycle.is_resource_error());
    }

    #[test]
    fn test_error_and_ready_are_exclusive() {
        let id = Uuid::new_v4();
        let mut lifecycle = Lifecycle::new();
        lifecycle.advance(id, LifecycleState::TransmissionQueued);
        lifecycle.advance(id, LifecycleState::ResourceError);
        assert!(lifecycle.is_resource_error());
        assert!(!lifecycle.is_ready());
    }

    // A regression is logged as an anomaly but the assignment still
    // happens: the client's last report wins.
    #[test]
    fn test_regression_still_assigns() {
        let id = Uuid::new_v4();
        let mut lifecycle = Lifecycle::new();
        lifecycle.advance(id, LifecycleState::Ready);
        lifecycle.advance(id, LifecycleState::ResourceError);
        assert!(lifecycle.is_resource_error());
        assert!(!lifecycle.is_ready());
    }
}
