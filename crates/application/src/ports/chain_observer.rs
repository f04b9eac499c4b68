//! Chain observer port - Progress callbacks for a running chain

use domain::{Endpoint, Stage};

/// Receives progress notifications from the chain driver
///
/// Both methods default to doing nothing.
pub trait ChainObserver: Send + Sync {
    /// Called before stage `position` (1-based) is dispatched
    fn stage_started(&self, _position: usize, _stage: &Stage, _endpoint: &Endpoint) {}

    /// Called after stage `position` returned its response
    fn stage_completed(&self, _position: usize, _stage: &Stage, _response: &str) {}
}
