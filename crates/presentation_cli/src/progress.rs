//! Stage progress printed to stdout

use application::ChainObserver;
use domain::{Endpoint, Stage};

/// Prints each stage header and response as the chain runs
#[derive(Debug, Default)]
pub struct StdoutProgress;

/// Header line printed before a stage is dispatched
pub fn stage_header(position: usize, stage: &Stage, endpoint: &Endpoint) -> String {
    format!("[Step {position}] Running {} via {endpoint}...", stage.model())
}

impl ChainObserver for StdoutProgress {
    fn stage_started(&self, position: usize, stage: &Stage, endpoint: &Endpoint) {
        println!("\n{}", stage_header(position, stage, endpoint));
    }

    fn stage_completed(&self, _position: usize, _stage: &Stage, response: &str) {
        println!("--- Response ---");
        println!("{response}");
    }
}
