//! Fan-out of cleanup runs to worker nodes.
//!
//! Every node runs the same request independently. A failure on one node is
//! logged against that node and never affects the others.

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cleaner::{Cleaner, CleanupRequest};
use crate::error::CleanupError;
use crate::report::RunReport;

/// A machine that can run a cleanup.
pub trait Node: Send + Sync {
    fn name(&self) -> &str;
    fn run_cleanup(&self, request: &CleanupRequest) -> Result<RunReport, CleanupError>;
}

/// The machine this process runs on.
pub struct LocalNode {
    name: String,
    cleaner: Cleaner,
}

impl LocalNode {
    pub fn new() -> Self {
        let name = sysinfo::System::host_name().unwrap_or_else(|| "localhost".to_string());
        Self {
            name,
            cleaner: Cleaner::local(),
        }
    }
}

impl Default for LocalNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for LocalNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn run_cleanup(&self, request: &CleanupRequest) -> Result<RunReport, CleanupError> {
        self.cleaner.run_cleanup(request)
    }
}

/// Result of one node's run.
#[derive(Debug)]
pub struct NodeOutcome {
    pub node: String,
    pub result: Result<RunReport, CleanupError>,
}

pub struct Dispatcher {
    nodes: Arc<Vec<Box<dyn Node>>>,
    in_flight: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(nodes: Vec<Box<dyn Node>>) -> Self {
        Self {
            nodes: Arc::new(nodes),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Run `request` on every node in parallel and wait for all of them.
    pub fn run(&self, request: &CleanupRequest) -> Vec<NodeOutcome> {
        fan_out(&self.nodes, request)
    }

    /// Start a round in the background without waiting for it.
    ///
    /// Returns `false` and does nothing while the previous background round
    /// is still running.
    pub fn spawn(&self, request: CleanupRequest) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::info!("Previous cleanup round still running, skipping");
            return false;
        }

        let nodes = Arc::clone(&self.nodes);
        let in_flight = Arc::clone(&self.in_flight);
        rayon::spawn(move || {
            fan_out(&nodes, &request);
            in_flight.store(false, Ordering::Release);
        });
        true
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

fn fan_out(nodes: &[Box<dyn Node>], request: &CleanupRequest) -> Vec<NodeOutcome> {
    nodes
        .par_iter()
        .map(|node| {
            tracing::debug!(node = node.name(), "Starting cleanup on node");
            let result = node.run_cleanup(request);
            match &result {
                Ok(report) => tracing::debug!(
                    node = node.name(),
                    removed = report.removed_count(),
                    "Finished cleanup on node"
                ),
                Err(e) => {
                    tracing::warn!(node = node.name(), error = %e, "Failed to run tmp cleaner")
                }
            }
            NodeOutcome {
                node: node.name().to_string(),
                result,
            }
        })
        .collect()
}
