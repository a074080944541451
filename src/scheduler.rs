//! Simulated execution scheduler
//!
//! "Running" a node performs no real work: it flips the node to
//! `running`, sleeps a randomized delay on a spawned task, and applies a
//! randomized success/error outcome. A whole-pipeline run staggers every
//! node's start in store iteration order; edges are never consulted for
//! ordering, they are visual only.
//!
//! Completions are guarded by a generation stamp captured at schedule
//! time: if the user stops or resets the node (or deletes it) while the
//! timer is in flight, the completion observes a changed stamp and
//! discards its result instead of resurrecting a state the user already
//! changed. Each completion only writes its own node's record, under the
//! store lock, so concurrent node runs cannot corrupt shared state.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::RwLock;

use crate::events::{EventSink, PipelineEvent};
use crate::store::{ExecutionUpdate, SharedGraphStore};
use crate::types::{NodeStatus, PipelineStatus, OUTPUT_NOT_RUN};

/// Log line when a run starts
pub const LOG_RUN_STARTED: &str = "Execution started...";

/// Log line for a successful completion
pub const LOG_RUN_COMPLETED: &str = "Completed successfully.";

/// Log line for a simulated failure
pub const LOG_RUN_FAILED: &str = "Error: Tensor mismatch.";

/// Log line when the user stops a node
pub const LOG_STOPPED: &str = "Execution stopped by user.";

/// Log line after a reset
pub const LOG_RESET: &str = "Reset.";

/// Output text for a simulated failure
pub const OUTPUT_FAILED: &str = "Execution Failed";

/// Tunables for the simulated execution
///
/// `success_rate` must lie in `[0.0, 1.0]`; tests pin it to the bounds
/// for deterministic outcomes. `min_delay` must not exceed `max_delay`.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Shortest completion delay
    pub min_delay: Duration,
    /// Longest completion delay
    pub max_delay: Duration,
    /// Probability that a run ends in `success`
    pub success_rate: f64,
    /// Per-node start offset for pipeline runs
    pub stagger: Duration,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(2000),
            max_delay: Duration::from_millis(4000),
            success_rate: 0.8,
            stagger: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Default)]
struct PipelineRun {
    status: PipelineStatus,
    /// Bumped on every pipeline start/stop so a stale settle timer
    /// cannot end a later run early
    generation: u64,
}

/// Drives simulated node and pipeline execution against a shared store
#[derive(Clone)]
pub struct ExecutionScheduler {
    store: SharedGraphStore,
    sink: Arc<dyn EventSink>,
    config: ExecutionConfig,
    pipeline: Arc<RwLock<PipelineRun>>,
}

impl ExecutionScheduler {
    /// Create a scheduler over a shared store
    pub fn new(store: SharedGraphStore, config: ExecutionConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            store,
            sink,
            config,
            pipeline: Arc::new(RwLock::new(PipelineRun::default())),
        }
    }

    /// Current overall pipeline status
    pub async fn pipeline_status(&self) -> PipelineStatus {
        self.pipeline.read().await.status
    }

    /// Start a single node's simulated run
    ///
    /// No-op if the node is missing or already `running`. Otherwise the
    /// node synchronously enters `running` with its output cleared, and
    /// a completion is scheduled after a randomized delay. Exactly one
    /// of `success`/`error` is applied when the completion fires, unless
    /// an intervening stop/reset made it stale.
    pub async fn run_node(&self, node_id: &str) {
        let generation = {
            let mut store = self.store.write().await;
            match store.node(node_id) {
                None => return,
                Some(node) if node.status == NodeStatus::Running => return,
                Some(_) => {}
            }
            store.apply_execution_update(
                node_id,
                ExecutionUpdate {
                    status: Some(NodeStatus::Running),
                    output: Some(OUTPUT_NOT_RUN.to_string()),
                    log: Some(LOG_RUN_STARTED.to_string()),
                    ..Default::default()
                },
            );
            match store.node(node_id) {
                Some(node) => node.generation,
                None => return,
            }
        };
        let _ = self.sink.send(PipelineEvent::NodeStarted {
            node_id: node_id.to_string(),
        });

        let delay = self.draw_delay();
        let store = Arc::clone(&self.store);
        let sink = Arc::clone(&self.sink);
        let success_rate = self.config.success_rate;
        let node_id = node_id.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let applied = {
                let mut store = store.write().await;
                let current = store.node(&node_id).map(|n| (n.status, n.generation));
                if current != Some((NodeStatus::Running, generation)) {
                    // stale: stopped, reset, or deleted while in flight
                    None
                } else {
                    let success = rand::rng().random_bool(success_rate);
                    let (status, output, log) = if success {
                        (
                            NodeStatus::Success,
                            format!("Result: {:.4}", rand::rng().random_range(0.0..1.0)),
                            LOG_RUN_COMPLETED.to_string(),
                        )
                    } else {
                        (
                            NodeStatus::Error,
                            OUTPUT_FAILED.to_string(),
                            LOG_RUN_FAILED.to_string(),
                        )
                    };
                    store.apply_execution_update(
                        &node_id,
                        ExecutionUpdate {
                            status: Some(status),
                            output: Some(output),
                            log: Some(log),
                            ..Default::default()
                        },
                    );
                    Some(status)
                }
            };

            if let Some(status) = applied {
                let _ = sink.send(PipelineEvent::NodeFinished { node_id, status });
            }
        });
    }

    /// Force a node back to `idle`, whatever its current state
    ///
    /// The status write bumps the node's generation, so an in-flight
    /// completion scheduled before the stop discards its result.
    pub async fn stop_node(&self, node_id: &str) {
        {
            let mut store = self.store.write().await;
            if !store.contains(node_id) {
                return;
            }
            store.apply_execution_update(
                node_id,
                ExecutionUpdate {
                    status: Some(NodeStatus::Idle),
                    log: Some(LOG_STOPPED.to_string()),
                    ..Default::default()
                },
            );
        }
        let _ = self.sink.send(PipelineEvent::NodeStopped {
            node_id: node_id.to_string(),
        });
    }

    /// Run every node with staggered starts
    ///
    /// Nodes are scheduled in store iteration order, each start delayed
    /// by `index * stagger`; graph topology plays no part. The pipeline
    /// returns to `idle` after `count * stagger + max_delay`, which
    /// covers the last node's worst-case completion. No-op while a
    /// pipeline run is already in progress.
    pub async fn run_pipeline(&self) {
        let generation = {
            let mut run = self.pipeline.write().await;
            if run.status == PipelineStatus::Running {
                return;
            }
            run.status = PipelineStatus::Running;
            run.generation += 1;
            run.generation
        };

        let ids = self.store.read().await.node_ids();
        let _ = self.sink.send(PipelineEvent::PipelineStarted {
            node_count: ids.len(),
        });

        for (index, id) in ids.iter().cloned().enumerate() {
            let scheduler = self.clone();
            let start_after = self.config.stagger * index as u32;
            tokio::spawn(async move {
                tokio::time::sleep(start_after).await;
                scheduler.run_node(&id).await;
            });
        }

        let settle = self.config.stagger * ids.len() as u32 + self.config.max_delay;
        let pipeline = Arc::clone(&self.pipeline);
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            let mut run = pipeline.write().await;
            if run.generation != generation {
                return;
            }
            run.status = PipelineStatus::Idle;
            drop(run);
            let _ = sink.send(PipelineEvent::PipelineSettled);
        });
    }

    /// Stop the pipeline and every node immediately
    pub async fn stop_pipeline(&self) {
        {
            let mut run = self.pipeline.write().await;
            run.status = PipelineStatus::Idle;
            run.generation += 1;
        }
        let _ = self.sink.send(PipelineEvent::PipelineStopped);

        let ids = self.store.read().await.node_ids();
        for id in ids {
            self.stop_node(&id).await;
        }
    }

    /// Force every node to its neutral state
    ///
    /// Status `idle`, output and log cleared to placeholders. In-flight
    /// completions become stale via the same generation rule as
    /// [`Self::stop_node`].
    pub async fn reset_pipeline(&self) {
        {
            let mut store = self.store.write().await;
            let ids = store.node_ids();
            for id in ids {
                store.apply_execution_update(
                    &id,
                    ExecutionUpdate {
                        status: Some(NodeStatus::Idle),
                        output: Some(OUTPUT_NOT_RUN.to_string()),
                        log: Some(LOG_RESET.to_string()),
                        ..Default::default()
                    },
                );
            }
        }
        let _ = self.sink.send(PipelineEvent::PipelineReset);
    }

    fn draw_delay(&self) -> Duration {
        let min = self.config.min_delay.as_millis() as u64;
        let max = self.config.max_delay.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VecEventSink;
    use crate::store::GraphStore;

    fn test_config(delay_ms: u64, success_rate: f64) -> ExecutionConfig {
        ExecutionConfig {
            min_delay: Duration::from_millis(delay_ms),
            max_delay: Duration::from_millis(delay_ms),
            success_rate,
            stagger: Duration::from_millis(5),
        }
    }

    fn demo_scheduler(config: ExecutionConfig) -> (ExecutionScheduler, Arc<VecEventSink>) {
        let sink = Arc::new(VecEventSink::new());
        let store = GraphStore::demo_pipeline().into_shared();
        let scheduler = ExecutionScheduler::new(store, config, sink.clone());
        (scheduler, sink)
    }

    fn started_count(sink: &VecEventSink, node_id: &str) -> usize {
        sink.events()
            .iter()
            .filter(|e| matches!(e, PipelineEvent::NodeStarted { node_id: id } if id == node_id))
            .count()
    }

    async fn node_status(scheduler: &ExecutionScheduler, node_id: &str) -> NodeStatus {
        scheduler.store.read().await.node(node_id).unwrap().status
    }

    #[tokio::test]
    async fn test_run_node_enters_running_synchronously() {
        let (scheduler, sink) = demo_scheduler(test_config(200, 1.0));

        scheduler.run_node("node-1").await;

        assert_eq!(node_status(&scheduler, "node-1").await, NodeStatus::Running);
        let node = scheduler.store.read().await.node("node-1").cloned().unwrap();
        assert_eq!(node.output, OUTPUT_NOT_RUN);
        assert_eq!(node.log, LOG_RUN_STARTED);
        assert_eq!(started_count(&sink, "node-1"), 1);
    }

    #[tokio::test]
    async fn test_run_node_reaches_success() {
        let (scheduler, sink) = demo_scheduler(test_config(20, 1.0));

        scheduler.run_node("node-1").await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        let node = scheduler.store.read().await.node("node-1").cloned().unwrap();
        assert_eq!(node.status, NodeStatus::Success);
        assert!(node.output.starts_with("Result: "));
        assert_eq!(node.log, LOG_RUN_COMPLETED);
        assert!(sink.events().iter().any(|e| matches!(
            e,
            PipelineEvent::NodeFinished { status: NodeStatus::Success, .. }
        )));
    }

    #[tokio::test]
    async fn test_run_node_reaches_error() {
        let (scheduler, _sink) = demo_scheduler(test_config(20, 0.0));

        scheduler.run_node("node-1").await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        let node = scheduler.store.read().await.node("node-1").cloned().unwrap();
        assert_eq!(node.status, NodeStatus::Error);
        assert_eq!(node.output, OUTPUT_FAILED);
        assert_eq!(node.log, LOG_RUN_FAILED);
    }

    #[tokio::test]
    async fn test_run_node_double_start_is_noop() {
        let (scheduler, sink) = demo_scheduler(test_config(200, 1.0));

        scheduler.run_node("node-1").await;
        scheduler.run_node("node-1").await;

        assert_eq!(started_count(&sink, "node-1"), 1);
    }

    #[tokio::test]
    async fn test_run_missing_node_is_noop() {
        let (scheduler, sink) = demo_scheduler(test_config(20, 1.0));

        scheduler.run_node("no-such-node").await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_stop_discards_stale_completion() {
        let (scheduler, sink) = demo_scheduler(test_config(150, 1.0));

        scheduler.run_node("node-1").await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.stop_node("node-1").await;

        // let the original completion timer elapse
        tokio::time::sleep(Duration::from_millis(400)).await;

        let node = scheduler.store.read().await.node("node-1").cloned().unwrap();
        assert_eq!(node.status, NodeStatus::Idle);
        assert_eq!(node.log, LOG_STOPPED);
        assert!(!sink
            .events()
            .iter()
            .any(|e| matches!(e, PipelineEvent::NodeFinished { .. })));
    }

    #[tokio::test]
    async fn test_reset_discards_stale_completion() {
        let (scheduler, _sink) = demo_scheduler(test_config(150, 1.0));

        scheduler.run_node("node-1").await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        scheduler.reset_pipeline().await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        let node = scheduler.store.read().await.node("node-1").cloned().unwrap();
        assert_eq!(node.status, NodeStatus::Idle);
        assert_eq!(node.output, OUTPUT_NOT_RUN);
        assert_eq!(node.log, LOG_RESET);
    }

    #[tokio::test]
    async fn test_stop_node_is_unconditional() {
        let (scheduler, _sink) = demo_scheduler(test_config(20, 1.0));

        // stopping an idle node still records the stop
        scheduler.stop_node("node-2").await;

        let node = scheduler.store.read().await.node("node-2").cloned().unwrap();
        assert_eq!(node.status, NodeStatus::Idle);
        assert_eq!(node.log, LOG_STOPPED);
    }

    #[tokio::test]
    async fn test_pipeline_diamond_runs_every_node_once() {
        let (scheduler, sink) = demo_scheduler(test_config(20, 0.5));

        scheduler.run_pipeline().await;
        assert_eq!(scheduler.pipeline_status().await, PipelineStatus::Running);

        // 4 * 5ms stagger + 20ms delay, with a wide margin
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(scheduler.pipeline_status().await, PipelineStatus::Idle);
        let store = scheduler.store.read().await;
        for node in store.nodes() {
            assert!(
                matches!(node.status, NodeStatus::Success | NodeStatus::Error),
                "{} still {:?}",
                node.id,
                node.status
            );
            assert_eq!(started_count(&sink, &node.id), 1);
        }
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, PipelineEvent::PipelineSettled)));
    }

    #[tokio::test]
    async fn test_run_pipeline_double_start_is_noop() {
        let (scheduler, sink) = demo_scheduler(test_config(100, 1.0));

        scheduler.run_pipeline().await;
        scheduler.run_pipeline().await;

        let starts = sink
            .events()
            .iter()
            .filter(|e| matches!(e, PipelineEvent::PipelineStarted { .. }))
            .count();
        assert_eq!(starts, 1);
    }

    #[tokio::test]
    async fn test_stop_pipeline_idles_everything() {
        let (scheduler, sink) = demo_scheduler(test_config(300, 1.0));

        scheduler.run_pipeline().await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        scheduler.stop_pipeline().await;

        assert_eq!(scheduler.pipeline_status().await, PipelineStatus::Idle);

        // even after every in-flight timer has elapsed, nothing revives
        tokio::time::sleep(Duration::from_millis(600)).await;
        let store = scheduler.store.read().await;
        for node in store.nodes() {
            assert_eq!(node.status, NodeStatus::Idle);
            assert_eq!(node.log, LOG_STOPPED);
        }
        drop(store);
        assert!(!sink
            .events()
            .iter()
            .any(|e| matches!(e, PipelineEvent::NodeFinished { .. })));
    }
}
