//! Motion queue
//!
//! The `Conveyor` accepts motion blocks from the cooperative command side
//! and hands them to an executor task that runs them on the `StepTicker`.
//! A watch channel tracks the number of blocks not yet executed; draining
//! waits for it to reach zero.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use super::{AXIS_COUNT, StepTicker};

/// A queued move in machine coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct MotionBlock {
    pub target: [f32; 3],
    /// Axes this block moves
    pub moved: [bool; AXIS_COUNT],
}

#[derive(Debug)]
pub struct Conveyor {
    tx: mpsc::UnboundedSender<MotionBlock>,
    pending: Arc<watch::Sender<usize>>,
}

impl Conveyor {
    /// Create the queue and spawn its executor task.
    ///
    /// Must be called from within a tokio runtime. Each block takes
    /// `block_time` to execute.
    pub fn new(step_ticker: Arc<StepTicker>, block_time: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<MotionBlock>();
        let (pending, _) = watch::channel(0usize);
        let pending = Arc::new(pending);

        let executor_pending = Arc::clone(&pending);
        tokio::spawn(async move {
            while let Some(block) = rx.recv().await {
                if !block_time.is_zero() {
                    tokio::time::sleep(block_time).await;
                }
                step_ticker.execute(&block);
                executor_pending.send_modify(|n| *n = n.saturating_sub(1));
            }
            log::debug!("Motion executor stopped");
        });

        Self { tx, pending }
    }

    /// Queue a block for execution
    pub fn queue(&self, block: MotionBlock) {
        self.pending.send_modify(|n| *n += 1);
        if self.tx.send(block).is_err() {
            self.pending.send_modify(|n| *n = n.saturating_sub(1));
            log::error!("Motion executor is gone, block dropped");
        }
    }

    /// Number of queued blocks not yet executed
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Wait until every queued block has executed
    pub async fn wait_for_idle(&self) {
        let mut rx = self.pending.subscribe();
        if rx.wait_for(|n| *n == 0).await.is_err() {
            log::error!("Motion queue closed while draining");
        }
    }
}
