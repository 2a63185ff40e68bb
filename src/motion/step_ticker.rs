//! Step generation
//!
//! The `StepTicker` owns the real-time motor table: which actuator drives
//! each axis slot when a block is executed. It is read at execution time, so
//! a block queued before a rebind but executed after it would drive the new
//! actuator. The tool manager drains the queue before rebinding for that
//! reason.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::{AXIS_COUNT, ActuatorId, MotionBlock};

/// Executed blocks kept for inspection; older ones are dropped
pub const HISTORY_CAPACITY: usize = 256;

/// Record of a block after execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedBlock {
    pub target: [f32; 3],
    /// Actuator that drove each axis the block moved
    pub actuators: [Option<ActuatorId>; AXIS_COUNT],
}

#[derive(Debug)]
pub struct StepTicker {
    motors: Mutex<[ActuatorId; AXIS_COUNT]>,
    history: Mutex<VecDeque<ExecutedBlock>>,
}

impl StepTicker {
    /// Create a ticker with the given per-axis motors
    pub fn new(motors: [ActuatorId; AXIS_COUNT]) -> Self {
        Self {
            motors: Mutex::new(motors),
            history: Mutex::new(VecDeque::with_capacity(HISTORY_CAPACITY)),
        }
    }

    /// Motor currently driving an axis slot
    ///
    /// Panics if `slot` is not a primary axis.
    pub fn motor(&self, slot: usize) -> ActuatorId {
        self.motors.lock()[slot]
    }

    pub fn set_motor(&self, slot: usize, actuator: ActuatorId) {
        self.motors.lock()[slot] = actuator;
    }

    /// Execute a block against the current motor table
    pub fn execute(&self, block: &MotionBlock) {
        let motors = *self.motors.lock();
        let mut actuators = [None; AXIS_COUNT];
        for (slot, moved) in block.moved.iter().enumerate() {
            if *moved {
                actuators[slot] = Some(motors[slot]);
            }
        }
        log::trace!("Executed block to {:?} with {:?}", block.target, actuators);
        let mut history = self.history.lock();
        if history.len() == HISTORY_CAPACITY {
            history.pop_front();
        }
        history.push_back(ExecutedBlock {
            target: block.target,
            actuators,
        });
    }

    /// The most recent executed blocks, oldest first
    pub fn history(&self) -> Vec<ExecutedBlock> {
        self.history.lock().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker() -> StepTicker {
        StepTicker::new([ActuatorId(0), ActuatorId(1), ActuatorId(2)])
    }

    #[test]
    fn test_set_motor() {
        let t = ticker();
        assert_eq!(t.motor(0), ActuatorId(0));
        t.set_motor(0, ActuatorId(3));
        assert_eq!(t.motor(0), ActuatorId(3));
        assert_eq!(t.motor(1), ActuatorId(1));
    }

    #[test]
    fn test_execute_records_moved_axes_only() {
        let t = ticker();
        t.execute(&MotionBlock {
            target: [10.0, 0.0, 0.0],
            moved: [true, false, false],
        });
        let history = t.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].actuators, [Some(ActuatorId(0)), None, None]);
    }

    #[test]
    fn test_execute_reads_table_at_execution_time() {
        let t = ticker();
        let block = MotionBlock {
            target: [5.0, 0.0, 0.0],
            moved: [true, false, false],
        };
        t.execute(&block);
        t.set_motor(0, ActuatorId(4));
        t.execute(&block);
        let history = t.history();
        assert_eq!(history[0].actuators[0], Some(ActuatorId(0)));
        assert_eq!(history[1].actuators[0], Some(ActuatorId(4)));
    }

    #[test]
    fn test_history_is_bounded() {
        let t = ticker();
        for x in 0..HISTORY_CAPACITY + 10 {
            t.execute(&MotionBlock {
                target: [x as f32, 0.0, 0.0],
                moved: [true, false, false],
            });
        }
        let history = t.history();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history[0].target[0], 10.0);
        assert_eq!(history.last().unwrap().target[0], (HISTORY_CAPACITY + 9) as f32);
    }
}
