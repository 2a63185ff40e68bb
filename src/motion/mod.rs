//! Motion subsystem boundary
//!
//! The tool manager only sees motion through `MotionControl`: a drain
//! barrier, the ordinary command intake, modal state save/restore, the
//! global tool offset and the per-axis actuator binding. `Robot` is the
//! concrete implementation, backed by the `Conveyor` queue and the
//! asynchronous `StepTicker` executor.

mod actuator;
mod conveyor;
mod modal;
mod robot;
mod step_ticker;

use async_trait::async_trait;

use crate::command::Command;
use crate::tool::Offset;

pub use actuator::{AXIS_COUNT, ActuatorId, ActuatorTable, axis_letter};
pub use conveyor::{Conveyor, MotionBlock};
pub use modal::{DistanceMode, ModalScope, ModalState};
pub use robot::Robot;
pub use step_ticker::{ExecutedBlock, HISTORY_CAPACITY, StepTicker};

/// Everything the tool manager needs from the motion subsystem
#[async_trait]
pub trait MotionControl: Send + Sync {
    /// Block until every queued motion block has executed. Not cancellable.
    async fn wait_for_idle(&self);

    /// Feed a command through the ordinary motion intake
    fn on_command(&self, command: &mut Command);

    /// Push the modal state (coordinate system, distance mode)
    fn save_modal_state(&self);

    /// Pop the most recently saved modal state
    fn restore_modal_state(&self);

    /// Install the active tool's offset for positioning
    fn set_tool_offset(&self, offset: Offset);

    /// Bind an actuator to an axis slot in both the positioning table and the
    /// step-generation table
    fn bind_actuator(&self, slot: usize, actuator: ActuatorId);

    /// Actuator bound to an axis slot as (positioning table, step-generation table)
    fn bound_actuators(&self, slot: usize) -> (ActuatorId, ActuatorId);
}
