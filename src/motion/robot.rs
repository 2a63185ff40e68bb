//! Positioning
//!
//! `Robot` is the ordinary motion intake. It keeps the modal state, the
//! machine position, the active tool offset and the positioning actuator
//! table, and queues moves on the `Conveyor`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::command::Command;
use crate::tool::Offset;

use super::{
    AXIS_COUNT, ActuatorId, ActuatorTable, Conveyor, DistanceMode, ModalState, MotionBlock, MotionControl, StepTicker,
    axis_letter,
};

/// Number of work coordinate systems (G54..G59)
const COORDINATE_SYSTEMS: usize = 6;

#[derive(Debug)]
struct RobotState {
    modal: ModalState,
    saved: Vec<ModalState>,
    position: [f32; 3],
    tool_offset: Offset,
    work_offsets: [[f32; 3]; COORDINATE_SYSTEMS],
    axis_actuators: [ActuatorId; AXIS_COUNT],
}

pub struct Robot {
    actuators: ActuatorTable,
    state: Mutex<RobotState>,
    conveyor: Conveyor,
    step_ticker: Arc<StepTicker>,
}

impl Robot {
    /// Create the robot and start its motion executor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(actuators: ActuatorTable, block_time: Duration) -> Self {
        let axis_actuators = [
            actuators.default_for_axis(0),
            actuators.default_for_axis(1),
            actuators.default_for_axis(2),
        ];
        let step_ticker = Arc::new(StepTicker::new(axis_actuators));
        let conveyor = Conveyor::new(Arc::clone(&step_ticker), block_time);

        Self {
            actuators,
            state: Mutex::new(RobotState {
                modal: ModalState::default(),
                saved: Vec::new(),
                position: [0.0; 3],
                tool_offset: [0.0; 3],
                work_offsets: [[0.0; 3]; COORDINATE_SYSTEMS],
                axis_actuators,
            }),
            conveyor,
            step_ticker,
        }
    }

    pub fn actuators(&self) -> &ActuatorTable {
        &self.actuators
    }

    pub fn step_ticker(&self) -> &Arc<StepTicker> {
        &self.step_ticker
    }

    pub fn conveyor(&self) -> &Conveyor {
        &self.conveyor
    }

    /// Last commanded position in machine coordinates
    pub fn position(&self) -> [f32; 3] {
        self.state.lock().position
    }

    pub fn tool_offset(&self) -> Offset {
        self.state.lock().tool_offset
    }

    pub fn modal_state(&self) -> ModalState {
        self.state.lock().modal
    }

    fn set_work_offset(state: &mut RobotState, command: &Command) {
        let system = match command.int_value('P') {
            Some(0) | None => state.modal.coordinate_system,
            Some(p) if (1..=COORDINATE_SYSTEMS as i64).contains(&p) => (p - 1) as usize,
            Some(p) => {
                log::warn!("G10 L2 P{} ignored: no such coordinate system", p);
                return;
            }
        };
        for slot in 0..AXIS_COUNT {
            if let Some(value) = axis_letter(slot).and_then(|l| command.value(l)) {
                state.work_offsets[system][slot] = value;
            }
        }
    }

    fn plan_move(state: &mut RobotState, command: &Command) -> Option<MotionBlock> {
        let machine = command.has_g(53);
        let mut target = state.position;
        let mut moved = [false; AXIS_COUNT];

        for slot in 0..AXIS_COUNT {
            let Some(value) = axis_letter(slot).and_then(|l| command.value(l)) else {
                continue;
            };
            target[slot] = if machine {
                value
            } else {
                match state.modal.distance_mode {
                    DistanceMode::Absolute => {
                        value + state.work_offsets[state.modal.coordinate_system][slot] + state.tool_offset[slot]
                    }
                    DistanceMode::Relative => state.position[slot] + value,
                }
            };
            moved[slot] = true;
        }

        if !moved.iter().any(|m| *m) {
            return None;
        }
        state.position = target;
        Some(MotionBlock { target, moved })
    }
}

#[async_trait]
impl MotionControl for Robot {
    async fn wait_for_idle(&self) {
        self.conveyor.wait_for_idle().await;
    }

    fn on_command(&self, command: &mut Command) {
        let mut state = self.state.lock();

        if command.has_g(90) {
            state.modal.distance_mode = DistanceMode::Absolute;
        }
        if command.has_g(91) {
            state.modal.distance_mode = DistanceMode::Relative;
        }
        for (index, code) in (54..=59).enumerate() {
            if command.has_g(code) {
                state.modal.coordinate_system = index;
            }
        }

        if command.has_g(10) {
            if command.int_value('L') == Some(2) {
                Self::set_work_offset(&mut state, command);
            }
            return;
        }

        if (command.has_g(0) || command.has_g(1))
            && let Some(block) = Self::plan_move(&mut state, command)
        {
            log::debug!("Queueing move to {:?}", block.target);
            self.conveyor.queue(block);
        }
    }

    fn save_modal_state(&self) {
        let mut state = self.state.lock();
        let modal = state.modal;
        state.saved.push(modal);
    }

    fn restore_modal_state(&self) {
        let mut state = self.state.lock();
        match state.saved.pop() {
            Some(modal) => state.modal = modal,
            None => log::warn!("Modal state restore without a matching save"),
        }
    }

    fn set_tool_offset(&self, offset: Offset) {
        self.state.lock().tool_offset = offset;
    }

    fn bind_actuator(&self, slot: usize, actuator: ActuatorId) {
        let mut state = self.state.lock();
        state.axis_actuators[slot] = actuator;
        self.step_ticker.set_motor(slot, actuator);
        log::info!(
            "Axis {} now driven by actuator {} ({})",
            axis_letter(slot).unwrap_or('?'),
            actuator,
            self.actuators.name(actuator).unwrap_or("unknown")
        );
    }

    fn bound_actuators(&self, slot: usize) -> (ActuatorId, ActuatorId) {
        let state = self.state.lock();
        (state.axis_actuators[slot], self.step_ticker.motor(slot))
    }
}
