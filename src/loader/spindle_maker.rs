//! Spindle factory

use std::sync::Arc;

use crate::config::SpindleConfig;
use crate::manager::ToolManager;
use crate::motion::ActuatorTable;
use crate::tool::{Spindle, SpindleType};

use super::{ToolFactory, note, register, resolve_shared_axis_motor};

/// Builds the spindle tool, choosing the variant from `type` and `vfd_type`
pub struct SpindleMaker<'a> {
    config: &'a SpindleConfig,
    shared_axis: usize,
}

impl<'a> SpindleMaker<'a> {
    pub fn new(config: &'a SpindleConfig, shared_axis: usize) -> Self {
        Self { config, shared_axis }
    }
}

impl ToolFactory for SpindleMaker<'_> {
    fn load_tools(&self, manager: &mut ToolManager, actuators: &ActuatorTable) -> Vec<String> {
        let mut notes = Vec::new();

        if !self.config.enable {
            note(&mut notes, "NOTE: Spindle Module is disabled".to_string());
            return notes;
        }

        let spindle_type = match SpindleType::resolve(&self.config.spindle_type, &self.config.vfd_type) {
            Ok(t) => t,
            Err(e) => {
                note(&mut notes, format!("ERROR: {}", e));
                return notes;
            }
        };

        let actuator = resolve_shared_axis_motor(
            "Spindle",
            self.config.shared_axis_motor,
            self.shared_axis,
            actuators,
            &mut notes,
        );
        let spindle = Spindle::new(spindle_type, self.config.offset)
            .with_actuator(actuator)
            .with_ignore_on_halt(self.config.ignore_on_halt);
        if !register("Spindle", Arc::new(spindle), manager, &mut notes) {
            return notes;
        }

        note(&mut notes, format!("NOTE: {} spindle loaded", spindle_type));
        notes
    }
}
