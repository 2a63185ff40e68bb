//! Tool factories
//!
//! Each factory reads its family's configuration, constructs the enabled
//! tools and registers them with the tool manager. Resolution failures are
//! reported as notes and the tool is simply not registered.

mod extruder_maker;
mod spindle_maker;

use crate::config::Config;
use crate::manager::ToolManager;
use crate::motion::{AXIS_COUNT, ActuatorId, ActuatorTable};
use crate::tool::ToolHandle;

pub use extruder_maker::ExtruderMaker;
pub use spindle_maker::SpindleMaker;

/// A factory for one tool family
pub trait ToolFactory {
    /// Construct and register this family's tools, returning user-facing notes
    fn load_tools(&self, manager: &mut ToolManager, actuators: &ActuatorTable) -> Vec<String>;
}

/// Run every factory in registration order
pub fn load_all(config: &Config, manager: &mut ToolManager, actuators: &ActuatorTable) -> Vec<String> {
    let factories: Vec<Box<dyn ToolFactory + '_>> = vec![
        Box::new(ExtruderMaker::new(&config.extruders, config.motion.shared_axis)),
        Box::new(SpindleMaker::new(&config.spindle, config.motion.shared_axis)),
    ];

    let mut notes = Vec::new();
    for factory in factories {
        notes.extend(factory.load_tools(manager, actuators));
    }
    notes
}

/// Resolve a configured shared-axis motor.
///
/// `None`, or the shared axis' own default motor, means the default actuator.
/// Another primary axis' motor, or an index outside the table, is reported and
/// falls back to the default.
pub(crate) fn resolve_shared_axis_motor(
    owner: &str,
    requested: Option<usize>,
    shared_axis: usize,
    actuators: &ActuatorTable,
    notes: &mut Vec<String>,
) -> Option<ActuatorId> {
    let index = requested?;
    if index < AXIS_COUNT {
        if index != shared_axis {
            note(
                notes,
                format!(
                    "Error: {} cannot use axis {} to replace the shared axis stepper! Must be >= {}. Using default stepper motor.",
                    owner, index, AXIS_COUNT
                ),
            );
        }
        return None;
    }
    match actuators.get(index) {
        Ok(id) => Some(id),
        Err(e) => {
            note(notes, format!("Error: {}: {}. Using default stepper motor.", owner, e));
            None
        }
    }
}

/// Register a tool unless its identifier is already taken.
///
/// A clash is reported and the tool is left out, so identifiers stay unique.
pub(crate) fn register(owner: &str, tool: ToolHandle, manager: &mut ToolManager, notes: &mut Vec<String>) -> bool {
    let identifier = tool.identifier();
    if manager.has_tool(identifier) {
        note(
            notes,
            format!(
                "Error: {} has identifier {} which is already in use by another tool. Not loaded.",
                owner, identifier
            ),
        );
        return false;
    }
    manager.add_tool(tool);
    true
}

pub(crate) fn note(notes: &mut Vec<String>, message: String) {
    if message.starts_with("Error") || message.starts_with("ERROR") {
        log::error!("{}", message);
    } else {
        log::info!("{}", message);
    }
    notes.push(message);
}
