//! Extruder tool

use std::sync::atomic::{AtomicBool, Ordering};

use crate::checksum::checksum;
use crate::motion::ActuatorId;

use super::{Offset, Tool, ToolCore};

/// A filament extruder with its own heater loop
#[derive(Debug)]
pub struct Extruder {
    name: String,
    core: ToolCore,
    heater_enabled: AtomicBool,
}

impl Extruder {
    /// Create an extruder; its identifier is the checksum of its name
    pub fn new(name: impl Into<String>, offset: Offset) -> Self {
        let name = name.into();
        Self {
            core: ToolCore::new(checksum(&name), offset),
            name,
            heater_enabled: AtomicBool::new(false),
        }
    }

    /// Use a dedicated actuator for the shared axis while selected
    pub fn with_actuator(mut self, actuator: Option<ActuatorId>) -> Self {
        self.core = self.core.with_actuator(actuator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn heater_enabled(&self) -> bool {
        self.heater_enabled.load(Ordering::SeqCst)
    }
}

impl Tool for Extruder {
    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn kind(&self) -> &'static str {
        "extruder"
    }

    fn select(&self) {
        self.heater_enabled.store(true, Ordering::SeqCst);
        self.core.set_selected(true);
        log::debug!("Extruder '{}' selected, heater loop enabled", self.name);
    }

    fn deselect(&self) {
        self.heater_enabled.store(false, Ordering::SeqCst);
        self.core.set_selected(false);
        log::debug!("Extruder '{}' deselected, heater loop disabled", self.name);
    }
}
