//! Spindle tools
//!
//! One `Spindle` type covers the PWM, analog and Huanyang VFD variants. The
//! variant only changes how the control output is routed, which is local to
//! the tool.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::checksum::checksum;
use crate::error::{Result, ToolchangerError};
use crate::motion::ActuatorId;

use super::{Offset, Tool, ToolCore};

/// Concrete spindle control variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpindleType {
    /// PWM-driven speed control
    Pwm,
    /// Analog voltage speed control
    Analog,
    /// Huanyang VFD over modbus
    Huanyang,
}

impl SpindleType {
    /// Resolve the variant from the `type` and `vfd_type` configuration values
    pub fn resolve(spindle_type: &str, vfd_type: &str) -> Result<Self> {
        match spindle_type {
            "pwm" => Ok(Self::Pwm),
            "analog" => Ok(Self::Analog),
            "modbus" => match vfd_type {
                "huanyang" => Ok(Self::Huanyang),
                _ => Err(ToolchangerError::Loader("No valid spindle VFD type defined".to_string())),
            },
            _ => Err(ToolchangerError::Loader("No valid spindle type defined".to_string())),
        }
    }
}

impl fmt::Display for SpindleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pwm => write!(f, "pwm"),
            Self::Analog => write!(f, "analog"),
            Self::Huanyang => write!(f, "huanyang"),
        }
    }
}

/// A spindle tool
#[derive(Debug)]
pub struct Spindle {
    spindle_type: SpindleType,
    core: ToolCore,
    output_routed: AtomicBool,
    ignore_on_halt: bool,
}

impl Spindle {
    /// Create a spindle; its identifier is the checksum of "spindle"
    pub fn new(spindle_type: SpindleType, offset: Offset) -> Self {
        Self {
            spindle_type,
            core: ToolCore::new(checksum("spindle"), offset),
            output_routed: AtomicBool::new(false),
            ignore_on_halt: false,
        }
    }

    pub fn with_actuator(mut self, actuator: Option<ActuatorId>) -> Self {
        self.core = self.core.with_actuator(actuator);
        self
    }

    /// Keep the output routed when the controller halts
    pub fn with_ignore_on_halt(mut self, ignore: bool) -> Self {
        self.ignore_on_halt = ignore;
        self
    }

    pub fn spindle_type(&self) -> SpindleType {
        self.spindle_type
    }

    pub fn output_routed(&self) -> bool {
        self.output_routed.load(Ordering::SeqCst)
    }
}

impl Tool for Spindle {
    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn kind(&self) -> &'static str {
        "spindle"
    }

    fn select(&self) {
        self.output_routed.store(true, Ordering::SeqCst);
        self.core.set_selected(true);
        log::debug!("{} spindle selected, output routed", self.spindle_type);
    }

    fn deselect(&self) {
        self.output_routed.store(false, Ordering::SeqCst);
        self.core.set_selected(false);
        log::debug!("{} spindle deselected, output unrouted", self.spindle_type);
    }

    fn on_halt(&self) {
        if self.ignore_on_halt {
            return;
        }
        self.output_routed.store(false, Ordering::SeqCst);
        log::info!("{} spindle output unrouted on halt", self.spindle_type);
    }
}
