//! Tool capability abstraction
//!
//! Every installable end-effector (extruder, spindle, ...) implements `Tool`.
//! The tool manager depends only on this trait. `select`/`deselect` touch the
//! tool's own hardware and never global motion or actuator state.

mod extruder;
mod spindle;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::motion::ActuatorId;

pub use extruder::Extruder;
pub use spindle::{Spindle, SpindleType};

/// Machine-space tool offset (X, Y, Z)
pub type Offset = [f32; 3];

/// Shared, non-owning handle to a registered tool
pub type ToolHandle = Arc<dyn Tool>;

/// State common to every tool variant
#[derive(Debug)]
pub struct ToolCore {
    identifier: u16,
    offset: Mutex<Offset>,
    selected: AtomicBool,
    actuator: Option<ActuatorId>,
}

impl ToolCore {
    /// Create tool state with no dedicated actuator
    pub fn new(identifier: u16, offset: Offset) -> Self {
        Self {
            identifier,
            offset: Mutex::new(offset),
            selected: AtomicBool::new(false),
            actuator: None,
        }
    }

    /// Require a dedicated actuator for the shared axis while this tool is active
    pub fn with_actuator(mut self, actuator: Option<ActuatorId>) -> Self {
        self.actuator = actuator;
        self
    }

    pub fn identifier(&self) -> u16 {
        self.identifier
    }

    pub fn offset(&self) -> Offset {
        *self.offset.lock()
    }

    pub fn set_offset(&self, offset: Offset) {
        *self.offset.lock() = offset;
    }

    pub fn is_selected(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    pub fn set_selected(&self, selected: bool) {
        self.selected.store(selected, Ordering::SeqCst);
    }

    pub fn actuator(&self) -> Option<ActuatorId> {
        self.actuator
    }
}

/// Capability contract implemented by every tool variant
pub trait Tool: Send + Sync {
    /// Common tool state
    fn core(&self) -> &ToolCore;

    /// Short family name for listings and logs
    fn kind(&self) -> &'static str;

    /// Activate this tool's own hardware. Must be idempotent.
    fn select(&self);

    /// Deactivate this tool's own hardware. Must be idempotent.
    fn deselect(&self);

    /// React to a controller halt
    fn on_halt(&self) {}

    fn is_selected(&self) -> bool {
        self.core().is_selected()
    }

    fn identifier(&self) -> u16 {
        self.core().identifier()
    }

    fn offset(&self) -> Offset {
        self.core().offset()
    }

    /// Replace the offset. The caller re-propagates it if this tool is active.
    fn set_offset(&self, offset: Offset) {
        self.core().set_offset(offset);
    }

    /// Actuator that replaces the default one on the shared axis, if any
    fn associated_actuator(&self) -> Option<ActuatorId> {
        self.core().actuator()
    }
}
