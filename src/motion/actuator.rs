//! Actuator handles
//!
//! Actuators are owned by the motion subsystem and referenced everywhere else
//! by `ActuatorId`, an index into the process-wide `ActuatorTable`.

use std::fmt;

use crate::error::{Result, ToolchangerError};

/// Number of primary positioning axes (X, Y, Z)
pub const AXIS_COUNT: usize = 3;

/// Non-owning handle into the actuator table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActuatorId(pub usize);

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Letter of a primary axis slot
pub fn axis_letter(slot: usize) -> Option<char> {
    ['X', 'Y', 'Z'].get(slot).copied()
}

/// Named stepper actuators known to the controller
#[derive(Debug, Clone)]
pub struct ActuatorTable {
    names: Vec<String>,
}

impl ActuatorTable {
    /// Build the table. The first `AXIS_COUNT` entries drive X, Y and Z by default.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.len() < AXIS_COUNT {
            return Err(ToolchangerError::Config(format!(
                "need at least {} actuators, got {}",
                AXIS_COUNT,
                names.len()
            )));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: ActuatorId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    /// Look up an actuator handle by index
    pub fn get(&self, index: usize) -> Result<ActuatorId> {
        if index < self.names.len() {
            Ok(ActuatorId(index))
        } else {
            Err(ToolchangerError::UnknownActuator(index))
        }
    }

    /// Actuator driving an axis slot at boot
    pub fn default_for_axis(&self, slot: usize) -> ActuatorId {
        ActuatorId(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        ["alpha", "beta", "gamma", "delta", "epsilon"]
            .iter()
            .take(n)
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_requires_primary_axes() {
        let err = ActuatorTable::new(names(2)).unwrap_err();
        assert!(matches!(err, ToolchangerError::Config(_)));
    }

    #[test]
    fn test_lookup() {
        let table = ActuatorTable::new(names(4)).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(3).unwrap(), ActuatorId(3));
        assert_eq!(table.name(ActuatorId(3)), Some("delta"));
        assert!(matches!(table.get(4), Err(ToolchangerError::UnknownActuator(4))));
    }

    #[test]
    fn test_axis_letters() {
        assert_eq!(axis_letter(0), Some('X'));
        assert_eq!(axis_letter(2), Some('Z'));
        assert_eq!(axis_letter(3), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ActuatorId(2).to_string(), "#2");
    }
}
