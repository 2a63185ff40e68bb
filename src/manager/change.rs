//! Tool change phases

use std::fmt;

/// Where the tool manager is in the change sequence.
///
/// `Idle -> Draining -> [Deselecting -> Parking ->] Draining -> Rebinding ->
/// Selecting -> Draining -> Idle`. Deselecting and Parking are skipped when no
/// tool was active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangePhase {
    #[default]
    Idle,
    /// Waiting for the motion queue to empty
    Draining,
    /// Deselecting the outgoing tool
    Deselecting,
    /// Moving the shared axis to machine zero
    Parking,
    /// Installing the new offset and shared-axis actuator
    Rebinding,
    /// Selecting the incoming tool
    Selecting,
}

impl ChangePhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for ChangePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Draining => "draining",
            Self::Deselecting => "deselecting",
            Self::Parking => "parking",
            Self::Rebinding => "rebinding",
            Self::Selecting => "selecting",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert!(ChangePhase::default().is_idle());
        assert!(!ChangePhase::Draining.is_idle());
    }

    #[test]
    fn test_display() {
        assert_eq!(ChangePhase::Rebinding.to_string(), "rebinding");
        assert_eq!(ChangePhase::Parking.to_string(), "parking");
    }
}
