//! Modal motion state and its scoped save/restore guard

use super::MotionControl;

/// Whether axis words are absolute targets or relative distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMode {
    #[default]
    Absolute,
    Relative,
}

/// Modal state that persists between commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalState {
    /// Work coordinate system, 0 = G54 ... 5 = G59
    pub coordinate_system: usize,
    pub distance_mode: DistanceMode,
}

/// Saves the modal state on creation and restores it when dropped, on every
/// exit path.
pub struct ModalScope<'a> {
    motion: &'a dyn MotionControl,
}

impl<'a> ModalScope<'a> {
    pub fn new(motion: &'a dyn MotionControl) -> Self {
        motion.save_modal_state();
        Self { motion }
    }

    pub fn motion(&self) -> &dyn MotionControl {
        self.motion
    }
}

impl Drop for ModalScope<'_> {
    fn drop(&mut self) {
        self.motion.restore_modal_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::motion::ActuatorId;
    use crate::tool::Offset;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Counting {
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl MotionControl for Counting {
        async fn wait_for_idle(&self) {}
        fn on_command(&self, _command: &mut Command) {
            self.calls.lock().push("command");
        }
        fn save_modal_state(&self) {
            self.calls.lock().push("save");
        }
        fn restore_modal_state(&self) {
            self.calls.lock().push("restore");
        }
        fn set_tool_offset(&self, _offset: Offset) {}
        fn bind_actuator(&self, _slot: usize, _actuator: ActuatorId) {}
        fn bound_actuators(&self, _slot: usize) -> (ActuatorId, ActuatorId) {
            (ActuatorId(0), ActuatorId(0))
        }
    }

    #[test]
    fn test_defaults() {
        let state = ModalState::default();
        assert_eq!(state.coordinate_system, 0);
        assert_eq!(state.distance_mode, DistanceMode::Absolute);
    }

    #[test]
    fn test_scope_saves_and_restores() {
        let motion = Counting::default();
        {
            let scope = ModalScope::new(&motion);
            scope.motion().on_command(&mut Command::parse("G91"));
        }
        assert_eq!(*motion.calls.lock(), vec!["save", "command", "restore"]);
    }

    #[test]
    fn test_scope_restores_on_early_return() {
        fn bail(motion: &dyn MotionControl) -> Option<()> {
            let _scope = ModalScope::new(motion);
            let missing: Option<()> = None;
            missing?;
            motion.on_command(&mut Command::parse("G0 X0"));
            Some(())
        }

        let motion = Counting::default();
        assert!(bail(&motion).is_none());
        assert_eq!(*motion.calls.lock(), vec!["save", "restore"]);
    }
}
