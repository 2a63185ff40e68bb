//! Extruder factory

use std::sync::Arc;

use crate::config::ExtruderConfig;
use crate::manager::ToolManager;
use crate::motion::ActuatorTable;
use crate::tool::Extruder;

use super::{ToolFactory, note, register, resolve_shared_axis_motor};

/// Builds one `Extruder` per enabled extruder block
pub struct ExtruderMaker<'a> {
    config: &'a [ExtruderConfig],
    shared_axis: usize,
}

impl<'a> ExtruderMaker<'a> {
    pub fn new(config: &'a [ExtruderConfig], shared_axis: usize) -> Self {
        Self { config, shared_axis }
    }
}

impl ToolFactory for ExtruderMaker<'_> {
    fn load_tools(&self, manager: &mut ToolManager, actuators: &ActuatorTable) -> Vec<String> {
        let mut notes = Vec::new();

        if self.config.is_empty() {
            note(&mut notes, "NOTE: No extruders configured".to_string());
            return notes;
        }

        let enabled: Vec<&ExtruderConfig> = self.config.iter().filter(|e| e.enable).collect();
        if enabled.is_empty() {
            note(&mut notes, "NOTE: No extruders enabled".to_string());
            return notes;
        }

        for extruder in &enabled {
            let actuator = resolve_shared_axis_motor(
                &extruder.name,
                extruder.shared_axis_motor,
                self.shared_axis,
                actuators,
                &mut notes,
            );
            let tool = Extruder::new(extruder.name.clone(), extruder.offset).with_actuator(actuator);
            register(&extruder.name, Arc::new(tool), manager, &mut notes);
        }

        note(
            &mut notes,
            format!("NOTE: {} extruders enabled out of {}", enabled.len(), self.config.len()),
        );
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum;
    use crate::halt::HaltFlag;
    use crate::motion::{ActuatorId, Robot};
    use std::time::Duration;

    fn extruder(name: &str, enable: bool) -> ExtruderConfig {
        ExtruderConfig {
            name: name.to_string(),
            enable,
            ..Default::default()
        }
    }

    async fn load(config: &[ExtruderConfig]) -> (ToolManager, Vec<String>) {
        let table = ActuatorTable::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]).unwrap();
        let robot = Arc::new(Robot::new(table, Duration::ZERO));
        let mut manager = ToolManager::new(robot.clone(), HaltFlag::new(), 0).unwrap();
        let notes = ExtruderMaker::new(config, 0).load_tools(&mut manager, robot.actuators());
        (manager, notes)
    }

    #[tokio::test]
    async fn test_none_configured() {
        let (manager, notes) = load(&[]).await;
        assert_eq!(manager.tool_count(), 0);
        assert_eq!(notes, vec!["NOTE: No extruders configured".to_string()]);
    }

    #[tokio::test]
    async fn test_none_enabled() {
        let (manager, notes) = load(&[extruder("hotend", false)]).await;
        assert_eq!(manager.tool_count(), 0);
        assert_eq!(notes, vec!["NOTE: No extruders enabled".to_string()]);
    }

    #[tokio::test]
    async fn test_enabled_in_config_order() {
        let config = vec![extruder("hotend", true), extruder("spare", false), extruder("hotend2", true)];
        let (manager, notes) = load(&config).await;

        assert_eq!(manager.tool_count(), 2);
        assert_eq!(manager.get_tool(1).unwrap().identifier(), checksum("hotend"));
        assert_eq!(manager.get_tool(2).unwrap().identifier(), checksum("hotend2"));
        assert_eq!(notes.last().unwrap(), "NOTE: 2 extruders enabled out of 3");
    }

    #[tokio::test]
    async fn test_dedicated_motor_and_offset() {
        let mut config = extruder("hotend2", true);
        config.offset = [25.0, 0.0, 0.0];
        config.shared_axis_motor = Some(3);
        let (manager, _) = load(&[config]).await;

        let tool = manager.get_tool(1).unwrap();
        assert_eq!(tool.associated_actuator(), Some(ActuatorId(3)));
        assert_eq!(tool.offset(), [25.0, 0.0, 0.0]);
        assert!(!tool.is_selected());
    }

    #[tokio::test]
    async fn test_repeated_name_loads_once() {
        let config = vec![extruder("hotend", true), extruder("hotend", true)];
        let (manager, notes) = load(&config).await;

        assert_eq!(manager.tool_count(), 1);
        assert!(notes[0].starts_with("Error: hotend has identifier"));
    }
}
