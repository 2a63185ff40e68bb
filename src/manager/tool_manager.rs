//! Tool selection and the tool change sequence.

use std::io::{self, Write};
use std::sync::Arc;

use crate::command::{Command, shift_parameter};
use crate::error::{Result, ToolchangerError};
use crate::halt::HaltFlag;
use crate::introspection::{
    GET_ACTIVE_TOOL_CHECKSUM, IS_ACTIVE_TOOL_CHECKSUM, PublicData, PublicDataHandler, PublicDataRequest,
    TOOL_MANAGER_CHECKSUM,
};
use crate::motion::{AXIS_COUNT, ActuatorId, ModalScope, MotionControl, axis_letter};
use crate::tool::{Offset, ToolHandle};

use super::ChangePhase;

/// Tracks installed tools and performs safe tool changes.
///
/// The manager is driven from the cooperative dispatch context: every
/// handler takes `&mut self`, so no two run at once. The only suspension
/// points are the drains inside the change sequence, which is never
/// abandoned once started.
pub struct ToolManager {
    tools: Vec<ToolHandle>,
    /// 1-based, 0 = none
    active_tool: usize,
    /// 1-based, 0 = none pending
    next_tool: usize,
    default_actuator: ActuatorId,
    shared_axis: usize,
    motion: Arc<dyn MotionControl>,
    halted: HaltFlag,
    phase: ChangePhase,
}

impl ToolManager {
    /// Create a manager for the given shared axis slot.
    ///
    /// The actuator bound to that slot right now becomes the default actuator.
    pub fn new(motion: Arc<dyn MotionControl>, halted: HaltFlag, shared_axis: usize) -> Result<Self> {
        if shared_axis >= AXIS_COUNT {
            return Err(ToolchangerError::Config(format!(
                "shared axis {} is not a primary axis",
                shared_axis
            )));
        }
        let (default_actuator, _) = motion.bound_actuators(shared_axis);

        Ok(Self {
            tools: Vec::new(),
            active_tool: 0,
            next_tool: 0,
            default_actuator,
            shared_axis,
            motion,
            halted,
            phase: ChangePhase::Idle,
        })
    }

    /// Register a tool. Tools are numbered in registration order from 1.
    ///
    /// The tool is always left deselected; selection only happens through a
    /// tool change.
    pub fn add_tool(&mut self, tool: ToolHandle) {
        debug_assert!(
            !self.has_tool(tool.identifier()),
            "duplicate tool identifier {}",
            tool.identifier()
        );
        tool.deselect();
        let (kind, identifier) = (tool.kind(), tool.identifier());
        self.tools.push(tool);
        log::info!("Registered {} {} as T{}", kind, identifier, self.tools.len());
    }

    /// Check whether a tool with this identifier is registered
    pub fn has_tool(&self, identifier: u16) -> bool {
        self.tools.iter().any(|t| t.identifier() == identifier)
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Tool by 1-based index
    pub fn get_tool(&self, index: usize) -> Option<&ToolHandle> {
        index.checked_sub(1).and_then(|i| self.tools.get(i))
    }

    /// Offset of a tool by 1-based index
    pub fn get_tool_offset(&self, index: usize) -> Option<Offset> {
        self.get_tool(index).map(|t| t.offset())
    }

    /// Replace a tool's offset, re-propagating it if the tool is active.
    /// Out-of-range indices are ignored.
    pub fn set_tool_offset(&mut self, index: usize, offset: Offset) {
        let Some(tool) = self.get_tool(index) else {
            log::debug!("Ignoring offset for nonexistent tool T{}", index);
            return;
        };
        tool.set_offset(offset);
        if index == self.active_tool {
            self.motion.set_tool_offset(offset);
        }
    }

    pub fn active_tool(&self) -> usize {
        self.active_tool
    }

    pub fn next_tool(&self) -> usize {
        self.next_tool
    }

    /// Identifier of the active tool
    pub fn active_tool_name(&self) -> Option<u16> {
        self.get_tool(self.active_tool).map(|t| t.identifier())
    }

    pub fn active_tool_offset(&self) -> Option<Offset> {
        self.get_tool_offset(self.active_tool)
    }

    /// Actuator used on the shared axis when the active tool has none of its own
    pub fn default_actuator(&self) -> ActuatorId {
        self.default_actuator
    }

    pub fn phase(&self) -> ChangePhase {
        self.phase
    }

    /// Handle the tool-select (`T<n>`) and tool-change (`M6`) parts of a command.
    ///
    /// Invalid selections are reported in the command's deferred response and
    /// change nothing.
    pub async fn on_command(&mut self, command: &mut Command) {
        if let Some(requested) = command.int_value('T') {
            match self.valid_index(requested) {
                Some(index) => self.next_tool = index,
                None => Self::report_invalid(command, requested),
            }
        }

        if command.has_m(6) {
            if self.valid_index(self.next_tool as i64).is_none() {
                Self::report_invalid(command, self.next_tool as i64);
            } else if self.next_tool != self.active_tool {
                self.change_tool().await;
            }
        }
    }

    /// Handle a console line. Only `tools` is recognised.
    pub fn on_console_line(&self, line: &str, out: &mut dyn Write) -> io::Result<()> {
        if self.halted.is_halted() {
            return Ok(());
        }
        if !line.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Ok(());
        }

        let (cmd, _) = shift_parameter(line);
        if cmd == "tools" {
            writeln!(out, "{} tools defined:", self.tools.len())?;
            for (i, tool) in self.tools.iter().enumerate() {
                let marker = if i + 1 == self.active_tool { "*" } else { "" };
                writeln!(out, "{}: {}{}", i + 1, tool.identifier(), marker)?;
            }
        }
        Ok(())
    }

    /// Forward a controller halt to every tool
    pub fn on_halt(&self) {
        for tool in &self.tools {
            tool.on_halt();
        }
    }

    fn valid_index(&self, requested: i64) -> Option<usize> {
        if requested >= 1 && requested <= self.tools.len() as i64 {
            Some(requested as usize)
        } else {
            None
        }
    }

    fn report_invalid(command: &mut Command, requested: i64) {
        log::warn!("T{} invalid tool in '{}'", requested, command.line());
        command.append_response(&format!("T{} invalid tool ", requested));
    }

    fn enter(&mut self, phase: ChangePhase) {
        tracing::debug!(from = %self.phase, to = %phase, "Tool change phase");
        self.phase = phase;
    }

    async fn change_tool(&mut self) {
        let outgoing = self.get_tool(self.active_tool).cloned();
        let incoming = Arc::clone(&self.tools[self.next_tool - 1]);
        log::info!("Tool change T{} -> T{}", self.active_tool, self.next_tool);

        // Nothing queued may still depend on the outgoing tool
        self.enter(ChangePhase::Draining);
        self.motion.wait_for_idle().await;

        if let Some(outgoing) = outgoing {
            self.enter(ChangePhase::Deselecting);
            outgoing.deselect();

            self.enter(ChangePhase::Parking);
            self.park_shared_axis();
        }

        self.enter(ChangePhase::Draining);
        self.motion.wait_for_idle().await;

        self.enter(ChangePhase::Rebinding);
        self.active_tool = self.next_tool;
        self.motion.set_tool_offset(incoming.offset());
        let actuator = incoming.associated_actuator().unwrap_or(self.default_actuator);
        self.motion.bind_actuator(self.shared_axis, actuator);
        let (positioning, stepping) = self.motion.bound_actuators(self.shared_axis);
        assert!(
            positioning == actuator && stepping == actuator,
            "shared axis binding out of sync: wanted {}, positioning {}, stepping {}",
            actuator,
            positioning,
            stepping
        );

        self.enter(ChangePhase::Selecting);
        incoming.select();

        self.enter(ChangePhase::Draining);
        self.motion.wait_for_idle().await;

        self.enter(ChangePhase::Idle);
        tracing::info!(tool = self.active_tool, actuator = %actuator, "Tool change complete");
    }

    /// Rapid the shared axis to machine zero through the ordinary command path
    /// without disturbing the caller's modal state.
    fn park_shared_axis(&self) {
        let Some(letter) = axis_letter(self.shared_axis) else {
            return;
        };
        let scope = ModalScope::new(self.motion.as_ref());
        let mut park = Command::parse(&format!("G90 G53 G0 {}0", letter));
        scope.motion().on_command(&mut park);
        if !park.response().is_empty() {
            log::warn!("Park move reported: {}", park.response());
        }
    }
}

impl PublicDataHandler for ToolManager {
    fn on_get_public_data(&self, request: &mut PublicDataRequest) {
        if !request.starts_with(TOOL_MANAGER_CHECKSUM) {
            return;
        }

        if request.second_element_is(IS_ACTIVE_TOOL_CHECKSUM) {
            // Only answer for tools we manage so another owner can respond
            let managed = self.tools.iter().any(|t| request.third_element_is(t.identifier()));
            if !managed {
                return;
            }
            if let Some(name) = self.active_tool_name() {
                request.set_data(PublicData::ToolName(name));
            }
            request.set_taken();
        } else if request.second_element_is(GET_ACTIVE_TOOL_CHECKSUM) {
            request.set_data(PublicData::ToolIndex(self.active_tool));
            request.set_taken();
        }
    }

    fn on_set_public_data(&mut self, request: &mut PublicDataRequest) {
        if !request.starts_with(TOOL_MANAGER_CHECKSUM) {
            return;
        }
        // TODO: trigger a tool change command once the set payload is specified
        log::debug!("Tool manager set request ignored: {:?}", request.data());
    }
}
