//! Cooperative event dispatch
//!
//! The `Controller` is the single place lines enter the system. It routes
//! console lines and commands to the tool manager and the motion intake one
//! at a time, owns the halt state and fans introspection requests out to
//! every handler.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crate::command::Command;
use crate::config::Config;
use crate::error::Result;
use crate::halt::HaltFlag;
use crate::introspection::{PublicData, PublicDataHandler, PublicDataRequest};
use crate::loader;
use crate::manager::ToolManager;
use crate::motion::{ActuatorTable, MotionControl, Robot};

/// A controller assembled from configuration
pub struct Booted {
    pub controller: Controller,
    pub robot: Arc<Robot>,
    /// Notes reported by the tool factories and boot-time selection
    pub notes: Vec<String>,
}

pub struct Controller {
    tool_manager: ToolManager,
    motion: Arc<dyn MotionControl>,
    halted: HaltFlag,
    handlers: Vec<Box<dyn PublicDataHandler>>,
}

impl Controller {
    pub fn new(tool_manager: ToolManager, motion: Arc<dyn MotionControl>, halted: HaltFlag) -> Self {
        Self {
            tool_manager,
            motion,
            halted,
            handlers: Vec::new(),
        }
    }

    /// Build the motion subsystem, load every configured tool and apply the
    /// boot-time tool selection.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn boot(config: &Config) -> Result<Booted> {
        let actuators = ActuatorTable::new(config.motion.actuators.clone())?;
        let robot = Arc::new(Robot::new(
            actuators,
            Duration::from_millis(config.motion.block_time_ms),
        ));
        let halted = HaltFlag::new();
        let mut tool_manager = ToolManager::new(robot.clone(), halted.clone(), config.motion.shared_axis)?;
        let mut notes = loader::load_all(config, &mut tool_manager, robot.actuators());

        let mut controller = Self::new(tool_manager, robot.clone(), halted);
        if let Some(initial) = config.tools.initial_tool {
            let mut out = Vec::new();
            controller.on_line(&format!("T{} M6", initial), &mut out).await?;
            let response = String::from_utf8_lossy(&out).trim().to_string();
            log::info!("Boot tool selection T{}: {}", initial, response);
            if response != "ok" {
                notes.push(format!("Boot tool selection T{}: {}", initial, response));
            }
        }

        Ok(Booted {
            controller,
            robot,
            notes,
        })
    }

    pub fn tool_manager(&self) -> &ToolManager {
        &self.tool_manager
    }

    pub fn tool_manager_mut(&mut self) -> &mut ToolManager {
        &mut self.tool_manager
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_halted()
    }

    /// Enter the halted state and tell every tool
    pub fn halt(&mut self) {
        if !self.halted.is_halted() {
            log::warn!("Controller halted");
            self.halted.set(true);
            self.tool_manager.on_halt();
        }
    }

    /// Register another component on the introspection bus
    pub fn add_public_data_handler(&mut self, handler: Box<dyn PublicDataHandler>) {
        self.handlers.push(handler);
    }

    /// Dispatch one input line and write its response.
    ///
    /// Lines starting with a lowercase letter are console commands; anything
    /// else is a motion command acknowledged with `ok` plus any deferred text.
    /// While halted, commands other than `M999` are rejected with `!!`.
    pub async fn on_line(&mut self, line: &str, out: &mut dyn Write) -> io::Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        if line.starts_with(|c: char| c.is_ascii_lowercase()) {
            return self.tool_manager.on_console_line(line, out);
        }

        let mut command = Command::parse(line);

        if command.has_m(112) {
            self.halt();
            return writeln!(out, "ok Emergency Stop Requested - reset or M999 required to exit HALT state");
        }

        if self.halted.is_halted() {
            if command.has_m(999) {
                self.halted.set(false);
                log::info!("Halt cleared");
                return writeln!(out, "ok");
            }
            return writeln!(out, "!!");
        }

        self.tool_manager.on_command(&mut command).await;
        self.motion.on_command(&mut command);

        let response = command.response().trim_end();
        if response.is_empty() {
            writeln!(out, "ok")
        } else {
            writeln!(out, "ok {}", response)
        }
    }

    /// Offer a get request to the tool manager, then to every other handler
    pub fn get_public_data(&self, path: &[u16]) -> PublicDataRequest {
        let mut request = PublicDataRequest::new(path);
        self.tool_manager.on_get_public_data(&mut request);
        for handler in &self.handlers {
            if request.is_taken() {
                break;
            }
            handler.on_get_public_data(&mut request);
        }
        request
    }

    /// Offer a set request to the tool manager, then to every other handler.
    /// Returns whether any handler took it.
    pub fn set_public_data(&mut self, path: &[u16], data: PublicData) -> bool {
        let mut request = PublicDataRequest::with_data(path, data);
        self.tool_manager.on_set_public_data(&mut request);
        for handler in &mut self.handlers {
            if request.is_taken() {
                break;
            }
            handler.on_set_public_data(&mut request);
        }
        request.is_taken()
    }
}
