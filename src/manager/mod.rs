//! Tool manager
//!
//! Owns the registered tools, the active/next tool indices and the tool
//! change sequence. Tool numbers are 1-based; 0 means no tool.

mod change;
mod tool_manager;

pub use change::ChangePhase;
pub use tool_manager::ToolManager;
