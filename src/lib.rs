//! Toolchanger - tool management for multi-axis motion controllers
//!
//! Tracks the installed tools (extruders, spindles), interprets tool-select
//! (`T<n>`) and tool-change (`M6`) commands, and performs tool changes that
//! drain the asynchronous motion executor before re-routing a shared axis
//! actuator between tools.

pub mod checksum;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod halt;
pub mod introspection;
pub mod loader;
pub mod manager;
pub mod motion;
pub mod tool;

pub use error::{Result, ToolchangerError};
