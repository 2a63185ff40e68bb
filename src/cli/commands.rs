//! CLI command definitions using clap.
//!
//! - run: dispatch command and console lines through the controller
//! - tools: list the configured tools
//! - config: print the resolved configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Toolchanger - tool selection and safe tool changes for motion controllers
#[derive(Parser, Debug)]
#[command(name = "toolchanger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch lines from a script or stdin (default)
    Run {
        /// Read lines from this file instead of stdin
        #[arg(short, long)]
        script: Option<PathBuf>,
    },

    /// List the tools loaded from configuration
    Tools,

    /// Print the resolved configuration as YAML
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args should result in None command (run from stdin)
        let cli = Cli::try_parse_from(["toolchanger"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["toolchanger", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["toolchanger", "-c", "/path/to/toolchanger.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/toolchanger.yml")));
    }

    #[test]
    fn test_run_with_script() {
        let cli = Cli::try_parse_from(["toolchanger", "run", "--script", "job.gcode"]).unwrap();
        match cli.command {
            Some(Commands::Run { script }) => {
                assert_eq!(script, Some(PathBuf::from("job.gcode")));
            }
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_run_without_script() {
        let cli = Cli::try_parse_from(["toolchanger", "run"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Run { script: None })));
    }

    #[test]
    fn test_tools_command() {
        let cli = Cli::try_parse_from(["toolchanger", "tools"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Tools)));
    }

    #[test]
    fn test_config_command_with_global_flag() {
        let cli = Cli::try_parse_from(["toolchanger", "config", "-c", "x.yml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config)));
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["toolchanger", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
