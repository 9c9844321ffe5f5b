//! CLI module for the photo organizer
//!
//! This module contains all command-line interface related code including
//! argument parsing, command handlers and the interactive menu.
//!
//! # Submodules
//!
//! - `args` - Command-line argument definitions using clap
//! - `commands` - Command handler implementations
//! - `menu` - Interactive menu state machine
//! - `progress` - Progress bars and CLI output utilities
//! - `prompt` - Terminal and scripted input sources
//! - `urls` - URL list import (file, manual entry, clipboard)

pub mod args;
pub mod commands;
pub mod menu;
pub mod progress;
pub mod prompt;
pub mod urls;

// Re-export commonly used types for convenience
pub use args::{Args, Commands};
pub use commands::run_command;
pub use menu::{App, MenuState};
pub use progress::DualWriter;
pub use prompt::{Prompt, ScriptedPrompt, TerminalPrompt};
