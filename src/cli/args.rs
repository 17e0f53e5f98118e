//! Command-line argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use procscope::{Address, ProcessId};
use std::path::PathBuf;

/// procscope - process and memory introspection
///
/// Lists processes, threads, modules and executable memory regions, and
/// dumps raw memory, through /proc on Linux and vmmap on macOS.
#[derive(Parser, Debug)]
#[command(name = "procscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to ./procscope.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics on stderr; RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enumerate all running processes
    EnumerateProcesses {
        /// Only show processes whose name contains this (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Also report processes that exited or denied access mid-listing
        #[arg(long)]
        show_skipped: bool,
    },

    /// List all threads of a process
    ListThreads {
        /// Process ID
        #[arg(long)]
        pid: ProcessId,
    },

    /// List all loaded modules of a process
    ListModules {
        /// Process ID
        #[arg(long)]
        pid: ProcessId,
    },

    /// Show executable memory pages of a process
    ShowExecPages {
        /// Process ID
        #[arg(long)]
        pid: ProcessId,
    },

    /// Read memory of a process within a specified range
    ReadMemory {
        /// Process ID
        #[arg(long)]
        pid: ProcessId,

        /// Start address (e.g., 0x400000)
        #[arg(long)]
        start_address: Address,

        /// End address, exclusive (e.g., 0x400fff)
        #[arg(long)]
        end_address: Address,

        /// Dump layout
        #[arg(long, value_enum, default_value_t = DumpFormat::Rows)]
        format: DumpFormat,
    },
}

/// How a memory dump is laid out in text mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// Fixed-width rows of hex byte pairs
    Rows,
    /// One continuous hex string
    Compact,
}
