//! CLI argument parsing and command dispatch.

pub mod args;
pub mod format;

use anyhow::{Context, Result};
use args::{Commands, DumpFormat};
use procscope::config::Config;
use procscope::{memory, process, Capability, Platform};
use serde::Serialize;
use tracing::debug;

/// Settings shared by every command
pub struct RunContext {
    pub platform: Platform,
    pub json: bool,
    pub row_width: usize,
}

impl RunContext {
    pub fn new(config: &Config, json: bool) -> Self {
        RunContext {
            platform: Platform::from_config(config),
            json,
            row_width: config.memory.row_width,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the explanation of a capability gap, returning the value otherwise
fn supported_or_explain<T>(capability: Capability<T>) -> Option<T> {
    match capability {
        Capability::Supported(value) => Some(value),
        Capability::Unsupported(reason) => {
            println!("{reason}");
            None
        }
    }
}

/// Runs one command. Capability gaps are reported and count as success.
pub fn run(command: Commands, ctx: &RunContext) -> Result<()> {
    debug!(strategy = %ctx.platform.strategy(), ?command, "dispatching command");

    match command {
        Commands::EnumerateProcesses { name, show_skipped } => {
            enumerate_processes(ctx, name.as_deref(), show_skipped)
        }

        Commands::ListThreads { pid } => {
            let threads = process::list_threads(&ctx.platform, pid)
                .with_context(|| format!("listing threads of process {pid}"))?;
            if ctx.json {
                return print_json(&threads);
            }
            println!("Listing threads for process {pid}...");
            for thread in &threads {
                println!("{}", format::thread_line(thread));
            }
            Ok(())
        }

        Commands::ListModules { pid } => {
            let modules = process::list_modules(&ctx.platform, pid)
                .with_context(|| format!("listing modules of process {pid}"))?;
            if ctx.json {
                return print_json(&modules);
            }
            println!("Listing loaded modules for process {pid}...");
            if let Some(modules) = supported_or_explain(modules) {
                for module in &modules {
                    println!("{}", format::module_line(module));
                }
            }
            Ok(())
        }

        Commands::ShowExecPages { pid } => {
            let regions = memory::list_executable_regions(&ctx.platform, pid)
                .with_context(|| format!("listing executable regions of process {pid}"))?;
            if ctx.json {
                return print_json(&regions);
            }
            println!("Showing executable memory pages for process {pid}...");
            if let Some(regions) = supported_or_explain(regions) {
                if regions.is_empty() {
                    println!("No executable memory regions found for process {pid}.");
                }
                for region in &regions {
                    println!("{}", format::region_line(region));
                }
            }
            Ok(())
        }

        Commands::ReadMemory {
            pid,
            start_address,
            end_address,
            format: dump,
        } => {
            let snapshot = memory::read_memory(&ctx.platform, pid, start_address, end_address)
                .with_context(|| {
                    format!("reading memory of process {pid} from {start_address} to {end_address}")
                })?;
            if ctx.json {
                return print_json(&snapshot);
            }
            println!("Memory from address {start_address} to {end_address}:");
            match dump {
                DumpFormat::Rows => {
                    for row in format::dump_rows(&snapshot, ctx.row_width) {
                        println!("{row}");
                    }
                }
                DumpFormat::Compact => println!("{}", format::dump_compact(&snapshot)),
            }
            Ok(())
        }
    }
}

fn enumerate_processes(ctx: &RunContext, name: Option<&str>, show_skipped: bool) -> Result<()> {
    let enumerator = process::list_processes(&ctx.platform).context("enumerating processes")?;

    let mut listing = format::ProcessListing {
        processes: Vec::new(),
        skipped: Vec::new(),
    };
    for entry in enumerator {
        match entry {
            Ok(info) if name.map_or(true, |needle| info.name_matches(needle)) => {
                listing.processes.push(info)
            }
            Ok(_) => {}
            Err(skipped) => listing.skipped.push(skipped),
        }
    }
    listing.processes.sort_by_key(|p| p.pid);
    debug!(
        found = listing.processes.len(),
        skipped = listing.skipped.len(),
        "process enumeration finished"
    );

    if !show_skipped {
        listing.skipped.clear();
    }

    if ctx.json {
        return print_json(&listing);
    }

    println!("Enumerating all processes...");
    for info in &listing.processes {
        println!("{}", format::process_line(info));
    }
    for skipped in &listing.skipped {
        println!("{}", format::skipped_line(skipped));
    }
    Ok(())
}
