//! Text rendering of inspection results

use procscope::{MemoryRegion, MemorySnapshot, ModuleInfo, ProcessInfo, Skipped, ThreadInfo};
use serde::Serialize;
use std::fmt::Write;

/// JSON shape of `enumerate-processes`
#[derive(Debug, Serialize)]
pub struct ProcessListing {
    pub processes: Vec<ProcessInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<Skipped>,
}

pub fn process_line(process: &ProcessInfo) -> String {
    format!(
        "Process ID: {}, Name: {}",
        process.pid,
        process.name.as_deref().unwrap_or("?")
    )
}

pub fn skipped_line(skipped: &Skipped) -> String {
    format!("Skipped process {}: {}", skipped.pid, skipped.reason)
}

pub fn thread_line(thread: &ThreadInfo) -> String {
    format!("Thread ID: {}", thread.tid)
}

pub fn module_line(module: &ModuleInfo) -> String {
    format!("Module: {}", module.path.display())
}

/// One region in the layout of its source
///
/// Procfs regions are printed back as mapping-table lines; vmmap regions lead
/// with their region type.
pub fn region_line(region: &MemoryRegion) -> String {
    let mut line = String::new();
    if let Some(label) = &region.label {
        let _ = write!(line, "{label:<24} ");
    }
    let _ = write!(line, "{:x}-{:x} {}", region.start, region.end, region.permissions);
    if let (Some(offset), Some(device), Some(inode)) = (region.offset, &region.device, region.inode) {
        let _ = write!(line, " {offset:08x} {device} {inode}");
    }
    let backing = region.backing.to_string();
    if !backing.is_empty() {
        let _ = write!(line, "  {backing}");
    }
    line
}

/// Hex dump of a snapshot, `width` bytes per row, each row led by its address
pub fn dump_rows(snapshot: &MemorySnapshot, width: usize) -> Vec<String> {
    snapshot
        .rows(width)
        .map(|(address, row)| {
            let bytes: Vec<String> = row.iter().map(|b| format!("{b:02x}")).collect();
            format!("{address}: {}", bytes.join(" "))
        })
        .collect()
}

/// The whole snapshot as one lowercase hex string
pub fn dump_compact(snapshot: &MemorySnapshot) -> String {
    hex::encode(snapshot.bytes())
}
