//! Parsing of the macOS `vmmap` report

use super::{MemoryRegion, Permissions, RegionBacking, Sharing};
use crate::core::types::{Address, InspectResult, ProcessId};
use crate::platform::ToolCommand;
use crate::process::probe::ensure_alive;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// Descriptor substrings that mark an executable segment
pub const EXECUTABLE_MARKERS: [&str; 2] = ["EXEC", "__TEXT"];

/// Regions recovered from one vmmap run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmmapReport {
    /// Every line that carried an address range
    pub regions: Vec<MemoryRegion>,
    /// The subset whose descriptor carries an executable marker
    pub executable: Vec<MemoryRegion>,
}

/// Checks a report line for an executable-segment marker
pub fn is_executable_marker(line: &str) -> bool {
    EXECUTABLE_MARKERS.iter().any(|marker| line.contains(marker))
}

fn is_range_token(token: &str) -> bool {
    match token.split_once('-') {
        Some((start, end)) => {
            !start.is_empty()
                && !end.is_empty()
                && start.bytes().all(|b| b.is_ascii_hexdigit())
                && end.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Parses one region row, e.g.
///
/// ```text
/// __TEXT   102a4c000-102f5c000   [ 5184K 4608K 0K 0K] r-x/r-x SM=COW   /usr/lib/dyld
/// ```
///
/// Rows without an address range (headers, the summary table) yield `None`.
pub fn parse_vmmap_line(line: &str) -> Option<MemoryRegion> {
    let range = line.split_whitespace().find(|token| is_range_token(token))?;
    let range_at = line.find(range)?;

    let label = line[..range_at].trim();
    let (start, end) = range.split_once('-')?;
    let start = Address::from_hex(start).ok()?;
    let end = Address::from_hex(end).ok()?;
    if start >= end {
        return None;
    }

    let mut rest = line[range_at + range.len()..].trim_start();
    if rest.starts_with('[') {
        let close = rest.find(']')?;
        rest = rest[close + 1..].trim_start();
    }

    let (perms, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let mut permissions = Permissions::parse_vmmap(perms)?;
    let mut rest = tail.trim_start();

    if let Some(tail) = rest.strip_prefix("SM=") {
        let (mode, tail) = tail.split_once(char::is_whitespace).unwrap_or((tail, ""));
        permissions.sharing = match mode {
            "PRV" | "COW" | "ZER" => Sharing::Private,
            "SHM" | "ALI" | "S/A" => Sharing::Shared,
            _ => Sharing::Unknown,
        };
        rest = tail.trim_start();
    }

    let detail = rest.trim_end();
    let backing = if detail.is_empty() {
        RegionBacking::Anonymous
    } else if detail.starts_with('/') {
        RegionBacking::File(PathBuf::from(detail))
    } else {
        RegionBacking::Pseudo(detail.to_string())
    };

    Some(MemoryRegion {
        label: (!label.is_empty()).then(|| label.to_string()),
        ..MemoryRegion::new(start, end, permissions, backing)
    })
}

/// Parses a complete vmmap report
pub fn parse_vmmap(text: &str) -> VmmapReport {
    let mut report = VmmapReport::default();
    let mut seen = HashSet::new();

    for line in text.lines() {
        let Some(region) = parse_vmmap_line(line) else {
            continue;
        };
        if !seen.insert((region.start, region.end)) {
            debug!(start = %region.start, end = %region.end, "skipping duplicate vmmap region");
            continue;
        }
        if is_executable_marker(line) {
            report.executable.push(region.clone());
        }
        report.regions.push(region);
    }

    report
}

/// Runs vmmap against `pid` and parses its report
///
/// The pid is checked first so a dead process reports `NoSuchProcess`
/// rather than whatever the tool prints for it.
pub fn run_vmmap(tool: &ToolCommand, pid: ProcessId) -> InspectResult<VmmapReport> {
    ensure_alive(pid)?;
    let output = tool.run([pid.to_string()])?;
    let report = parse_vmmap(&output.stdout);
    debug!(
        pid,
        regions = report.regions.len(),
        executable = report.executable.len(),
        "parsed vmmap report"
    );
    Ok(report)
}
