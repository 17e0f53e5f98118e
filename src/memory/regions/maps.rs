//! Parsing of the procfs mapping table (`/proc/<pid>/maps`)

use super::{MemoryRegion, Permissions, RegionBacking};
use crate::core::types::{Address, InspectError, InspectResult, ProcessId};
use crate::platform::ProcFs;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Why a maps line could not be parsed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapsLineError {
    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("bad address range: {0}")]
    BadRange(String),

    #[error("bad permission token: {0}")]
    BadPermissions(String),

    #[error("bad {field}: {value}")]
    BadNumber { field: &'static str, value: String },
}

/// Splits off the next whitespace-delimited field
fn next_field<'a>(rest: &mut &'a str, name: &'static str) -> Result<&'a str, MapsLineError> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        return Err(MapsLineError::MissingField(name));
    }
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let (field, tail) = trimmed.split_at(end);
    *rest = tail;
    Ok(field)
}

/// Parses one line: `start-end perms offset dev inode [path]`
pub fn parse_maps_line(line: &str) -> Result<MemoryRegion, MapsLineError> {
    let mut rest = line.trim_end_matches(['\n', '\r']);

    let range = next_field(&mut rest, "address range")?;
    let perms = next_field(&mut rest, "permissions")?;
    let offset = next_field(&mut rest, "offset")?;
    let device = next_field(&mut rest, "device")?;
    let inode = next_field(&mut rest, "inode")?;
    let path = rest.trim_start();

    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| MapsLineError::BadRange(range.to_string()))?;
    let start = Address::from_hex(start).map_err(|_| MapsLineError::BadRange(range.to_string()))?;
    let end = Address::from_hex(end).map_err(|_| MapsLineError::BadRange(range.to_string()))?;
    if start >= end {
        return Err(MapsLineError::BadRange(range.to_string()));
    }

    let permissions =
        Permissions::parse_procfs(perms).ok_or_else(|| MapsLineError::BadPermissions(perms.to_string()))?;

    let offset = u64::from_str_radix(offset, 16).map_err(|_| MapsLineError::BadNumber {
        field: "offset",
        value: offset.to_string(),
    })?;
    let inode = inode.parse::<u64>().map_err(|_| MapsLineError::BadNumber {
        field: "inode",
        value: inode.to_string(),
    })?;

    let backing = if path.is_empty() {
        RegionBacking::Anonymous
    } else if path.starts_with('[') {
        RegionBacking::Pseudo(path.to_string())
    } else {
        RegionBacking::File(PathBuf::from(path))
    };

    Ok(MemoryRegion {
        offset: Some(offset),
        device: Some(device.to_string()),
        inode: Some(inode),
        ..MemoryRegion::new(start, end, permissions, backing)
    })
}

/// Parses a whole mapping table, skipping (and logging) malformed lines
pub fn parse_maps(text: &str) -> Vec<MemoryRegion> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_maps_line(line) {
            Ok(region) => Some(region),
            Err(err) => {
                warn!(line, error = %err, "skipping malformed maps line");
                None
            }
        })
        .collect()
}

/// Reads and parses `/proc/<pid>/maps`
pub fn read_maps(procfs: &ProcFs, pid: ProcessId) -> InspectResult<Vec<MemoryRegion>> {
    if pid == 0 {
        return Err(InspectError::NoSuchProcess(pid));
    }
    let text = fs::read_to_string(procfs.maps(pid)).map_err(|e| InspectError::from_io(pid, e))?;
    Ok(parse_maps(&text))
}
