//! Memory region listing and classification
//!
//! Regions come from the procfs mapping table on Linux and from the textual
//! report of `vmmap` on macOS. Every region keeps its full permission set;
//! the executable view is a filter applied on top.

pub mod filter;
pub mod maps;
pub mod protection;
pub mod vmmap;

pub use filter::{FilterCriteria, RegionFilter};
pub use protection::{ExecutablePolicy, Permissions, Sharing};

use crate::core::types::{Address, Capability, InspectResult, MemoryRange, ProcessId};
use crate::platform::{Platform, Strategy};
use crate::process::probe::ensure_alive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// What backs a mapped region
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum RegionBacking {
    /// A file on disk, e.g. a shared object
    File(PathBuf),
    /// Anonymous memory with no name
    Anonymous,
    /// A kernel-named pseudo region such as `[stack]` or `[vdso]`
    Pseudo(String),
    /// The source did not say
    Unknown,
}

impl fmt::Display for RegionBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionBacking::File(path) => write!(f, "{}", path.display()),
            RegionBacking::Anonymous => Ok(()),
            RegionBacking::Pseudo(name) => f.write_str(name),
            RegionBacking::Unknown => f.write_str("?"),
        }
    }
}

/// A mapped region of a process's address space
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub start: Address,
    pub end: Address,
    pub permissions: Permissions,
    pub backing: RegionBacking,
    /// File offset of the mapping (procfs only)
    pub offset: Option<u64>,
    /// `major:minor` of the backing device (procfs only)
    pub device: Option<String>,
    /// Inode of the backing file, 0 for anonymous (procfs only)
    pub inode: Option<u64>,
    /// Region type reported by vmmap, e.g. `__TEXT`
    pub label: Option<String>,
}

impl MemoryRegion {
    /// Creates a region with no procfs or vmmap metadata
    pub fn new(start: Address, end: Address, permissions: Permissions, backing: RegionBacking) -> Self {
        MemoryRegion {
            start,
            end,
            permissions,
            backing,
            offset: None,
            device: None,
            inode: None,
            label: None,
        }
    }

    /// Size of the region in bytes
    pub fn size(&self) -> u64 {
        self.end.as_u64().saturating_sub(self.start.as_u64())
    }

    /// Checks if an address is within this region
    pub fn contains(&self, address: Address) -> bool {
        address >= self.start && address < self.end
    }

    /// Checks if a whole range lies within this region
    pub fn contains_range(&self, range: &MemoryRange) -> bool {
        range.start() >= self.start && range.end() <= self.end
    }

    /// Path of the backing file, if any
    pub fn file_path(&self) -> Option<&PathBuf> {
        match &self.backing {
            RegionBacking::File(path) => Some(path),
            _ => None,
        }
    }

    /// True when the two regions share at least one byte
    pub fn overlaps(&self, other: &MemoryRegion) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Lists every mapped region of `pid`, unfiltered
pub fn list_regions(platform: &Platform, pid: ProcessId) -> InspectResult<Capability<Vec<MemoryRegion>>> {
    match platform.strategy() {
        Strategy::ProcFs => maps::read_maps(platform.procfs(), pid).map(Capability::Supported),
        Strategy::ExternalTool => vmmap::run_vmmap(platform.vmmap(), pid)
            .map(|report| Capability::Supported(report.regions)),
        Strategy::Unsupported => {
            ensure_alive(pid)?;
            Ok(unsupported_regions())
        }
    }
}

/// Lists the executable regions of `pid`
///
/// On procfs the platform's [`ExecutablePolicy`] decides which permission
/// combinations qualify. On vmmap a region qualifies when its descriptor
/// carries an executable-segment marker. An empty supported result means
/// "none found", which is not a failure.
pub fn list_executable_regions(
    platform: &Platform,
    pid: ProcessId,
) -> InspectResult<Capability<Vec<MemoryRegion>>> {
    let regions = match platform.strategy() {
        Strategy::ProcFs => {
            let filter = RegionFilter::new(FilterCriteria::new().executable(platform.executable_policy()));
            filter.apply(&maps::read_maps(platform.procfs(), pid)?)
        }
        Strategy::ExternalTool => vmmap::run_vmmap(platform.vmmap(), pid)?.executable,
        Strategy::Unsupported => {
            ensure_alive(pid)?;
            return Ok(unsupported_regions());
        }
    };

    if regions.is_empty() {
        info!(pid, "no executable memory regions found");
    }
    Ok(Capability::Supported(regions))
}

fn unsupported_regions() -> Capability<Vec<MemoryRegion>> {
    Capability::unsupported(format!(
        "memory region inspection is not implemented for {}",
        std::env::consts::OS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(start: u64, end: u64) -> MemoryRegion {
        MemoryRegion::new(
            Address::new(start),
            Address::new(end),
            Permissions::new(true, false, true),
            RegionBacking::Anonymous,
        )
    }

    #[test]
    fn test_region_geometry() {
        let r = region(0x1000, 0x3000);
        assert_eq!(r.size(), 0x2000);
        assert!(r.contains(Address::new(0x1000)));
        assert!(r.contains(Address::new(0x2fff)));
        assert!(!r.contains(Address::new(0x3000)));

        let inside = MemoryRange::new(Address::new(0x1800), Address::new(0x3000)).unwrap();
        let straddling = MemoryRange::new(Address::new(0x2800), Address::new(0x3800)).unwrap();
        assert!(r.contains_range(&inside));
        assert!(!r.contains_range(&straddling));
    }

    #[test]
    fn test_overlaps() {
        assert!(region(0x1000, 0x2000).overlaps(&region(0x1fff, 0x3000)));
        assert!(!region(0x1000, 0x2000).overlaps(&region(0x2000, 0x3000)));
    }

    #[test]
    fn test_backing_display() {
        assert_eq!(RegionBacking::File("/bin/ls".into()).to_string(), "/bin/ls");
        assert_eq!(RegionBacking::Pseudo("[stack]".into()).to_string(), "[stack]");
        assert_eq!(RegionBacking::Anonymous.to_string(), "");
    }

    #[test]
    fn test_unsupported_platform_reports_capability_gap() {
        let platform = Platform::new(Strategy::Unsupported);
        let regions = list_executable_regions(&platform, std::process::id()).unwrap();
        assert!(!regions.is_supported());
        assert!(!list_regions(&platform, std::process::id()).unwrap().is_supported());
    }
}
