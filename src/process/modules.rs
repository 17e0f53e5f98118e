//! Module enumeration and information retrieval

use crate::core::types::{Capability, InspectResult, ModuleInfo, ProcessId};
use crate::memory::regions::{maps, FilterCriteria, MemoryRegion, RegionFilter};
use crate::platform::{Platform, Strategy};
use std::collections::HashSet;
use tracing::debug;

/// Lists the shared objects mapped into `pid`
///
/// On procfs the module set is every distinct file backing a mapping, in
/// first-mapped order. Elsewhere the process is probed and an `Unsupported`
/// capability is returned, which is not the same as an empty module list.
pub fn list_modules(platform: &Platform, pid: ProcessId) -> InspectResult<Capability<Vec<ModuleInfo>>> {
    match platform.strategy() {
        Strategy::ProcFs => {
            let regions = maps::read_maps(platform.procfs(), pid)?;
            let modules = modules_from_regions(&regions);
            debug!(pid, count = modules.len(), "listed modules");
            Ok(Capability::Supported(modules))
        }
        Strategy::ExternalTool => {
            super::probe::ensure_alive(pid)?;
            Ok(Capability::unsupported(
                "Module listing is limited on macOS: vmmap reports mapped files but not \
                 which of them the loader considers modules",
            ))
        }
        Strategy::Unsupported => {
            super::probe::ensure_alive(pid)?;
            Ok(Capability::unsupported(format!(
                "module listing is not implemented for {}",
                std::env::consts::OS
            )))
        }
    }
}

/// Collapses file-backed regions into one module per path
pub fn modules_from_regions(regions: &[MemoryRegion]) -> Vec<ModuleInfo> {
    let backed = RegionFilter::new(FilterCriteria::new().file_backed()).apply(regions);
    let mut seen = HashSet::new();
    backed
        .iter()
        .filter_map(MemoryRegion::file_path)
        .filter(|path| seen.insert(path.as_path()))
        .map(|path| ModuleInfo::new(path.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const MAPS: &str = "\
5581a0000000-5581a0002000 r--p 00000000 08:02 1001   /usr/bin/sleep
5581a0002000-5581a0006000 r-xp 00002000 08:02 1001   /usr/bin/sleep
5581a1000000-5581a1021000 rw-p 00000000 00:00 0      [heap]
7f20a0000000-7f20a0028000 r--p 00000000 08:02 2002   /usr/lib/x86_64-linux-gnu/libc.so.6
7f20a0028000-7f20a01bd000 r-xp 00028000 08:02 2002   /usr/lib/x86_64-linux-gnu/libc.so.6
7f20a0300000-7f20a0302000 rw-p 00000000 00:00 0
7f20a0400000-7f20a042a000 r-xp 00001000 08:02 3003   /usr/lib/x86_64-linux-gnu/ld-linux-x86-64.so.2
7ffc10000000-7ffc10021000 rw-p 00000000 00:00 0      [stack]
";

    fn fake_maps(pid: &str, table: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(pid)).unwrap();
        fs::write(dir.path().join(pid).join("maps"), table).unwrap();
        dir
    }

    #[test]
    fn test_distinct_paths_in_first_seen_order() {
        let modules = modules_from_regions(&maps::parse_maps(MAPS));
        let paths: Vec<_> = modules.iter().map(|m| m.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/usr/bin/sleep"),
                PathBuf::from("/usr/lib/x86_64-linux-gnu/libc.so.6"),
                PathBuf::from("/usr/lib/x86_64-linux-gnu/ld-linux-x86-64.so.2"),
            ]
        );
        assert_eq!(modules[1].file_name(), Some("libc.so.6"));
    }

    #[test]
    fn test_list_modules_from_procfs_tree() {
        let dir = fake_maps("4242", MAPS);
        let platform = Platform::new(Strategy::ProcFs).with_procfs_root(dir.path());

        let modules = list_modules(&platform, 4242).unwrap().supported().unwrap();
        assert_eq!(modules.len(), 3);

        let err = list_modules(&platform, 4243).unwrap_err();
        assert!(err.is_no_such_process());
    }

    #[test]
    fn test_only_anonymous_mappings_yield_empty_supported_list() {
        let dir = fake_maps("7", "7f0000000000-7f0000001000 rw-p 00000000 00:00 0\n");
        let platform = Platform::new(Strategy::ProcFs).with_procfs_root(dir.path());

        let modules = list_modules(&platform, 7).unwrap();
        assert_eq!(modules, Capability::Supported(Vec::new()));
    }

    #[cfg(unix)]
    #[test]
    fn test_external_tool_strategy_reports_unsupported() {
        let platform = Platform::new(Strategy::ExternalTool);

        let modules = list_modules(&platform, std::process::id()).unwrap();
        assert!(modules
            .unsupported_reason()
            .is_some_and(|reason| reason.contains("macOS")));

        assert!(list_modules(&platform, 0).unwrap_err().is_no_such_process());
    }
}
