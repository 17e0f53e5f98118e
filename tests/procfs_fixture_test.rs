//! Integration tests against a fake procfs tree

use pretty_assertions::assert_eq;
use procscope::memory::{self, regions};
use procscope::process;
use procscope::{Address, Capability, ExecutablePolicy, InspectError, Platform, SkipReason, Strategy};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DAEMON_MAPS: &str = "\
00400000-00452000 r-xp 00000000 08:02 173521      /usr/bin/dbus-daemon
00651000-00652000 rw-p 00051000 08:02 173521      /usr/bin/dbus-daemon
00e03000-00e24000 rw-p 00000000 00:00 0           [heap]
35b1800000-35b1820000 r-xp 00000000 08:02 135522  /usr/lib64/ld-2.15.so
35b1a1f000-35b1a20000 rw-p 0001f000 08:02 135522  /usr/lib64/ld-2.15.so
7f2c0c000000-7f2c0c001000 rwxp 00000000 00:00 0
7fffb2c0d000-7fffb2c2e000 rw-p 00000000 00:00 0   [stack]
7fffb2d48000-7fffb2d49000 r-xp 00000000 00:00 0   [vdso]
";

struct FakeProc {
    dir: TempDir,
}

impl FakeProc {
    fn new() -> Self {
        FakeProc {
            dir: TempDir::new().unwrap(),
        }
    }

    fn pid_dir(&self, pid: u32) -> PathBuf {
        self.dir.path().join(pid.to_string())
    }

    fn process(self, pid: u32, comm: &str, tids: &[u64], maps: &str, mem: &[u8]) -> Self {
        let root = self.pid_dir(pid);
        fs::create_dir_all(root.join("task")).unwrap();
        fs::write(root.join("comm"), format!("{comm}\n")).unwrap();
        for tid in tids {
            fs::create_dir(root.join("task").join(tid.to_string())).unwrap();
        }
        fs::write(root.join("maps"), maps).unwrap();
        fs::write(root.join("mem"), mem).unwrap();
        self
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn platform(&self) -> Platform {
        Platform::new(Strategy::ProcFs).with_procfs_root(self.root())
    }
}

fn fixture() -> FakeProc {
    FakeProc::new()
        .process(1, "init", &[1], "", b"")
        .process(812, "dbus-daemon", &[812, 815, 813], DAEMON_MAPS, b"ABCDEFGHIJKLMNOP")
}

#[test]
fn test_enumerate_and_find_by_name() {
    let fake = fixture();
    fs::create_dir(fake.root().join("self")).unwrap();
    fs::write(fake.root().join("uptime"), "1.0 2.0\n").unwrap();

    let mut pids: Vec<_> = process::list_processes(&fake.platform())
        .unwrap()
        .resolved()
        .map(|p| p.pid)
        .collect();
    pids.sort();
    assert_eq!(pids, vec![1, 812]);

    let found = process::find_processes_by_name(&fake.platform(), "DBUS").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name.as_deref(), Some("dbus-daemon"));
}

#[test]
fn test_entry_without_comm_is_skipped_not_fatal() {
    let fake = fixture();
    fs::create_dir(fake.pid_dir(999)).unwrap();

    let entries: Vec<_> = process::list_processes(&fake.platform()).unwrap().collect();
    assert_eq!(entries.len(), 3);

    let skipped: Vec<_> = entries.iter().filter_map(|e| e.as_ref().err()).collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].pid, 999);
    assert_eq!(skipped[0].reason, SkipReason::Vanished);
}

#[test]
fn test_threads() {
    let fake = fixture();
    let tids: Vec<_> = process::list_threads(&fake.platform(), 812)
        .unwrap()
        .into_iter()
        .map(|t| t.tid)
        .collect();
    assert_eq!(tids, vec![812, 813, 815]);
}

#[test]
fn test_modules_are_distinct_file_paths() {
    let fake = fixture();
    let modules = process::list_modules(&fake.platform(), 812).unwrap().supported().unwrap();
    let paths: Vec<_> = modules.iter().map(|m| m.path.to_string_lossy().into_owned()).collect();
    assert_eq!(paths, vec!["/usr/bin/dbus-daemon", "/usr/lib64/ld-2.15.so"]);
}

#[test]
fn test_executable_regions_default_policy() {
    let fake = fixture();
    let regions = memory::list_executable_regions(&fake.platform(), 812)
        .unwrap()
        .supported()
        .unwrap();

    let starts: Vec<_> = regions.iter().map(|r| r.start.as_u64()).collect();
    assert_eq!(starts, vec![0x400000, 0x35b1800000, 0x7fffb2d48000]);
    assert!(regions.iter().all(|r| r.permissions.is_read_execute()));
}

#[test]
fn test_executable_regions_any_execute_policy() {
    let fake = fixture();
    let platform = fake.platform().with_executable_policy(ExecutablePolicy::AnyExecute);
    let regions = memory::list_executable_regions(&platform, 812).unwrap().supported().unwrap();
    assert_eq!(regions.len(), 4);
    assert!(regions.iter().any(|r| r.permissions.write));
}

#[test]
fn test_no_executable_regions_is_supported_and_empty() {
    let fake = fixture();
    let regions = memory::list_executable_regions(&fake.platform(), 1).unwrap();
    assert_eq!(regions, Capability::Supported(Vec::new()));
}

#[test]
fn test_full_region_listing_does_not_overlap() {
    let fake = fixture();
    let all = regions::list_regions(&fake.platform(), 812).unwrap().supported().unwrap();
    assert_eq!(all.len(), 8);
    for pair in all.windows(2) {
        assert!(pair[0].start < pair[0].end);
        assert!(pair[0].end <= pair[1].start);
    }
}

#[test]
fn test_read_memory_and_partial_read() {
    let fake = fixture();
    let platform = fake.platform();

    let snapshot = memory::read_memory(&platform, 812, Address::new(2), Address::new(6)).unwrap();
    assert_eq!(snapshot.bytes(), b"CDEF");

    let err = memory::read_memory(&platform, 812, Address::new(8), Address::new(24)).unwrap_err();
    assert!(matches!(
        err,
        InspectError::PartialRead {
            requested: 16,
            read: 8,
            ..
        }
    ));
}

#[test]
fn test_missing_pid_is_no_such_process_for_every_operation() {
    let fake = fixture();
    let platform = fake.platform();
    let pid = 4242;

    assert!(process::list_threads(&platform, pid).unwrap_err().is_no_such_process());
    assert!(process::list_modules(&platform, pid).unwrap_err().is_no_such_process());
    assert!(memory::list_executable_regions(&platform, pid)
        .unwrap_err()
        .is_no_such_process());
    assert!(memory::read_memory(&platform, pid, Address::new(0), Address::new(4))
        .unwrap_err()
        .is_no_such_process());
    assert!(memory::read_memory(&platform, pid, Address::new(4), Address::new(4))
        .unwrap_err()
        .is_no_such_process());
}

#[cfg(unix)]
#[test]
fn test_unreadable_maps_is_access_denied() {
    use std::os::unix::fs::PermissionsExt;

    // Root ignores file modes, so there is nothing to observe.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let fake = fixture();
    let maps = fake.pid_dir(812).join("maps");
    fs::set_permissions(&maps, fs::Permissions::from_mode(0o000)).unwrap();

    let err = process::list_modules(&fake.platform(), 812).unwrap_err();
    assert!(matches!(err, InspectError::AccessDenied { pid: 812, .. }));
}
