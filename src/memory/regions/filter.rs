//! Memory region filtering functionality

use super::{ExecutablePolicy, MemoryRegion};

/// Criteria for filtering memory regions
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Keep only regions the policy calls executable
    pub executable: Option<ExecutablePolicy>,
    /// Keep only regions backed by a file
    pub file_backed_only: bool,
}

impl FilterCriteria {
    /// Create a new filter criteria builder
    pub fn new() -> Self {
        FilterCriteria::default()
    }

    /// Filter for executable regions under `policy`
    pub fn executable(mut self, policy: ExecutablePolicy) -> Self {
        self.executable = Some(policy);
        self
    }

    /// Filter for file-backed regions only
    pub fn file_backed(mut self) -> Self {
        self.file_backed_only = true;
        self
    }
}

/// Filter for memory regions
#[derive(Debug, Clone, Default)]
pub struct RegionFilter {
    criteria: FilterCriteria,
}

impl RegionFilter {
    /// Create a new region filter with the given criteria
    pub fn new(criteria: FilterCriteria) -> Self {
        RegionFilter { criteria }
    }

    /// Apply the filter to a list of regions, keeping their order
    pub fn apply(&self, regions: &[MemoryRegion]) -> Vec<MemoryRegion> {
        regions
            .iter()
            .filter(|region| self.matches(region))
            .cloned()
            .collect()
    }

    /// Check if a region matches the filter criteria
    pub fn matches(&self, region: &MemoryRegion) -> bool {
        let criteria = &self.criteria;

        if let Some(policy) = criteria.executable {
            if !policy.matches(&region.permissions) {
                return false;
            }
        }

        if criteria.file_backed_only && region.file_path().is_none() {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Address;
    use crate::memory::regions::maps::parse_maps;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "\
00400000-00452000 r-xp 00000000 08:02 173521      /usr/bin/dbus-daemon
00651000-00652000 rw-p 00051000 08:02 173521      /usr/bin/dbus-daemon
00e03000-00e24000 rw-p 00000000 00:00 0           [heap]
7f0000000000-7f0000001000 rwxp 00000000 00:00 0
7f0000200000-7f0000201000 --xp 00000000 00:00 0
7ffd5e000000-7ffd5e021000 rw-p 00000000 00:00 0   [stack]
";

    #[test]
    fn test_filter_criteria_builder() {
        let criteria = FilterCriteria::new().file_backed();
        assert!(criteria.file_backed_only);
        assert_eq!(criteria.executable, None);

        let criteria = criteria.executable(ExecutablePolicy::AnyExecute);
        assert_eq!(criteria.executable, Some(ExecutablePolicy::AnyExecute));
    }

    #[test]
    fn test_read_execute_policy_keeps_only_rx() {
        let regions = parse_maps(TABLE);
        let filter = RegionFilter::new(FilterCriteria::new().executable(ExecutablePolicy::ReadExecute));

        let kept = filter.apply(&regions);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start, Address::new(0x400000));
    }

    #[test]
    fn test_any_execute_policy_keeps_wx_and_x_only() {
        let regions = parse_maps(TABLE);
        let filter = RegionFilter::new(FilterCriteria::new().executable(ExecutablePolicy::AnyExecute));

        let starts: Vec<_> = filter.apply(&regions).iter().map(|r| r.start.as_u64()).collect();
        assert_eq!(starts, vec![0x400000, 0x7f0000000000, 0x7f0000200000]);
    }

    #[test]
    fn test_file_backed_and_executable_combine() {
        let regions = parse_maps(TABLE);

        let files = RegionFilter::new(FilterCriteria::new().file_backed());
        assert_eq!(files.apply(&regions).len(), 2);

        let code = RegionFilter::new(
            FilterCriteria::new()
                .file_backed()
                .executable(ExecutablePolicy::AnyExecute),
        );
        let kept = code.apply(&regions);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start, Address::new(0x400000));
    }

    #[test]
    fn test_empty_criteria_keeps_everything() {
        let regions = parse_maps(TABLE);
        assert_eq!(RegionFilter::default().apply(&regions), regions);
    }
}
