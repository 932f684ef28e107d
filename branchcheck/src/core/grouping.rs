//! Group roster records by repository.

use std::collections::HashMap;

use super::types::{RepositoryGroup, RosterRecord};

/// Build one group per repository, in first-seen repository order.
///
/// Each group lists the distinct branch names referenced for that repository,
/// in first-seen order, so the remote is asked about every branch exactly once.
pub fn group_by_repository(records: &[RosterRecord]) -> Vec<RepositoryGroup> {
    let mut groups: Vec<RepositoryGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index
            .entry(record.repository.as_str())
            .or_insert_with(|| {
                groups.push(RepositoryGroup {
                    repository: record.repository.clone(),
                    branches: Vec::new(),
                });
                groups.len() - 1
            });
        let group = &mut groups[slot];
        if !group.branches.iter().any(|b| b == &record.branch) {
            group.branches.push(record.branch.clone());
        }
    }

    groups
}
