//! Decide which roster records survive.

use std::collections::HashMap;

use super::types::{RemotePresence, RosterRecord, Verdict};

/// Presence results keyed by repository, then by branch name.
pub type PresenceMap = HashMap<String, HashMap<String, bool>>;

/// Insert one repository's query results into `map`.
pub fn record_presence(map: &mut PresenceMap, repository: &str, results: Vec<RemotePresence>) {
    let entry = map.entry(repository.to_string()).or_default();
    for result in results {
        entry.insert(result.branch, result.exists);
    }
}

/// Produce one verdict per record, in original order.
///
/// A record survives only if its repository was queried and its branch was
/// reported present. Anything not in `presence` is treated as gone.
pub fn judge(records: &[RosterRecord], presence: &PresenceMap) -> Vec<Verdict> {
    records
        .iter()
        .map(|record| {
            let exists = presence
                .get(&record.repository)
                .and_then(|branches| branches.get(&record.branch))
                .copied()
                .unwrap_or(false);
            Verdict {
                record: record.clone(),
                exists,
            }
        })
        .collect()
}

/// Records whose verdict is `exists`, order preserved.
pub fn survivors(verdicts: &[Verdict]) -> Vec<RosterRecord> {
    verdicts
        .iter()
        .filter(|v| v.exists)
        .map(|v| v.record.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    fn present(branch: &str, exists: bool) -> RemotePresence {
        RemotePresence {
            branch: branch.to_string(),
            exists,
        }
    }

    #[test]
    fn keeps_only_present_branches_in_original_order() {
        let records = vec![
            record("A", "feat1", "alice"),
            record("B", "feat3", "carol"),
            record("A", "feat2", "bob"),
            record("A", "feat1", "dave"),
        ];
        let mut map = PresenceMap::new();
        record_presence(&mut map, "A", vec![present("feat1", true), present("feat2", false)]);
        record_presence(&mut map, "B", vec![present("feat3", true)]);

        let kept = survivors(&judge(&records, &map));
        assert_eq!(
            kept,
            vec![
                record("A", "feat1", "alice"),
                record("B", "feat3", "carol"),
                record("A", "feat1", "dave"),
            ]
        );
    }

    #[test]
    fn unqueried_repository_counts_as_gone() {
        let records = vec![record("C", "main", "erin")];
        let verdicts = judge(&records, &PresenceMap::new());
        assert!(!verdicts[0].exists);
    }
}
