//! Remote reference checker: which of a repository's branches still exist.

use tracing::{debug, instrument};

use crate::core::refs::{branch_ref, parse_ls_remote, presence};
use crate::core::types::RemotePresence;
use crate::error::RemoteError;
use crate::io::git::RefLister;

/// Query `repository` once for all `branches` and report presence per branch.
///
/// The lister is asked only about `refs/heads/<branch>` for the given names,
/// never for a full enumeration of the remote.
#[instrument(skip_all, fields(repository = %repository, branches = branches.len()))]
pub fn check_branches<L: RefLister + ?Sized>(
    lister: &L,
    repository: &str,
    branches: &[String],
) -> Result<Vec<RemotePresence>, RemoteError> {
    let refs: Vec<String> = branches.iter().map(|b| branch_ref(b)).collect();
    let listing = lister.list_heads(repository, &refs)?;
    let existing = parse_ls_remote(&listing);
    debug!(found = existing.len(), "remote listing parsed");
    Ok(presence(branches, &existing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedLister;

    #[test]
    fn asks_only_for_requested_refs() {
        let lister = ScriptedLister::new().with_heads("A", &["feat1"]);
        let branches = vec!["feat1".to_string(), "feat2".to_string()];

        let result = check_branches(&lister, "A", &branches).expect("check");
        assert_eq!(
            result,
            vec![
                RemotePresence {
                    branch: "feat1".to_string(),
                    exists: true,
                },
                RemotePresence {
                    branch: "feat2".to_string(),
                    exists: false,
                },
            ]
        );
        assert_eq!(
            lister.calls(),
            vec![(
                "A".to_string(),
                vec!["refs/heads/feat1".to_string(), "refs/heads/feat2".to_string()]
            )]
        );
    }

    #[test]
    fn lister_failure_is_returned() {
        let lister = ScriptedLister::new().with_failure("A", "connection refused");
        let err = check_branches(&lister, "A", &["main".to_string()]).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
