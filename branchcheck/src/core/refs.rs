//! Branch reference naming and `git ls-remote` output parsing.

use std::collections::HashSet;

use super::types::RemotePresence;

const HEADS_PREFIX: &str = "refs/heads/";

/// Fully-qualified reference name for a branch.
pub fn branch_ref(branch: &str) -> String {
    format!("{HEADS_PREFIX}{branch}")
}

/// Collect the reference names (second tab-separated column) from
/// `git ls-remote` output. Lines without a second column are ignored.
pub fn parse_ls_remote(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Answer, for every requested branch, whether its reference is in `existing`.
pub fn presence(branches: &[String], existing: &HashSet<String>) -> Vec<RemotePresence> {
    branches
        .iter()
        .map(|branch| RemotePresence {
            branch: branch.clone(),
            exists: existing.contains(&branch_ref(branch)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_ref_is_fully_qualified() {
        assert_eq!(branch_ref("feature/login"), "refs/heads/feature/login");
    }

    #[test]
    fn parses_second_column() {
        let out = "1111111111111111111111111111111111111111\trefs/heads/feat1\n\
                   2222222222222222222222222222222222222222\trefs/heads/feat2\n";
        let refs = parse_ls_remote(out);
        assert_eq!(refs.len(), 2);
        assert!(refs.contains("refs/heads/feat1"));
        assert!(refs.contains("refs/heads/feat2"));
    }

    #[test]
    fn empty_and_malformed_lines_are_ignored() {
        let out = "\n   \nnot-a-ref-line\nabc\trefs/heads/main\r\n";
        let refs = parse_ls_remote(out);
        assert_eq!(refs.into_iter().collect::<Vec<_>>(), vec!["refs/heads/main"]);
    }

    #[test]
    fn presence_requires_exact_reference_match() {
        let existing = parse_ls_remote("abc\trefs/heads/feat1\n");
        let branches = vec!["feat1".to_string(), "feat".to_string()];
        assert_eq!(
            presence(&branches, &existing),
            vec![
                RemotePresence {
                    branch: "feat1".to_string(),
                    exists: true,
                },
                RemotePresence {
                    branch: "feat".to_string(),
                    exists: false,
                },
            ]
        );
    }
}
