use serde::{Deserialize, Serialize};

/// Contribution trail for one repository. Records are only constructed once
/// every field has resolved; partial state lives in the scanner's
/// `ScanState` and never leaves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRecord {
    /// "{owner}/{repo}", the cache key.
    pub full_name: String,
    pub is_private: bool,
    /// The queried user name (provenance of the booleans below).
    pub user: String,
    pub has_commits: bool,
    pub is_starred: bool,
    pub is_issue_author: bool,
    pub is_pr_author: bool,
}

impl ContributionRecord {
    /// Compliance rule for the report: a public repository must be starred,
    /// a private one must be starred and have an authored issue or PR.
    pub fn is_compliant(&self) -> bool {
        if self.is_private {
            self.is_starred && (self.is_issue_author || self.is_pr_author)
        } else {
            self.is_starred
        }
    }

    /// Whether the user authored anything here. Stargazer-only repositories
    /// are not surfaced by the organization walk.
    pub fn has_authored(&self) -> bool {
        self.has_commits || self.is_issue_author || self.is_pr_author
    }
}

impl std::fmt::Display for ContributionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} private={} commits={} starred={} issue_author={} pr_author={}",
            self.full_name,
            self.is_private,
            self.has_commits,
            self.is_starred,
            self.is_issue_author,
            self.is_pr_author,
        )
    }
}

/// Persisted position of an organization walk; lets an interrupted scan
/// resume at the right repository page instead of restarting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkState {
    pub last_cursor: Option<String>,
    pub checked: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_private: bool, starred: bool, issue: bool, pr: bool) -> ContributionRecord {
        ContributionRecord {
            full_name: "acme/widget".to_string(),
            is_private,
            user: "alice".to_string(),
            has_commits: true,
            is_starred: starred,
            is_issue_author: issue,
            is_pr_author: pr,
        }
    }

    #[test]
    fn test_public_compliance_requires_only_star() {
        assert!(record(false, true, false, false).is_compliant());
        assert!(!record(false, false, true, true).is_compliant());
    }

    #[test]
    fn test_private_compliance_requires_star_and_authorship() {
        assert!(record(true, true, true, false).is_compliant());
        assert!(record(true, true, false, true).is_compliant());
        assert!(!record(true, true, false, false).is_compliant());
        assert!(!record(true, false, true, true).is_compliant());
    }

    #[test]
    fn test_display_carries_all_flags() {
        let text = record(true, false, true, false).to_string();
        assert!(text.starts_with("acme/widget "));
        assert!(text.contains("private=true"));
        assert!(text.contains("starred=false"));
        assert!(text.contains("issue_author=true"));
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let original = record(false, true, false, true);
        let json = serde_json::to_string(&original).unwrap();
        let back: ContributionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
