pub mod merge;
pub mod types;
pub mod walk;

pub use types::{ContributionRecord, WalkState};

use tracing::{debug, instrument};

use crate::github::query::{repository_query, ScanState};
use crate::github::types::RepositoryData;
use crate::github::{response_data, GithubError, GraphqlTransport};
use merge::{scan_authors, scan_default_branch, scan_stargazers};

/// Resolve the full contribution record for one repository.
///
/// Loops build-query → POST → merge-page until the privacy flag and all four
/// paginated fields have resolved. Each round either resolves a field or
/// advances its cursor, so the loop terminates. Any transport or shape error
/// aborts the scan without producing a partial record.
#[instrument(skip(transport))]
pub async fn scan_repository(
    transport: &dyn GraphqlTransport,
    owner: &str,
    name: &str,
    user: &str,
) -> Result<ContributionRecord, GithubError> {
    let mut state = ScanState::default();
    let mut rounds = 0u32;

    loop {
        if let Some(record) = completed_record(&state, owner, name, user) {
            debug!(rounds, "repository scan complete");
            return Ok(record);
        }

        let query = repository_query(owner, name, &state);
        let response = transport.execute(&query).await?;
        let data: RepositoryData = response_data(response)?;
        let repo = data.repository;
        rounds += 1;

        if state.is_private.is_none() {
            state.is_private =
                Some(repo.is_private.ok_or(GithubError::MissingField("isPrivate"))?);
        }
        if state.commits.is_open() {
            scan_default_branch(repo.default_branch_ref.as_ref(), user).apply(&mut state.commits);
        }
        if state.stargazers.is_open() {
            let page = repo
                .stargazers
                .ok_or(GithubError::MissingField("stargazers"))?;
            scan_stargazers(&page, user).apply(&mut state.stargazers);
        }
        if state.issues.is_open() {
            let page = repo.issues.ok_or(GithubError::MissingField("issues"))?;
            scan_authors(&page, user).apply(&mut state.issues);
        }
        if state.pull_requests.is_open() {
            let page = repo
                .pull_requests
                .ok_or(GithubError::MissingField("pullRequests"))?;
            scan_authors(&page, user).apply(&mut state.pull_requests);
        }
    }
}

/// A finished record, or `None` while any field is still open.
fn completed_record(
    state: &ScanState,
    owner: &str,
    name: &str,
    user: &str,
) -> Option<ContributionRecord> {
    Some(ContributionRecord {
        full_name: format!("{owner}/{name}"),
        is_private: state.is_private?,
        user: user.to_string(),
        has_commits: state.commits.resolved?,
        is_starred: state.stargazers.resolved?,
        is_issue_author: state.issues.resolved?,
        is_pr_author: state.pull_requests.resolved?,
    })
}

/// JSON fixture builders shared by the scanner and walker tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn page_info(has_next: bool, cursor: Option<&str>) -> Value {
        json!({"hasNextPage": has_next, "endCursor": cursor})
    }

    pub fn history(committers: &[&str], has_next: bool, cursor: Option<&str>) -> Value {
        let edges: Vec<_> = committers
            .iter()
            .map(|login| json!({"node": {"committer": {"user": {"login": login}}}}))
            .collect();
        json!({"edges": edges, "pageInfo": page_info(has_next, cursor)})
    }

    pub fn branch_ref(committers: &[&str], has_next: bool, cursor: Option<&str>) -> Value {
        json!({"target": {"history": history(committers, has_next, cursor)}})
    }

    pub fn login_nodes(logins: &[&str], has_next: bool, cursor: Option<&str>) -> Value {
        let nodes: Vec<_> = logins.iter().map(|l| json!({"login": l})).collect();
        json!({"nodes": nodes, "pageInfo": page_info(has_next, cursor)})
    }

    pub fn author_nodes(logins: &[&str], has_next: bool, cursor: Option<&str>) -> Value {
        let nodes: Vec<_> = logins
            .iter()
            .map(|l| json!({"author": {"login": l}}))
            .collect();
        json!({"nodes": nodes, "pageInfo": page_info(has_next, cursor)})
    }

    /// A single-round scan response where every field is exhausted on its
    /// first page.
    pub fn one_shot_scan_response(
        is_private: bool,
        committers: &[&str],
        stargazers: &[&str],
        issue_authors: &[&str],
        pr_authors: &[&str],
    ) -> Value {
        json!({
            "data": {
                "repository": {
                    "isPrivate": is_private,
                    "defaultBranchRef": branch_ref(committers, false, None),
                    "stargazers": login_nodes(stargazers, false, None),
                    "issues": author_nodes(issue_authors, false, None),
                    "pullRequests": author_nodes(pr_authors, false, None),
                }
            }
        })
    }
}
