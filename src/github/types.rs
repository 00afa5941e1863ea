use serde::Deserialize;

/// Relay-style pagination info carried by every connection we page over.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// A connection returning `nodes` (stargazers, issues, pullRequests, and the
/// organization's repository list).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<N> {
    pub nodes: Vec<N>,
    pub page_info: PageInfo,
    pub total_count: Option<u64>,
}

/// An account with a login (stargazer, issue/PR author, committer user).
#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub login: String,
}

/// An issue or pull request node. The author is null for deleted accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct Authored {
    pub author: Option<Actor>,
}

/// Commit history uses `edges { node }` rather than `nodes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitHistory {
    pub edges: Vec<CommitEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitEdge {
    pub node: CommitNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitNode {
    pub committer: Committer,
}

/// The committer's `user` is null when the commit email is not linked to an
/// account.
#[derive(Debug, Clone, Deserialize)]
pub struct Committer {
    pub user: Option<Actor>,
}

/// `defaultBranchRef` for a repository; null for empty repositories.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    pub target: CommitTarget,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitTarget {
    pub history: CommitHistory,
}

/// Payload of a per-repository scan round. Fields omitted from the query are
/// absent from the response, so everything is optional; the scanner only
/// reads the fields it asked for.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryData {
    pub repository: RepositoryPage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryPage {
    pub is_private: Option<bool>,
    pub default_branch_ref: Option<BranchRef>,
    pub stargazers: Option<Connection<Actor>>,
    pub issues: Option<Connection<Authored>>,
    pub pull_requests: Option<Connection<Authored>>,
}

/// Payload of an organization-walk page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationData {
    pub organization: Organization,
    pub rate_limit: RateLimit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub repositories: Connection<OrgRepository>,
}

/// Repository node on the walk page, embedding the first commit-history page
/// of the default branch for the quick contribution check.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgRepository {
    pub name: String,
    pub default_branch_ref: Option<BranchRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub limit: i64,
    pub cost: i64,
    pub remaining: i64,
    pub reset_at: String,
}
