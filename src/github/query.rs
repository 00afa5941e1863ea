//! Query documents for the contribution scan.
//!
//! Fields are rendered from a typed per-field state rather than interpolated
//! from raw strings: resolved fields are omitted entirely (they would only
//! waste rate-limit cost), open fields carry their own pagination cursor, and
//! every string value goes through [`graphql_string`] escaping. Rendering is
//! deterministic for a given state.

use std::fmt::Write;

/// Page size for every paginated contribution field.
pub const FIELD_PAGE_SIZE: u32 = 100;

/// Repositories fetched per organization-walk page.
pub const REPOS_PER_PAGE: u32 = 20;

/// Resolution state of one paginated contribution field: either still open
/// (with the cursor to continue from) or resolved to a definitive answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub resolved: Option<bool>,
    /// Continuation cursor; `None` means start of list.
    pub cursor: Option<String>,
}

impl FieldState {
    pub fn is_open(&self) -> bool {
        self.resolved.is_none()
    }
}

/// Per-repository scan state driving the query builder. Each round of the
/// scanner narrows the set of open fields until everything is resolved.
#[derive(Debug, Clone, Default)]
pub struct ScanState {
    pub is_private: Option<bool>,
    pub commits: FieldState,
    pub stargazers: FieldState,
    pub issues: FieldState,
    pub pull_requests: FieldState,
}

impl ScanState {
    pub fn is_complete(&self) -> bool {
        self.is_private.is_some()
            && self.commits.resolved.is_some()
            && self.stargazers.resolved.is_some()
            && self.issues.resolved.is_some()
            && self.pull_requests.resolved.is_some()
    }
}

/// Render a GraphQL string literal, escaping quote, backslash and newline so
/// cursor or name values cannot break out of the document.
pub fn graphql_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Cursor argument: `null` at the start of a list, a quoted literal after.
fn cursor_literal(cursor: Option<&str>) -> String {
    match cursor {
        None => "null".to_string(),
        Some(cursor) => graphql_string(cursor),
    }
}

/// Commit-history selection on the default branch, shared by the repository
/// scan and the organization walk (the walk additionally wants totalCount).
fn history_selection(out: &mut String, indent: &str, cursor: Option<&str>, total_count: bool) {
    let _ = write!(
        out,
        "{indent}defaultBranchRef {{\n\
         {indent}  name\n\
         {indent}  target {{\n\
         {indent}    ... on Commit {{\n\
         {indent}      id\n\
         {indent}      history(first: {FIELD_PAGE_SIZE}, after: {after}) {{\n\
         {indent}        edges {{ node {{ committer {{ user {{ login }} }} }} }}\n\
         {indent}        pageInfo {{ hasNextPage endCursor }}\n",
        after = cursor_literal(cursor),
    );
    if total_count {
        let _ = writeln!(out, "{indent}        totalCount");
    }
    let _ = write!(
        out,
        "{indent}      }}\n\
         {indent}    }}\n\
         {indent}  }}\n\
         {indent}}}\n",
    );
}

/// Connection over `nodes` with the given selection (stargazers and the
/// issue/PR author lists).
fn nodes_selection(out: &mut String, field: &str, selection: &str, cursor: Option<&str>) {
    let _ = write!(
        out,
        "    {field}(first: {FIELD_PAGE_SIZE}, after: {after}) {{\n\
         \x20     nodes {{ {selection} }}\n\
         \x20     pageInfo {{ hasNextPage endCursor }}\n\
         \x20   }}\n",
        after = cursor_literal(cursor),
    );
}

/// Build the per-repository scan document, requesting only the fields still
/// open in `state`.
pub fn repository_query(owner: &str, name: &str, state: &ScanState) -> String {
    let mut body = String::new();
    if state.is_private.is_none() {
        body.push_str("    isPrivate\n");
    }
    if state.commits.is_open() {
        history_selection(&mut body, "    ", state.commits.cursor.as_deref(), false);
    }
    if state.stargazers.is_open() {
        nodes_selection(
            &mut body,
            "stargazers",
            "login",
            state.stargazers.cursor.as_deref(),
        );
    }
    if state.issues.is_open() {
        nodes_selection(
            &mut body,
            "issues",
            "author { login }",
            state.issues.cursor.as_deref(),
        );
    }
    if state.pull_requests.is_open() {
        nodes_selection(
            &mut body,
            "pullRequests",
            "author { login }",
            state.pull_requests.cursor.as_deref(),
        );
    }

    format!(
        "{{\n  repository(name: {name}, owner: {owner}) {{\n{body}  }}\n}}\n",
        name = graphql_string(name),
        owner = graphql_string(owner),
    )
}

/// Build one organization-walk page: a 20-repository slice, each repository
/// embedding its first commit-history page, plus rate-limit telemetry.
pub fn organization_query(org: &str, cursor: Option<&str>) -> String {
    let mut history = String::new();
    history_selection(&mut history, "        ", None, true);

    format!(
        "{{\n\
         \x20 organization(login: {org}) {{\n\
         \x20   repositories(first: {REPOS_PER_PAGE}, after: {after}) {{\n\
         \x20     nodes {{\n\
         \x20       name\n\
         {history}\
         \x20     }}\n\
         \x20     pageInfo {{ hasNextPage endCursor }}\n\
         \x20     totalCount\n\
         \x20   }}\n\
         \x20 }}\n\
         \x20 rateLimit {{ limit cost remaining resetAt }}\n\
         }}\n",
        org = graphql_string(org),
        after = cursor_literal(cursor),
    )
}
