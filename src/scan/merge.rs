//! Page merging: turn one page of a contribution field into an explicit
//! outcome. A page either finds the user, proves the search exhausted, or
//! hands back the cursor to continue from.

use crate::github::query::FieldState;
use crate::github::types::{Actor, Authored, BranchRef, CommitHistory, Connection, PageInfo};

/// Outcome of scanning one page of a paginated contribution field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageScan {
    /// The target user appeared on this page; the field resolves true.
    Found,
    /// The user was absent and no pages remain; the field resolves false.
    Exhausted,
    /// The user was absent but more pages exist; continue from this cursor.
    Continue { cursor: String },
}

impl PageScan {
    /// Fold this page's outcome into the field's resolution state.
    pub fn apply(self, field: &mut FieldState) {
        match self {
            PageScan::Found => field.resolved = Some(true),
            PageScan::Exhausted => field.resolved = Some(false),
            PageScan::Continue { cursor } => field.cursor = Some(cursor),
        }
    }
}

fn outcome(found: bool, page: &PageInfo) -> PageScan {
    if found {
        return PageScan::Found;
    }
    match (page.has_next_page, &page.end_cursor) {
        (true, Some(cursor)) => PageScan::Continue {
            cursor: cursor.clone(),
        },
        _ => PageScan::Exhausted,
    }
}

/// Scan a commit-history page for the target user among the committers.
/// Commits whose email is not linked to an account have a null user and are
/// skipped.
pub fn scan_commit_history(history: &CommitHistory, user: &str) -> PageScan {
    let found = history.edges.iter().any(|edge| {
        edge.node
            .committer
            .user
            .as_ref()
            .is_some_and(|u| u.login == user)
    });
    outcome(found, &history.page_info)
}

/// Commit check entry point: a repository without a default branch is empty,
/// which resolves "no commits" immediately with no history to consult.
pub fn scan_default_branch(branch: Option<&BranchRef>, user: &str) -> PageScan {
    match branch {
        None => PageScan::Exhausted,
        Some(branch) => scan_commit_history(&branch.target.history, user),
    }
}

/// Scan a stargazer page for the target user's login.
pub fn scan_stargazers(page: &Connection<Actor>, user: &str) -> PageScan {
    let found = page.nodes.iter().any(|actor| actor.login == user);
    outcome(found, &page.page_info)
}

/// Scan an issue or pull-request page for the target user as author.
/// Entries with a null author (deleted accounts) are skipped.
pub fn scan_authors(page: &Connection<Authored>, user: &str) -> PageScan {
    let found = page
        .nodes
        .iter()
        .any(|item| item.author.as_ref().is_some_and(|a| a.login == user));
    outcome(found, &page.page_info)
}
