use tracing::{debug, info};

use super::merge::{scan_default_branch, PageScan};
use super::types::{ContributionRecord, WalkState};
use crate::github::query::organization_query;
use crate::github::types::OrganizationData;
use crate::github::{response_data, GithubError, GraphqlTransport};

/// Incremental walk over an organization's repositories.
///
/// Each call to [`next_page`](OrgWalker::next_page) pulls one 20-repository
/// page. Every repository node embeds the first commit-history page of its
/// default branch, which lets the walker settle most repositories without a
/// deep scan: an empty repository is skipped outright, and a repository
/// whose sole history page has no commit by the user is conclusively
/// commit-free and skipped as well. Everything else goes through the full
/// repository scan, and is yielded only when the user authored something
/// there (commits, issues or PRs; a lone star is not surfaced).
///
/// The walk position is advanced after every non-final page so the caller
/// can persist it and a later run resumes at the right page.
pub struct OrgWalker<'a> {
    transport: &'a dyn GraphqlTransport,
    org: &'a str,
    user: &'a str,
    state: WalkState,
    done: bool,
}

impl<'a> OrgWalker<'a> {
    pub fn new(
        transport: &'a dyn GraphqlTransport,
        org: &'a str,
        user: &'a str,
        state: WalkState,
    ) -> Self {
        Self {
            transport,
            org,
            user,
            state,
            done: false,
        }
    }

    /// Current walk position, for persisting between pages.
    pub fn state(&self) -> &WalkState {
        &self.state
    }

    /// Fetch and process the next repository page. Returns the records that
    /// passed the contribution filter, or `None` once the walk is finished.
    pub async fn next_page(&mut self) -> Result<Option<Vec<ContributionRecord>>, GithubError> {
        if self.done {
            return Ok(None);
        }

        let query = organization_query(self.org, self.state.last_cursor.as_deref());
        let response = self.transport.execute(&query).await?;
        let data: OrganizationData = response_data(response)?;
        let repos = data.organization.repositories;

        let mut records = Vec::new();
        for repo in &repos.nodes {
            if repo.default_branch_ref.is_none() {
                info!(repo = %repo.name, "skipping empty repository");
                continue;
            }

            let quick = scan_default_branch(repo.default_branch_ref.as_ref(), self.user);
            if quick == PageScan::Exhausted {
                // Conclusively no commits by the user, and the only history
                // page has been seen. Issue/PR-only contributions in such
                // repositories go undetected here.
                debug!(repo = %repo.name, "no commits on sole history page, skipping");
                continue;
            }

            let record = super::scan_repository(self.transport, self.org, &repo.name, self.user)
                .await?;
            if record.has_authored() {
                records.push(record);
            } else {
                debug!(repo = %record.full_name, "nothing authored, not recording");
            }
        }

        if repos.page_info.has_next_page {
            self.state.checked += repos.nodes.len() as u64;
            self.state.last_cursor = repos.page_info.end_cursor.clone();
            let rate = &data.rate_limit;
            info!(
                checked = self.state.checked,
                total = repos.total_count.unwrap_or(0),
                remaining = rate.remaining,
                limit = rate.limit,
                cost = rate.cost,
                reset_at = %rate.reset_at,
                cursor = ?self.state.last_cursor,
                "repository page done"
            );
        } else {
            self.done = true;
        }

        Ok(Some(records))
    }
}
