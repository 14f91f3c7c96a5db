use super::{CommitCount, FailureReason, RepoRef, RepositoryApi, Snapshot};
use crate::Result;
use ohno::EnrichableExt;

const LOG_TARGET: &str = "   fetcher";

/// Upper bound on the entries counted for contributors, open pull requests and branches.
pub const PAGE_SIZE: u8 = 100;

/// Branch names tried, in order, to find the default branch's history.
pub const DEFAULT_BRANCH_CANDIDATES: &[&str] = &["main", "master"];

/// Issue every query needed to describe `repo`.
///
/// The queries run concurrently and are joined all-or-nothing: the first failure drops the
/// remaining in-flight requests and fails the whole fetch.
pub async fn fetch_snapshot<A: RepositoryApi>(api: &A, repo: &RepoRef) -> Result<Snapshot, FailureReason> {
    let closed_issues_query = format!("repo:{repo} is:issue is:closed");
    let closed_pulls_query = format!("repo:{repo} is:pr is:closed");

    let joined = tokio::try_join!(
        api.repository(repo),
        api.contributor_count(repo, PAGE_SIZE),
        api.open_pull_count(repo, PAGE_SIZE),
        api.branch_count(repo, PAGE_SIZE),
        api.search_count(&closed_issues_query),
        api.search_count(&closed_pulls_query),
        resolve_commit_count(api, repo),
    );

    let (descriptor, contributors, open_pulls, branches, closed_issues, closed_pulls, commits) =
        joined.map_err(|e| FailureReason::fetch(e.enrich(format!("fetching repository '{repo}'"))))?;

    log::debug!(
        target: LOG_TARGET,
        "Fetched '{repo}': {contributors} contributor(s), {open_pulls} open PR(s), {branches} branch(es), {closed_issues} closed issue(s), {closed_pulls} closed PR(s)"
    );

    if let Some(commits) = &commits {
        log::debug!(target: LOG_TARGET, "'{repo}' has {} commit(s) on '{}'", commits.total, commits.branch);
    }

    Ok(Snapshot {
        descriptor,
        contributors,
        open_pulls,
        branches,
        closed_issues,
        closed_pulls,
        commits,
    })
}

async fn resolve_commit_count<A: RepositoryApi>(api: &A, repo: &RepoRef) -> Result<Option<CommitCount>> {
    for &branch in DEFAULT_BRANCH_CANDIDATES {
        if let Some(total) = api.commit_count(repo, branch).await? {
            return Ok(Some(CommitCount { branch, total }));
        }
        log::debug!(target: LOG_TARGET, "Branch '{branch}' does not resolve for '{repo}'");
    }

    log::info!(target: LOG_TARGET, "No default branch found for '{repo}', commit count unavailable");
    Ok(None)
}
