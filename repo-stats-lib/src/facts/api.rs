use super::{RepoRef, RepositoryDescriptor};
use crate::Result;

/// The queries needed to describe a repository.
///
/// [`Client`](super::Client) implements this against the GitHub REST API. Each method maps a
/// non-success upstream answer to an error, except [`commit_count`](Self::commit_count) which
/// reports a branch that does not exist as `Ok(None)`.
pub trait RepositoryApi: Sync {
    fn repository(&self, repo: &RepoRef) -> impl Future<Output = Result<RepositoryDescriptor>> + Send;

    /// Number of contributors on the first page of at most `per_page` entries
    fn contributor_count(&self, repo: &RepoRef, per_page: u8) -> impl Future<Output = Result<u64>> + Send;

    /// Number of open pull requests on the first page of at most `per_page` entries
    fn open_pull_count(&self, repo: &RepoRef, per_page: u8) -> impl Future<Output = Result<u64>> + Send;

    /// Number of branches on the first page of at most `per_page` entries
    fn branch_count(&self, repo: &RepoRef, per_page: u8) -> impl Future<Output = Result<u64>> + Send;

    /// Total number of issues and pull requests matching a search query
    fn search_count(&self, query: &str) -> impl Future<Output = Result<u64>> + Send;

    /// Number of commits reachable from `branch`, or `None` if the branch does not resolve
    fn commit_count(&self, repo: &RepoRef, branch: &str) -> impl Future<Output = Result<Option<u64>>> + Send;
}
