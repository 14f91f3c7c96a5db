//! In-memory [`RepositoryApi`] used by unit tests.

use super::{License, RepoRef, RepositoryApi, RepositoryDescriptor};
use crate::Result;
use chrono::{DateTime, FixedOffset};
use core::time::Duration;
use ohno::app_err;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub struct FakeRepo {
    pub owner: &'static str,
    pub descriptor: RepositoryDescriptor,
    pub contributors: u64,
    pub open_pulls: u64,
    pub branches: u64,
    pub closed_issues: u64,
    pub closed_pulls: u64,
    pub commit_branches: Vec<(&'static str, u64)>,
    pub fail_branches: bool,
    pub delay: Duration,
}

fn timestamp(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

impl FakeRepo {
    /// The repository used throughout the end-to-end examples.
    pub fn widgets() -> Self {
        Self {
            owner: "acme",
            descriptor: RepositoryDescriptor {
                name: Some("widgets".to_string()),
                forks: Some(5),
                stargazers_count: Some(42),
                open_issues: Some(7),
                license: Some(License { name: Some("MIT".to_string()) }),
                language: Some("Go".to_string()),
                created_at: Some(timestamp("2019-03-04T10:20:30Z")),
                updated_at: Some(timestamp("2024-05-06T07:08:09Z")),
                pushed_at: Some(timestamp("2024-05-07T23:59:59Z")),
            },
            contributors: 3,
            open_pulls: 2,
            branches: 4,
            closed_issues: 10,
            closed_pulls: 6,
            commit_branches: vec![("main", 120)],
            fail_branches: false,
            delay: Duration::ZERO,
        }
    }

    pub fn named(name: &str) -> Self {
        let mut repo = Self::widgets();
        repo.descriptor.name = Some(name.to_string());
        repo
    }

    fn name(&self) -> &str {
        self.descriptor.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct FakeApi {
    repos: HashMap<String, FakeRepo>,
    search_queries: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, repo: FakeRepo) -> Self {
        let _ = self.repos.insert(format!("{}/{}", repo.owner, repo.name()), repo);
        self
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_queries.lock().unwrap().clone()
    }

    async fn lookup(&self, slug: &str) -> Result<&FakeRepo> {
        let repo = self.repos.get(slug).ok_or_else(|| app_err!("HTTP 404 Not Found for {slug}"))?;
        tokio::time::sleep(repo.delay).await;
        Ok(repo)
    }
}

impl RepositoryApi for FakeApi {
    async fn repository(&self, repo: &RepoRef) -> Result<RepositoryDescriptor> {
        Ok(self.lookup(&repo.to_string()).await?.descriptor.clone())
    }

    async fn contributor_count(&self, repo: &RepoRef, per_page: u8) -> Result<u64> {
        Ok(self.lookup(&repo.to_string()).await?.contributors.min(u64::from(per_page)))
    }

    async fn open_pull_count(&self, repo: &RepoRef, per_page: u8) -> Result<u64> {
        Ok(self.lookup(&repo.to_string()).await?.open_pulls.min(u64::from(per_page)))
    }

    async fn branch_count(&self, repo: &RepoRef, per_page: u8) -> Result<u64> {
        let found = self.lookup(&repo.to_string()).await?;
        if found.fail_branches {
            return Err(app_err!("HTTP 500 Internal Server Error for {repo}/branches"));
        }
        Ok(found.branches.min(u64::from(per_page)))
    }

    async fn search_count(&self, query: &str) -> Result<u64> {
        self.search_queries.lock().unwrap().push(query.to_string());

        let slug = query
            .split_whitespace()
            .find_map(|term| term.strip_prefix("repo:"))
            .ok_or_else(|| app_err!("query without repository: {query}"))?;
        let found = self.lookup(slug).await?;

        if query.contains("is:pr") {
            Ok(found.closed_pulls)
        } else {
            Ok(found.closed_issues)
        }
    }

    async fn commit_count(&self, repo: &RepoRef, branch: &str) -> Result<Option<u64>> {
        let found = self.lookup(&repo.to_string()).await?;
        Ok(found.commit_branches.iter().find(|(name, _)| *name == branch).map(|(_, total)| *total))
    }
}
