use super::RepositoryDescriptor;

/// Raw results of all queries made for one repository, before reduction.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub descriptor: RepositoryDescriptor,
    pub contributors: u64,
    pub open_pulls: u64,
    pub branches: u64,
    pub closed_issues: u64,
    pub closed_pulls: u64,
    pub commits: Option<CommitCount>,
}

/// Commit history length on the default branch that resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitCount {
    pub branch: &'static str,
    pub total: u64,
}
