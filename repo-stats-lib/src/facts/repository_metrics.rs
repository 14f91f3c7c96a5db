use chrono::{DateTime, FixedOffset, NaiveDate};

/// The normalized, flat description of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetrics {
    pub name: String,
    pub open_pr_count: u64,
    pub closed_pr_count: u64,
    pub fork_count: u64,
    pub star_count: u64,
    pub open_issue_count: u64,
    pub closed_issue_count: u64,
    pub contributor_count: u64,
    pub branch_count: u64,
    pub commit_count: Option<u64>,
    pub dominant_language: String,
    pub license_name: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub pushed_at: DateTime<FixedOffset>,
}

impl RepositoryMetrics {
    // Calendar days are read in each timestamp's own offset
    #[must_use]
    pub fn created_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    #[must_use]
    pub fn updated_date(&self) -> NaiveDate {
        self.updated_at.date_naive()
    }

    #[must_use]
    pub fn pushed_date(&self) -> NaiveDate {
        self.pushed_at.date_naive()
    }
}
