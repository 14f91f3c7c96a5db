use super::{FailureReason, RepositoryMetrics, Snapshot};

/// Reported when the repository has no license.
pub const NO_LICENSE: &str = "No License";

/// Reported when the repository has no detected language.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Reduce the raw query results for one repository into its metrics.
///
/// Pure and deterministic. The upstream open-issue counter includes open pull requests, so those
/// are subtracted (saturating at zero). The name, the counters and the timestamps are required.
pub fn reduce(snapshot: &Snapshot) -> Result<RepositoryMetrics, FailureReason> {
    let descriptor = &snapshot.descriptor;

    let name = descriptor.name.clone().ok_or(FailureReason::MalformedSnapshot { field: "name" })?;
    let created_at = descriptor.created_at.ok_or(FailureReason::MalformedSnapshot { field: "created_at" })?;
    let updated_at = descriptor.updated_at.ok_or(FailureReason::MalformedSnapshot { field: "updated_at" })?;
    let pushed_at = descriptor.pushed_at.ok_or(FailureReason::MalformedSnapshot { field: "pushed_at" })?;
    let open_issues = descriptor.open_issues.ok_or(FailureReason::MalformedSnapshot { field: "open_issues" })?;
    let fork_count = descriptor.forks.ok_or(FailureReason::MalformedSnapshot { field: "forks" })?;
    let star_count = descriptor
        .stargazers_count
        .ok_or(FailureReason::MalformedSnapshot { field: "stargazers_count" })?;

    let license_name = descriptor
        .license
        .as_ref()
        .and_then(|license| license.name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or(NO_LICENSE)
        .to_string();

    let dominant_language = descriptor
        .language
        .as_deref()
        .filter(|language| !language.is_empty())
        .unwrap_or(UNKNOWN_LANGUAGE)
        .to_string();

    let open_issue_count = open_issues.saturating_sub(snapshot.open_pulls);

    Ok(RepositoryMetrics {
        name,
        open_pr_count: snapshot.open_pulls,
        closed_pr_count: snapshot.closed_pulls,
        fork_count,
        star_count,
        open_issue_count,
        closed_issue_count: snapshot.closed_issues,
        contributor_count: snapshot.contributors,
        branch_count: snapshot.branches,
        commit_count: snapshot.commits.map(|commits| commits.total),
        dominant_language,
        license_name,
        created_at,
        updated_at,
        pushed_at,
    })
}
