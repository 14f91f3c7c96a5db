//! A wiremock stand-in for the handful of GitHub endpoints used per repository.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone)]
pub struct MockRepo {
    pub owner: &'static str,
    pub name: &'static str,
    pub forks: u64,
    pub stars: u64,
    pub open_issues: u64,
    pub license: Option<&'static str>,
    pub language: Option<&'static str>,
    pub created_at: Option<&'static str>,
    pub contributors: usize,
    pub open_pulls: usize,
    pub branches: usize,
    pub closed_issues: u64,
    pub closed_pulls: u64,
    /// Branch holding the history and its commit count; other branches answer 404
    pub commits: Option<(&'static str, u64)>,
}

impl MockRepo {
    /// `acme/widgets` as described in the README example.
    pub const fn widgets() -> Self {
        Self {
            owner: "acme",
            name: "widgets",
            forks: 5,
            stars: 42,
            open_issues: 7,
            license: Some("MIT"),
            language: Some("Go"),
            created_at: Some("2019-03-04T10:20:30Z"),
            contributors: 3,
            open_pulls: 2,
            branches: 4,
            closed_issues: 10,
            closed_pulls: 6,
            commits: Some(("main", 120)),
        }
    }

    pub const fn gadgets() -> Self {
        Self {
            owner: "acme",
            name: "gadgets",
            forks: 0,
            stars: 1,
            open_issues: 0,
            license: None,
            language: None,
            created_at: Some("2021-01-02T03:04:05Z"),
            contributors: 1,
            open_pulls: 0,
            branches: 1,
            closed_issues: 0,
            closed_pulls: 0,
            commits: Some(("master", 7)),
        }
    }

    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    fn descriptor(&self) -> Value {
        json!({
            "name": self.name,
            "full_name": self.slug(),
            "forks": self.forks,
            "forks_count": self.forks,
            "stargazers_count": self.stars,
            "open_issues": self.open_issues,
            "open_issues_count": self.open_issues,
            "license": self.license.map(|name| json!({ "key": name.to_lowercase(), "name": name })),
            "language": self.language,
            "created_at": self.created_at,
            "updated_at": "2024-05-06T07:08:09Z",
            "pushed_at": "2024-05-07T23:59:59Z",
        })
    }
}

/// A JSON array of `n` placeholder objects.
pub fn items(n: usize) -> Value {
    Value::Array((0..n).map(|i| json!({ "id": i })).collect())
}

/// Mount every endpoint needed to analyse `repo`.
pub async fn mount_repo(server: &MockServer, repo: &MockRepo) {
    let base = format!("/repos/{}", repo.slug());

    Mock::given(method("GET"))
        .and(path(base.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo.descriptor()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{base}/contributors")))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items(repo.contributors)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{base}/pulls")))
        .and(query_param("state", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items(repo.open_pulls)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{base}/branches")))
        .respond_with(ResponseTemplate::new(200).set_body_json(items(repo.branches)))
        .mount(server)
        .await;

    mount_search(server, &format!("repo:{} is:issue is:closed", repo.slug()), repo.closed_issues).await;
    mount_search(server, &format!("repo:{} is:pr is:closed", repo.slug()), repo.closed_pulls).await;

    // Lower priority than the branch-specific mock below
    Mock::given(method("GET"))
        .and(path(format!("{base}/commits")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "No commit found for SHA" })))
        .with_priority(10)
        .mount(server)
        .await;

    if let Some((branch, total)) = repo.commits {
        let link = format!(
            r#"<{uri}{base}/commits?sha={branch}&per_page=1&page=2>; rel="next", <{uri}{base}/commits?sha={branch}&per_page=1&page={total}>; rel="last""#,
            uri = server.uri()
        );

        Mock::given(method("GET"))
            .and(path(format!("{base}/commits")))
            .and(query_param("sha", branch))
            .respond_with(ResponseTemplate::new(200).set_body_json(items(1)).insert_header("link", link.as_str()))
            .with_priority(1)
            .mount(server)
            .await;
    }
}

async fn mount_search(server: &MockServer, query: &str, total: u64) {
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": total,
            "incomplete_results": false,
            "items": [],
        })))
        .mount(server)
        .await;
}
