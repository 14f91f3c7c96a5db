use super::FailureReason;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use std::sync::Arc;
use url::Url;

/// Hosts accepted in repository URLs.
const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// An `owner/name` pair identifying one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: Arc<str>,
    name: Arc<str>,
}

impl RepoRef {
    #[must_use]
    pub fn new(owner: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self {
            owner: Arc::from(owner.as_ref()),
            name: Arc::from(name.as_ref()),
        }
    }

    /// Parse a repository URL or an `owner/name` slug.
    ///
    /// URLs must point at GitHub; their query and fragment are ignored. A URL without a scheme
    /// (`github.com/owner/name`) is read as `https`.
    pub fn parse(input: &str) -> Result<Self, FailureReason> {
        let invalid = |problem| FailureReason::InvalidReference {
            input: Arc::from(input),
            problem,
        };

        let trimmed = input.trim();
        let (owner, name) = match as_url(trimmed) {
            Some(url) => {
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(invalid("only http and https URLs are supported"));
                }

                if !url.host_str().is_some_and(|host| GITHUB_HOSTS.contains(&host)) {
                    return Err(invalid("not a github.com URL"));
                }

                let segments: Vec<_> = url.path_segments().map(Iterator::collect).unwrap_or_default();
                let (owner, name) = split_pair(&segments).ok_or_else(|| invalid("expected exactly 'owner/name'"))?;
                (owner.to_string(), name.to_string())
            }

            None => {
                let segments: Vec<_> = trimmed.split('/').collect();
                let (owner, name) = split_pair(&segments).ok_or_else(|| invalid("expected exactly 'owner/name'"))?;
                (owner.to_string(), name.to_string())
            }
        };

        let name = name.strip_suffix(".git").unwrap_or(&name);

        if owner.is_empty() || name.is_empty() {
            return Err(invalid("empty owner or repository name"));
        }

        if matches!(owner.as_str(), "." | "..") || matches!(name, "." | "..") {
            return Err(invalid("owner and repository name cannot be '.' or '..'"));
        }

        let forbidden = |c: char| c.is_whitespace() || matches!(c, '?' | '#' | '%');
        if owner.contains(forbidden) || name.contains(forbidden) {
            return Err(invalid("owner and repository name cannot contain whitespace, '?', '#' or '%'"));
        }

        Ok(Self::new(owner, name))
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoRef {
    type Err = FailureReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Split a list of repository references separated by commas and/or line breaks.
///
/// Entries are trimmed and empty entries are dropped.
pub fn split_references(text: &str) -> impl Iterator<Item = &str> {
    text.split([',', '\n', '\r']).map(str::trim).filter(|entry| !entry.is_empty())
}

/// Interpret `input` as a URL, if it looks like one.
fn as_url(input: &str) -> Option<Url> {
    let bare_host = GITHUB_HOSTS.iter().any(|host| {
        input
            .get(..=host.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&format!("{host}/")))
    });

    if bare_host {
        return Url::parse(&format!("https://{input}")).ok();
    }

    Url::parse(input).ok()
}

/// The two segments of an `owner/name` path, tolerating one trailing `/`.
fn split_pair<'a>(segments: &[&'a str]) -> Option<(&'a str, &'a str)> {
    match segments {
        [owner, name] | [owner, name, ""] => Some((*owner, *name)),
        _ => None,
    }
}
