use crate::Result;
use crate::facts::{NO_LICENSE, RepositoryMetrics};
use chrono::{DateTime, FixedOffset};
use core::fmt::{Display, Write};
use owo_colors::OwoColorize;

/// Render one repository as a block of `Label: value` lines.
pub fn generate<W: Write>(metrics: &RepositoryMetrics, use_colors: bool, writer: &mut W) -> Result<()> {
    let w = &mut LineWriter { writer, use_colors };

    w.line("Repository", &metrics.name)?;
    w.line("Created", &format_timestamp(metrics.created_at))?;
    w.line("Updated", &format_timestamp(metrics.updated_at))?;
    w.line("Pushed", &format_timestamp(metrics.pushed_at))?;
    w.line("Dominant Language", &metrics.dominant_language)?;

    // An unlicensed repository gets a bare marker instead of a labeled line
    if metrics.license_name == NO_LICENSE {
        if use_colors {
            writeln!(w.writer, "{}", NO_LICENSE.yellow())?;
        } else {
            writeln!(w.writer, "{NO_LICENSE}")?;
        }
    } else {
        w.line("License", &metrics.license_name)?;
    }

    w.line("Forks", &metrics.fork_count)?;
    w.line("Stars", &metrics.star_count)?;
    w.line("Open PR", &metrics.open_pr_count)?;
    w.line("Closed PR", &metrics.closed_pr_count)?;
    w.line("Open Issues", &metrics.open_issue_count)?;
    w.line("Closed Issues", &metrics.closed_issue_count)?;
    w.line("Contributors", &metrics.contributor_count)?;
    w.line("Branches", &metrics.branch_count)?;

    if let Some(commits) = metrics.commit_count {
        w.line("Commits", &commits)?;
    }

    Ok(())
}

struct LineWriter<'a, W> {
    writer: &'a mut W,
    use_colors: bool,
}

impl<W: Write> LineWriter<'_, W> {
    fn line(&mut self, label: &str, value: &dyn Display) -> core::fmt::Result {
        if self.use_colors {
            writeln!(self.writer, "{}: {value}", label.bold())
        } else {
            writeln!(self.writer, "{label}: {value}")
        }
    }
}

fn format_timestamp(at: DateTime<FixedOffset>) -> String {
    at.format("%Y-%m-%d at %H:%M:%S").to_string()
}
