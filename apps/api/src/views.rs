//! Derived views over the tracked-application collection.
//!
//! Everything here is a pure function of the collection and the query. Nothing is cached.

use chrono::{DateTime, Utc};
use serde::de::value::StrDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::application::{ApplicationStatus, TrackedApplication};

/// Query parameters for the applications list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationQuery {
    /// Exact status match; `None` passes everything through. An empty value or `all`
    /// also means no filter.
    #[serde(default, deserialize_with = "status_filter")]
    pub status: Option<ApplicationStatus>,
    /// Case-insensitive substring matched against job title or company.
    pub search: Option<String>,
}

/// Headline counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub applied: usize,
    pub interviewing: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
}

pub fn filter_by_status(
    apps: &[TrackedApplication],
    status: Option<ApplicationStatus>,
) -> Vec<TrackedApplication> {
    apps.iter()
        .filter(|a| status.map_or(true, |s| a.status == s))
        .cloned()
        .collect()
}

pub fn filter_by_search(apps: &[TrackedApplication], term: &str) -> Vec<TrackedApplication> {
    let needle = term.to_lowercase();
    apps.iter()
        .filter(|a| matches_search(a, &needle))
        .cloned()
        .collect()
}

/// Sorts by applied date, newest first. Undated records sort as the Unix epoch, i.e. last.
/// The sort is stable, so equal dates keep their collection order.
pub fn sort_by_applied_date(apps: &mut [TrackedApplication]) {
    apps.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
}

/// Status filter → search → date sort.
pub fn apply_view(apps: &[TrackedApplication], query: &ApplicationQuery) -> Vec<TrackedApplication> {
    let by_status = filter_by_status(apps, query.status);
    let mut view = match query.search.as_deref() {
        Some(term) => filter_by_search(&by_status, term),
        None => by_status,
    };
    sort_by_applied_date(&mut view);
    view
}

pub fn summarize(apps: &[TrackedApplication]) -> ApplicationSummary {
    ApplicationSummary {
        total: apps.len(),
        applied: count_status(apps, ApplicationStatus::Applied),
        interviewing: count_status(apps, ApplicationStatus::Interviewing),
    }
}

/// Count per status in funnel order, including statuses with no records.
pub fn status_breakdown(apps: &[TrackedApplication]) -> Vec<StatusCount> {
    ApplicationStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: count_status(apps, status),
        })
        .collect()
}

fn count_status(apps: &[TrackedApplication], status: ApplicationStatus) -> usize {
    apps.iter().filter(|a| a.status == status).count()
}

/// `needle` must already be lowercased. An empty needle matches everything.
fn matches_search(app: &TrackedApplication, needle: &str) -> bool {
    needle.is_empty()
        || app.job.title.to_lowercase().contains(needle)
        || app.job.company.to_lowercase().contains(needle)
}

fn sort_key(app: &TrackedApplication) -> DateTime<Utc> {
    app.applied_date.unwrap_or(DateTime::UNIX_EPOCH)
}

fn status_filter<'de, D>(deserializer: D) -> Result<Option<ApplicationStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    let value: StrDeserializer<'_, D::Error> = raw.into_deserializer();
    ApplicationStatus::deserialize(value).map(Some)
}
