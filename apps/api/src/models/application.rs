use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::JobPosting;
use crate::models::patch::double_option;

/// Workflow status of a tracked application. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Bookmarked,
    Draft,
    Applied,
    Viewed,
    Interviewing,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// All statuses in funnel order.
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Bookmarked,
        ApplicationStatus::Draft,
        ApplicationStatus::Applied,
        ApplicationStatus::Viewed,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Bookmarked => "Bookmarked",
            ApplicationStatus::Draft => "Draft",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Viewed => "Viewed",
            ApplicationStatus::Interviewing => "Interviewing",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job the user is following, with its workflow state and any tailored documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedApplication {
    pub id: Uuid,
    /// Snapshot of the posting taken when it was added.
    pub job: JobPosting,
    pub applied_date: Option<DateTime<Utc>>,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailored_resume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailored_cover_letter: Option<String>,
}

impl TrackedApplication {
    /// Builds a fresh record. Only `Applied` gets an applied date.
    pub fn new(job: JobPosting, status: ApplicationStatus, now: DateTime<Utc>) -> Self {
        TrackedApplication {
            id: Uuid::new_v4(),
            job: job.normalized(),
            applied_date: (status == ApplicationStatus::Applied).then_some(now),
            status,
            notes: None,
            tailored_resume: None,
            tailored_cover_letter: None,
        }
    }

    /// Shallow-merges a patch onto the record.
    ///
    /// Moving to `Applied` with no applied date (after the merge) stamps `now`.
    /// An applied date that is already set is left alone.
    pub fn apply(&mut self, patch: ApplicationPatch, now: DateTime<Utc>) {
        let ApplicationPatch {
            status,
            notes,
            applied_date,
            tailored_resume,
            tailored_cover_letter,
        } = patch;

        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = notes {
            self.notes = v;
        }
        if let Some(v) = applied_date {
            self.applied_date = v;
        }
        if let Some(v) = tailored_resume {
            self.tailored_resume = v;
        }
        if let Some(v) = tailored_cover_letter {
            self.tailored_cover_letter = v;
        }

        if status == Some(ApplicationStatus::Applied) && self.applied_date.is_none() {
            self.applied_date = Some(now);
        }
    }
}

/// Partial update for a tracked application. The job snapshot and id are not updatable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    #[serde(deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub applied_date: Option<Option<DateTime<Utc>>>,
    #[serde(deserialize_with = "double_option")]
    pub tailored_resume: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub tailored_cover_letter: Option<Option<String>>,
}

impl ApplicationPatch {
    #[cfg(test)]
    pub fn status(status: ApplicationStatus) -> Self {
        ApplicationPatch {
            status: Some(status),
            ..Default::default()
        }
    }
}
