//! Job search flow: asks the LLM for postings on a job board that fit the user's profile.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::flows::prompts::{SEARCH_PROMPT_TEMPLATE, SEARCH_SYSTEM};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::job::{is_web_url, JobListing, JobPosting};
use crate::models::profile::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobBoard {
    Indeed,
    LinkedIn,
}

impl fmt::Display for JobBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobBoard::Indeed => f.write_str("Indeed"),
            JobBoard::LinkedIn => f.write_str("LinkedIn"),
        }
    }
}

/// Request body for a search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text profile description. Built from the stored profile when absent.
    pub user_profile: Option<String>,
    pub job_board: JobBoard,
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub job_board: JobBoard,
    pub results: Vec<JobPosting>,
}

/// Describes the stored profile for the search prompt.
///
/// Returns `None` when the profile has no resume text, since a search without one
/// produces nothing useful.
pub fn describe_profile(profile: &UserProfile) -> Option<String> {
    let resume = profile.resume_text()?;
    Some(format!(
        "Resume: {resume}\nPreferences: Location - {}, Job Titles - {}",
        profile.preferences.location.trim(),
        profile.preferences.titles().join(", ")
    ))
}

pub fn build_search_prompt(user_profile: &str, board: JobBoard, keywords: Option<&str>) -> String {
    let board = board.to_string();
    fill_template(
        SEARCH_PROMPT_TEMPLATE,
        &[
            ("user_profile", user_profile),
            ("job_board", &board),
            ("keywords", keywords.map(str::trim).unwrap_or("")),
        ],
    )
}

/// Gives every listing a fresh id and a score clamped to [0, 1]. Order is preserved.
///
/// Listings without an http(s) URL are dropped: the URL is what identifies a job once
/// it is tracked.
pub fn into_postings(listings: Vec<JobListing>) -> Vec<JobPosting> {
    listings
        .into_iter()
        .filter(|listing| {
            let valid = is_web_url(&listing.url);
            if !valid {
                warn!(
                    "Dropping search result '{}' at {}: invalid url {:?}",
                    listing.title, listing.company, listing.url
                );
            }
            valid
        })
        .map(JobPosting::from)
        .collect()
}

/// Runs the search flow end to end.
pub async fn search_jobs(
    llm: &LlmClient,
    user_profile: &str,
    board: JobBoard,
    keywords: Option<&str>,
) -> Result<Vec<JobPosting>, LlmError> {
    let prompt = build_search_prompt(user_profile, board, keywords);
    let system = format!("{SEARCH_SYSTEM} {JSON_ONLY_SYSTEM}");

    let listings: Vec<JobListing> = llm.call_json(&prompt, &system).await?;
    info!("Job search on {board} returned {} posting(s)", listings.len());

    Ok(into_postings(listings))
}
