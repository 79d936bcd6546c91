use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A job posting as returned by the search flow, before it gets a client-side id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub description: String,
    /// 0.0 – 1.0, 1.0 being a perfect match for the profile.
    pub relevance_score: f64,
}

/// A job posting the service knows about. `url` is the natural key used for dedup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    /// Opaque id; generated when the incoming posting does not carry one.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub description: String,
    #[serde(default)]
    pub relevance_score: f64,
}

impl JobPosting {
    /// Returns the posting with its relevance score clamped into [0, 1].
    /// NaN scores become 0.
    pub fn normalized(mut self) -> Self {
        self.relevance_score = clamp_score(self.relevance_score);
        self
    }

    /// True when two postings refer to the same underlying job.
    pub fn same_job(&self, other: &JobPosting) -> bool {
        self.url == other.url
    }
}

/// True for absolute `http`/`https` URLs. Anything else cannot serve as a posting's identity.
pub fn is_web_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
        .unwrap_or(false)
}

impl From<JobListing> for JobPosting {
    fn from(listing: JobListing) -> Self {
        JobPosting {
            id: Uuid::new_v4(),
            title: listing.title,
            company: listing.company,
            location: listing.location,
            url: listing.url,
            description: listing.description,
            relevance_score: clamp_score(listing.relevance_score),
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
