use serde::{Deserialize, Serialize};

use crate::models::patch::double_option;

/// Postal address. Every part is optional; the profile form fills them independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobPreferences {
    pub location: String,
    /// Comma-separated free text, e.g. "Backend Engineer, SRE".
    pub job_titles: String,
}

impl JobPreferences {
    /// Splits `job_titles` into trimmed, non-empty titles.
    pub fn titles(&self) -> Vec<&str> {
        self.job_titles
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// The single user profile held by the store.
///
/// The default value is the "no profile yet" state: empty name/email and no optionals.
/// Fields missing from a persisted blob take their default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume_file_name: Option<String>,
    /// Raw text extracted from the uploaded resume.
    pub resume_content: Option<String>,
    pub preferences: JobPreferences,
    pub cover_letter_template: Option<String>,
}

impl UserProfile {
    /// Resume text, if any non-blank content has been stored.
    pub fn resume_text(&self) -> Option<&str> {
        self.resume_content
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// Applies a shallow merge: only fields present in the patch are replaced.
    pub fn apply(&mut self, patch: ProfilePatch) {
        let ProfilePatch {
            name,
            email,
            phone,
            address,
            linkedin_url,
            github_url,
            portfolio_url,
            resume_file_name,
            resume_content,
            preferences,
            cover_letter_template,
        } = patch;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = phone {
            self.phone = v;
        }
        if let Some(v) = address {
            self.address = v;
        }
        if let Some(v) = linkedin_url {
            self.linkedin_url = v;
        }
        if let Some(v) = github_url {
            self.github_url = v;
        }
        if let Some(v) = portfolio_url {
            self.portfolio_url = v;
        }
        if let Some(v) = resume_file_name {
            self.resume_file_name = v;
        }
        if let Some(v) = resume_content {
            self.resume_content = v;
        }
        if let Some(v) = preferences {
            self.preferences = v;
        }
        if let Some(v) = cover_letter_template {
            self.cover_letter_template = v;
        }
    }
}

/// Partial profile update.
///
/// Nullable fields are tri-state: absent leaves the value alone, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub address: Option<Option<Address>>,
    #[serde(deserialize_with = "double_option")]
    pub linkedin_url: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub github_url: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub portfolio_url: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub resume_file_name: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub resume_content: Option<Option<String>>,
    pub preferences: Option<JobPreferences>,
    #[serde(deserialize_with = "double_option")]
    pub cover_letter_template: Option<Option<String>>,
}
