//! Tailoring flow: rewrites a resume (and optionally a cover letter) for one job description.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::flows::prompts::{
    COVER_LETTER_RULE, NO_COVER_LETTER_RULE, TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM,
};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorInput {
    pub resume: String,
    pub job_description: String,
    pub cover_letter: Option<String>,
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorOutput {
    pub tailored_resume: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailored_cover_letter: Option<String>,
}

impl TailorInput {
    /// Checks the fields the flow cannot work without.
    pub fn validate(&self) -> Result<(), String> {
        if self.resume.trim().is_empty() {
            return Err("resume cannot be empty".to_string());
        }
        if self.job_description.trim().is_empty() {
            return Err("jobDescription cannot be empty".to_string());
        }
        Ok(())
    }

    /// The cover letter to tailor, if a non-blank one was supplied.
    pub fn cover_letter(&self) -> Option<&str> {
        non_blank(self.cover_letter.as_deref())
    }

    pub fn job_title(&self) -> Option<&str> {
        non_blank(self.job_title.as_deref())
    }
}

pub fn build_tailor_prompt(input: &TailorInput) -> String {
    let rule = if input.cover_letter().is_some() {
        COVER_LETTER_RULE
    } else {
        NO_COVER_LETTER_RULE
    };

    fill_template(
        TAILOR_PROMPT_TEMPLATE,
        &[
            ("cover_letter_rule", rule),
            ("resume", input.resume.trim()),
            ("job_description", input.job_description.trim()),
            ("cover_letter", input.cover_letter().unwrap_or("")),
            ("job_title", input.job_title().unwrap_or("")),
        ],
    )
}

/// Enforces the cover-letter rule on model output: no input letter, no output letter.
/// A blank letter from the model is treated as absent.
pub fn finalize(input: &TailorInput, output: TailorOutput) -> TailorOutput {
    let tailored_cover_letter = if input.cover_letter().is_some() {
        output
            .tailored_cover_letter
            .filter(|letter| !letter.trim().is_empty())
    } else {
        None
    };

    TailorOutput {
        tailored_resume: output.tailored_resume,
        tailored_cover_letter,
    }
}

/// Runs the tailoring flow end to end. Call `validate` first.
pub async fn tailor_resume(llm: &LlmClient, input: &TailorInput) -> Result<TailorOutput, LlmError> {
    let prompt = build_tailor_prompt(input);
    let system = format!("{TAILOR_SYSTEM} {JSON_ONLY_SYSTEM}");

    let output: TailorOutput = llm.call_json(&prompt, &system).await?;
    if output.tailored_resume.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    let output = finalize(input, output);
    info!(
        "Tailored resume ({} chars), cover letter: {}",
        output.tailored_resume.len(),
        output.tailored_cover_letter.is_some()
    );
    Ok(output)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
