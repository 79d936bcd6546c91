// Prompt constants for the search and tailoring flows.
// Placeholders are filled with llm_client::prompts::fill_template.

/// System prompt for job search.
pub const SEARCH_SYSTEM: &str = "You are an AI job search assistant. \
    You find job postings on job boards that fit a candidate's resume and preferences.";

/// Job search prompt. Replace: {user_profile}, {job_board}, {keywords}
pub const SEARCH_PROMPT_TEMPLATE: &str = r#"Find relevant job postings for this candidate.

User Profile: {user_profile}
Job Board: {job_board}
Keywords: {keywords}

Return a JSON ARRAY of job postings:
[
  {
    "title": "Senior Backend Engineer",
    "company": "Acme",
    "location": "Remote (US)",
    "url": "https://www.example.com/jobs/12345",
    "description": "Short description of the role",
    "relevanceScore": 0.85
  }
]

Rules:
1. `url` must be the full URL of the posting on the job board.
2. `relevanceScore` is a number between 0 and 1, 1 being a perfect match for the profile.
3. Return an empty array if nothing fits."#;

/// System prompt for tailoring.
pub const TAILOR_SYSTEM: &str = "You are an expert resume and cover letter tailoring assistant.";

/// Tailoring prompt. Replace: {resume}, {job_description}, {cover_letter}, {job_title}, {cover_letter_rule}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Tailor the provided resume to match the specific requirements and keywords of the job description.
{cover_letter_rule}

Here is the resume:
{resume}

Here is the job description:
{job_description}

Here is the existing cover letter (if applicable):
{cover_letter}

Here is the job title (if applicable):
{job_title}

Return a JSON object:
{
  "tailoredResume": "the full tailored resume as plain text",
  "tailoredCoverLetter": "the full tailored cover letter as plain text, or null"
}"#;

pub const COVER_LETTER_RULE: &str =
    "Also tailor the provided cover letter to the same job description.";

pub const NO_COVER_LETTER_RULE: &str =
    "No cover letter was provided: skip cover letter tailoring and set \"tailoredCoverLetter\" to null.";
