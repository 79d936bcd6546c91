// LLM-backed flows: job search and resume/cover-letter tailoring.
// Both are single request/response calls through llm_client. Handlers await them outside
// the store lock and hand the results to the store as plain data.

pub mod handlers;
pub mod prompts;
pub mod search;
pub mod tailor;
