// Runtime defaults, loaded from the environment with fallbacks.

use std::env;

// Use lazy_static to initialize static variables safely.
lazy_static::lazy_static! {
    pub static ref OPENAI_BASE_URL: String = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());
    pub static ref INTERVIEW_MODEL: String = env::var("INTERVIEW_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo-0613".to_string());
    // Extraction and question generation both run deterministic by default.
    pub static ref INTERVIEW_TEMPERATURE: f32 = env::var("INTERVIEW_TEMPERATURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);
    pub static ref TEMPLATES_DIR: String = env::var("INTERVIEW_TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string());
    pub static ref STATIC_DIR: String = env::var("INTERVIEW_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
}

/// Name of the function the model is forced to call for tagging.
pub const EXTRACTION_FUNCTION_NAME: &str = "information_extraction";

/// Sent once every field is known.
pub const CLOSING_MESSAGE: &str = "Thank you for participating in this interview. \
We have everything we need for now, and a recruiter will be in touch about the next steps.";
