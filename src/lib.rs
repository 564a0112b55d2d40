pub mod asker;
pub mod chart;
pub mod chat;
pub mod config;
pub mod constants;
pub mod details;
pub mod extractor;
pub mod llm;
pub mod session;
pub mod web_server;

pub use details::{Field, PersonalDetails};
pub use llm::{LanguageModel, LlmError, OpenAiClient};
pub use session::{Phase, Session, SessionError, SessionSummary, TurnOutcome};
