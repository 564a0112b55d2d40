//! One candidate interview, from the opening question to the completed
//! profile.
//!
//! A [`Session`] is created with [`Session::start`], driven one user turn at a
//! time with [`Session::handle_answer`], and torn down with
//! [`Session::finish`]. It owns all per-candidate state; front ends keep one
//! session per connected user and pass it to each handler.

use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::asker::ask_for_info;
use crate::chart::RadarChart;
use crate::constants::CLOSING_MESSAGE;
use crate::details::{add_non_empty_details, check_what_is_empty, Field, PersonalDetails};
use crate::extractor::{extract_details, ExtractionError};
use crate::llm::{LanguageModel, LlmError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("answer is empty")]
    EmptyAnswer,
    #[error("failed to generate the next question: {0}")]
    Model(#[from] LlmError),
    #[error("failed to extract details from the answer: {0}")]
    Extraction(#[from] ExtractionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl Turn {
    fn new(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// At least one field is still missing.
    Collecting,
    /// Every field is known. Terminal for the lifetime of the session.
    Complete,
}

/// What a single user turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub phase: Phase,
    /// Set only on the turn that completed the profile.
    pub chart: Option<RadarChart>,
}

/// Everything a finished session leaves behind.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: Uuid,
    pub details: PersonalDetails,
    pub transcript: Vec<Turn>,
    pub chart: Option<RadarChart>,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    details: PersonalDetails,
    missing: Vec<Field>,
    transcript: Vec<Turn>,
    phase: Phase,
    chart: Option<RadarChart>,
}

impl Session {
    /// Open a session with empty details and ask the first question.
    #[instrument(skip(model))]
    pub async fn start(model: &dyn LanguageModel) -> Result<Self, SessionError> {
        let mut session = Self {
            id: Uuid::new_v4(),
            details: PersonalDetails::default(),
            missing: Field::ALL.to_vec(),
            transcript: Vec::new(),
            phase: Phase::Collecting,
            chart: None,
        };
        info!(session_id = %session.id, "Starting interview session");

        let question = ask_for_info(model, &session.missing).await?;
        session.push(Role::Assistant, question);
        Ok(session)
    }

    /// Run one turn: extract, merge, recompute what is missing, then either
    /// ask the next question or close the interview.
    #[instrument(skip(self, model, answer), fields(session_id = %self.id))]
    pub async fn handle_answer(
        &mut self,
        model: &dyn LanguageModel,
        answer: &str,
    ) -> Result<TurnOutcome, SessionError> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        self.push(Role::User, answer.to_string());

        if self.phase == Phase::Complete {
            let reply = CLOSING_MESSAGE.to_string();
            self.push(Role::Assistant, reply.clone());
            return Ok(TurnOutcome {
                reply,
                phase: self.phase,
                chart: None,
            });
        }

        let extracted = extract_details(model, answer).await?;
        self.details = add_non_empty_details(&self.details, &extracted);
        self.missing = check_what_is_empty(&self.details);
        info!(missing = ?self.missing, "Merged extracted details");

        let reply = ask_for_info(model, &self.missing).await?;
        self.push(Role::Assistant, reply.clone());

        let mut chart = None;
        if self.missing.is_empty() {
            self.phase = Phase::Complete;
            chart = RadarChart::from_details(&self.details);
            self.chart = chart.clone();
            info!("Profile complete, chart rendered");
        }

        Ok(TurnOutcome {
            reply,
            phase: self.phase,
            chart,
        })
    }

    /// Close the session and hand back what it collected.
    pub fn finish(self) -> SessionSummary {
        info!(
            session_id = %self.id,
            turns = self.transcript.len(),
            complete = self.phase == Phase::Complete,
            "Interview session finished"
        );
        SessionSummary {
            id: self.id,
            details: self.details,
            transcript: self.transcript,
            chart: self.chart,
        }
    }

    fn push(&mut self, role: Role, content: String) {
        self.transcript.push(Turn::new(role, content));
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn details(&self) -> &PersonalDetails {
        &self.details
    }

    pub fn missing_fields(&self) -> &[Field] {
        &self.missing
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn chart(&self) -> Option<&RadarChart> {
        self.chart.as_ref()
    }
}
