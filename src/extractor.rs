use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::details::{Field, PersonalDetails, ScoreTriple};
use crate::llm::{LanguageModel, LlmError};

const SCORE_MAX: i64 = 10;
const MOTIVATION_MIN: i64 = 1;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Model(#[from] LlmError),
    #[error("extraction result does not match the profile schema: {0}")]
    Schema(#[source] serde_json::Error),
}

/// Shape the model hands back. Everything is optional and loosely typed so
/// out-of-range values can be dropped instead of failing the turn.
#[derive(Debug, Default, Deserialize)]
struct TaggedDetails {
    full_name: Option<String>,
    school_background: Option<Vec<i64>>,
    working_experience: Option<Vec<i64>>,
    interview_motivation: Option<i64>,
}

/// JSON schema describing [`PersonalDetails`] for the tagging call.
pub fn extraction_schema() -> Value {
    let triple = |field: Field| {
        json!({
            "type": "array",
            "items": { "type": "integer", "minimum": 0 },
            "minItems": 3,
            "maxItems": 3,
            "description": field.description(),
        })
    };

    let mut properties = Map::new();
    for field in Field::ALL {
        let property = match field {
            Field::FullName => json!({ "type": "string", "description": field.description() }),
            Field::SchoolBackground | Field::WorkingExperience => triple(field),
            Field::InterviewMotivation => json!({
                "type": "integer",
                "minimum": MOTIVATION_MIN,
                "maximum": SCORE_MAX,
                "description": field.description(),
            }),
        };
        properties.insert(field.name().to_string(), property);
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": [],
    })
}

fn to_triple(field: Field, values: Option<Vec<i64>>) -> Option<ScoreTriple> {
    let values = values?;
    let score = |v: &i64| u32::try_from(*v).ok();
    let triple = match values.as_slice() {
        [a, b, c] => score(a)
            .zip(score(b))
            .zip(score(c))
            .map(|((a, b), c)| [a, b, c]),
        _ => None,
    };
    if triple.is_none() {
        warn!(%field, ?values, "Dropping score triple outside the schema");
    }
    triple
}

fn to_motivation(value: Option<i64>) -> Option<u8> {
    let value = value?;
    if (MOTIVATION_MIN..=SCORE_MAX).contains(&value) {
        Some(value as u8)
    } else {
        warn!(value, "Dropping motivation score outside 1-10");
        None
    }
}

/// Map a raw tagging result onto the profile, dropping values the schema
/// would reject.
pub fn details_from_value(value: Value) -> Result<PersonalDetails, ExtractionError> {
    let tagged: TaggedDetails = serde_json::from_value(value).map_err(ExtractionError::Schema)?;

    Ok(PersonalDetails {
        full_name: tagged
            .full_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        school_background: to_triple(Field::SchoolBackground, tagged.school_background),
        working_experience: to_triple(Field::WorkingExperience, tagged.working_experience),
        interview_motivation: to_motivation(tagged.interview_motivation),
    })
}

/// Run one tagging call over the user's reply.
#[instrument(skip(model, text))]
pub async fn extract_details(
    model: &dyn LanguageModel,
    text: &str,
) -> Result<PersonalDetails, ExtractionError> {
    let schema = extraction_schema();
    let raw = model.extract(text, &schema).await?;
    debug!(%raw, "Tagging result");
    details_from_value(raw)
}
