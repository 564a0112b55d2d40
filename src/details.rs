use serde::{Deserialize, Serialize};
use std::fmt;

/// Three non-negative integer scores. The chart clamps them to 0-10 for
/// display only.
pub type ScoreTriple = [u32; 3];

/// Profile collected from the candidate over the course of an interview.
///
/// A field is unset when it is `None`. A name made only of whitespace also
/// counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: Option<String>,
    /// Degree level, major relevance, college ranking.
    pub school_background: Option<ScoreTriple>,
    /// Job level, position relevance, company ranking.
    pub working_experience: Option<ScoreTriple>,
    /// 1 (not interested) to 10 (very interested).
    pub interview_motivation: Option<u8>,
}

/// The fields of [`PersonalDetails`], in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    SchoolBackground,
    WorkingExperience,
    InterviewMotivation,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::FullName,
        Field::SchoolBackground,
        Field::WorkingExperience,
        Field::InterviewMotivation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::SchoolBackground => "school_background",
            Field::WorkingExperience => "working_experience",
            Field::InterviewMotivation => "interview_motivation",
        }
    }

    /// Guidance handed to the model alongside the extraction schema.
    pub fn description(self) -> &'static str {
        match self {
            Field::FullName => "Full name of the user.",
            Field::SchoolBackground => {
                "Education background as a list of three integers representing degree level, major relevance, and college ranking."
            }
            Field::WorkingExperience => {
                "Career background as a list of three integers representing job level, position relevance, and company ranking."
            }
            Field::InterviewMotivation => {
                "Motivation level to join the interview, from 1 (not interested) to 10 (very interested)."
            }
        }
    }

    pub fn is_set(self, details: &PersonalDetails) -> bool {
        match self {
            Field::FullName => details
                .full_name
                .as_deref()
                .is_some_and(|name| !name.trim().is_empty()),
            Field::SchoolBackground => details.school_background.is_some(),
            Field::WorkingExperience => details.working_experience.is_some(),
            Field::InterviewMotivation => details.interview_motivation.is_some(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PersonalDetails {
    pub fn is_complete(&self) -> bool {
        Field::ALL.iter().all(|field| field.is_set(self))
    }
}

/// Right-biased merge: every field takes the new value when it is set and
/// keeps the current value otherwise.
pub fn add_non_empty_details(current: &PersonalDetails, new: &PersonalDetails) -> PersonalDetails {
    let pick = |field: Field| field.is_set(new);

    PersonalDetails {
        full_name: if pick(Field::FullName) {
            new.full_name.clone()
        } else {
            current.full_name.clone()
        },
        school_background: if pick(Field::SchoolBackground) {
            new.school_background
        } else {
            current.school_background
        },
        working_experience: if pick(Field::WorkingExperience) {
            new.working_experience
        } else {
            current.working_experience
        },
        interview_motivation: if pick(Field::InterviewMotivation) {
            new.interview_motivation
        } else {
            current.interview_motivation
        },
    }
}

/// Fields still unset, in declared order.
pub fn check_what_is_empty(details: &PersonalDetails) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|field| !field.is_set(details))
        .collect()
}
