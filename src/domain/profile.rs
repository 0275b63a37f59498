//! User profile domain types.
//!
//! A profile is filled in once during onboarding and locked from then on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{CouncilError, CouncilResult};

/// Gender selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    /// Every accepted label, in display order.
    pub const LABELS: &'static [&'static str] = &["Male", "Female", "Other", "Prefer not to say"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            "Prefer not to say" => Ok(Gender::PreferNotToSay),
            _ => Err(invalid_answer("gender", Self::LABELS)),
        }
    }
}

/// Age bracket selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AgeRange {
    #[serde(rename = "12-17")]
    From12To17,
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55-64")]
    From55To64,
    #[serde(rename = "65+")]
    Over65,
}

impl AgeRange {
    pub const LABELS: &'static [&'static str] =
        &["12-17", "18-24", "25-34", "35-44", "45-54", "55-64", "65+"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeRange::From12To17 => "12-17",
            AgeRange::From18To24 => "18-24",
            AgeRange::From25To34 => "25-34",
            AgeRange::From35To44 => "35-44",
            AgeRange::From45To54 => "45-54",
            AgeRange::From55To64 => "55-64",
            AgeRange::Over65 => "65+",
        }
    }
}

impl std::fmt::Display for AgeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "12-17" => Ok(AgeRange::From12To17),
            "18-24" => Ok(AgeRange::From18To24),
            "25-34" => Ok(AgeRange::From25To34),
            "35-44" => Ok(AgeRange::From35To44),
            "45-54" => Ok(AgeRange::From45To54),
            "55-64" => Ok(AgeRange::From55To64),
            "65+" => Ok(AgeRange::Over65),
            _ => Err(invalid_answer("age range", Self::LABELS)),
        }
    }
}

/// Mood at onboarding time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Mood {
    Happy,
    #[serde(rename = "I don't know")]
    DontKnow,
    Sad,
}

impl Mood {
    pub const LABELS: &'static [&'static str] = &["Happy", "I don't know", "Sad"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::DontKnow => "I don't know",
            Mood::Sad => "Sad",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Happy" => Ok(Mood::Happy),
            "I don't know" => Ok(Mood::DontKnow),
            "Sad" => Ok(Mood::Sad),
            _ => Err(invalid_answer("mood", Self::LABELS)),
        }
    }
}

fn invalid_answer(what: &str, labels: &[&str]) -> String {
    format!("Invalid {}. Must be one of: {:?}", what, labels)
}

/// Validated onboarding answers, ready to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileFields {
    pub gender: Gender,
    pub age_range: AgeRange,
    pub mood: Mood,
}

impl ProfileFields {
    /// Validate raw answers against their enumerated sets.
    pub fn parse(gender: &str, age_range: &str, mood: &str) -> CouncilResult<Self> {
        Ok(Self {
            gender: gender.parse().map_err(CouncilError::BadRequest)?,
            age_range: age_range.parse().map_err(CouncilError::BadRequest)?,
            mood: mood.parse().map_err(CouncilError::BadRequest)?,
        })
    }
}

/// A stored user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    /// Owner; the authenticated user id, or a conversation id for anonymous users.
    pub user_id: String,
    pub gender: Gender,
    pub age_range: AgeRange,
    pub mood: Mood,
    pub created_at: DateTime<Utc>,
    /// Always true; profiles cannot be edited after creation.
    pub locked: bool,
}

impl Profile {
    /// Create a new, locked profile.
    pub fn new(user_id: impl Into<String>, fields: ProfileFields) -> Self {
        Self {
            user_id: user_id.into(),
            gender: fields.gender,
            age_range: fields.age_range,
            mood: fields.mood,
            created_at: Utc::now(),
            locked: true,
        }
    }

    /// Render the profile as a preamble for model prompts.
    pub fn context(&self) -> String {
        format!(
            "USER PROFILE CONTEXT:\n\
             - Gender: {}\n\
             - Age Range: {}\n\
             - Current Mood: {}\n\
             \n\
             Please consider this context when providing your professional perspective. \
             Tailor your response to be appropriate for this individual's age, \
             and be mindful of their current emotional state.",
            self.gender, self.age_range, self.mood
        )
    }
}
