//! Participant demographics and the experimental condition.
//!
//! Both are collected exactly once, at their own stage, and are
//! immutable afterwards. Labels parse from the French-language
//! instrument labels as well as the English names.

use crate::{
    error::{SessionError, SessionResult},
    session::Stage,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const AGE_MIN: u8 = 18;
pub const AGE_MAX: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::PreferNotToSay,
    ];

    /// UI label from the French-language instrument.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Homme",
            Self::Female => "Femme",
            Self::Other => "Autre",
            Self::PreferNotToSay => "Préfère ne pas répondre",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::PreferNotToSay => "PreferNotToSay",
        })
    }
}

impl FromStr for Gender {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "homme" => Ok(Self::Male),
            "female" | "femme" => Ok(Self::Female),
            "other" | "autre" => Ok(Self::Other),
            "prefernottosay" | "prefer_not_to_say" | "préfère ne pas répondre" => {
                Ok(Self::PreferNotToSay)
            }
            _ => Err(SessionError::UnknownLabel {
                kind:  "gender",
                value: s.to_string(),
            }),
        }
    }
}

/// Demographics captured at the Demographics stage.
/// Construction validates the age range; there is no other way to
/// obtain a Participant, so an existing one is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    age:    u8,
    gender: Gender,
}

impl Participant {
    pub fn new(age: u8, gender: Gender) -> SessionResult<Self> {
        if !(AGE_MIN..=AGE_MAX).contains(&age) {
            return Err(SessionError::StageRefused {
                stage:  Stage::Demographics,
                reason: format!("age {age} outside [{AGE_MIN}, {AGE_MAX}]"),
            });
        }
        Ok(Self { age, gender })
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }
}

/// The experimental arm. Affects interpretation of the data, not the
/// round mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Sequential,
    Planned,
}

impl Condition {
    pub const ALL: [Condition; 2] = [Condition::Sequential, Condition::Planned];

    /// UI label from the French-language instrument.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sequential => "Décision Séquentielle",
            Self::Planned => "Décision Planifiée",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sequential => "Sequential Decision",
            Self::Planned => "Planned Decision",
        })
    }
}

impl FromStr for Condition {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "sequential decision" | "décision séquentielle" => {
                Ok(Self::Sequential)
            }
            "planned" | "planned decision" | "décision planifiée" => Ok(Self::Planned),
            _ => Err(SessionError::UnknownLabel {
                kind:  "condition",
                value: s.to_string(),
            }),
        }
    }
}
