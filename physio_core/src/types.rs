//! Domain records returned by the prescription API.
//!
//! Every record is a snapshot of server state. Wire names are mapped field by
//! field with explicit `rename` attributes; there is no blanket case
//! conversion, so a renamed server key shows up as a single-line diff here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ============================================================================
// Enumerated vocabularies
// ============================================================================

/// Category of an exercise template
///
/// Unrecognised server values are kept verbatim in `Other` so a newer server
/// vocabulary never breaks deserialization.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExerciseCategory {
    Strength,
    Flexibility,
    Balance,
    Endurance,
    Plyometric,
    Functional,
    Rehabilitation,
    Other(String),
}

impl ExerciseCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ExerciseCategory::Strength => "strength",
            ExerciseCategory::Flexibility => "flexibility",
            ExerciseCategory::Balance => "balance",
            ExerciseCategory::Endurance => "endurance",
            ExerciseCategory::Plyometric => "plyometric",
            ExerciseCategory::Functional => "functional",
            ExerciseCategory::Rehabilitation => "rehabilitation",
            ExerciseCategory::Other(raw) => raw,
        }
    }

    /// Returns true for values outside the known vocabulary
    pub fn is_other(&self) -> bool {
        matches!(self, ExerciseCategory::Other(_))
    }
}

impl From<String> for ExerciseCategory {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "strength" => ExerciseCategory::Strength,
            "flexibility" => ExerciseCategory::Flexibility,
            "balance" => ExerciseCategory::Balance,
            "endurance" => ExerciseCategory::Endurance,
            "plyometric" => ExerciseCategory::Plyometric,
            "functional" => ExerciseCategory::Functional,
            "rehabilitation" => ExerciseCategory::Rehabilitation,
            _ => ExerciseCategory::Other(raw),
        }
    }
}

impl From<ExerciseCategory> for String {
    fn from(category: ExerciseCategory) -> Self {
        match category {
            ExerciseCategory::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Strict parse for user input: only the known vocabulary is accepted
impl FromStr for ExerciseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ExerciseCategory::from(s.trim().to_lowercase()) {
            ExerciseCategory::Other(raw) => Err(Error::InvalidRequest(format!(
                "unknown exercise category '{}'",
                raw
            ))),
            known => Ok(known),
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a prescription
///
/// Transitions are owned by the server; the client only requests them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrescriptionStatus {
    Active,
    Completed,
    Paused,
    Cancelled,
    Other(String),
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PrescriptionStatus::Active => "active",
            PrescriptionStatus::Completed => "completed",
            PrescriptionStatus::Paused => "paused",
            PrescriptionStatus::Cancelled => "cancelled",
            PrescriptionStatus::Other(raw) => raw,
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(self, PrescriptionStatus::Other(_))
    }
}

impl From<String> for PrescriptionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "active" => PrescriptionStatus::Active,
            "completed" => PrescriptionStatus::Completed,
            "paused" => PrescriptionStatus::Paused,
            "cancelled" => PrescriptionStatus::Cancelled,
            _ => PrescriptionStatus::Other(raw),
        }
    }
}

impl From<PrescriptionStatus> for String {
    fn from(status: PrescriptionStatus) -> Self {
        match status {
            PrescriptionStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for PrescriptionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match PrescriptionStatus::from(s.trim().to_lowercase()) {
            PrescriptionStatus::Other(raw) => Err(Error::InvalidRequest(format!(
                "unknown prescription status '{}'",
                raw
            ))),
            known => Ok(known),
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Templates
// ============================================================================

/// A reusable exercise definition authored by clinical staff
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "description")]
    pub description: String,
    #[serde(rename = "category")]
    pub category: ExerciseCategory,
    #[serde(rename = "difficulty")]
    pub difficulty: u8,
    #[serde(rename = "bodyRegion")]
    pub body_region: String,
    #[serde(rename = "primaryJoints")]
    pub primary_joints: Vec<String>,
    #[serde(rename = "estimatedDuration")]
    pub estimated_duration: u32,
    #[serde(rename = "recommendedReps")]
    pub recommended_reps: u32,
    #[serde(rename = "recommendedSets")]
    pub recommended_sets: u32,
    #[serde(rename = "patientInstructions")]
    pub patient_instructions: String,
    #[serde(rename = "active")]
    pub active: bool,
}

/// One page of a template listing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplatePage {
    /// Total number of matches on the server, not the page length
    #[serde(rename = "total")]
    pub total: u64,
    #[serde(rename = "templates")]
    pub templates: Vec<ExerciseTemplate>,
}

// ============================================================================
// Prescriptions
// ============================================================================

/// A template assigned to a patient by a therapist, with tracked progress
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExercisePrescription {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "templateId")]
    pub template_id: String,
    #[serde(rename = "patientId")]
    pub patient_id: String,
    #[serde(rename = "therapistId")]
    pub therapist_id: String,
    /// Unix epoch milliseconds
    #[serde(rename = "prescribedAt")]
    pub prescribed_at: i64,
    /// Unix epoch milliseconds
    #[serde(rename = "startDate")]
    pub start_date: i64,
    #[serde(rename = "reps")]
    pub reps: u32,
    #[serde(rename = "sets")]
    pub sets: u32,
    #[serde(rename = "frequencyPerWeek")]
    pub frequency_per_week: u32,
    #[serde(rename = "status")]
    pub status: PrescriptionStatus,
    #[serde(rename = "completionPercent")]
    pub completion_percent: u8,
    #[serde(
        rename = "customInstructions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_instructions: Option<String>,
    #[serde(
        rename = "primaryJointFocus",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_joint_focus: Option<String>,
    #[serde(
        rename = "therapistNotes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub therapist_notes: Option<String>,
}

impl ExercisePrescription {
    /// When the prescription was issued, if the timestamp is in range
    pub fn prescribed_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.prescribed_at)
    }

    /// When the patient is expected to start, if the timestamp is in range
    pub fn start_date_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.start_date)
    }
}

/// Wire envelope for the patient prescription listing
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct PrescriptionList {
    #[serde(rename = "prescriptions")]
    pub prescriptions: Vec<ExercisePrescription>,
}

// ============================================================================
// Library statistics
// ============================================================================

/// Aggregate counts for the template library
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    #[serde(rename = "totalTemplates")]
    pub total_templates: u64,
    #[serde(rename = "activeCount")]
    pub active_count: u64,
    #[serde(rename = "byCategory", default)]
    pub by_category: BTreeMap<ExerciseCategory, u64>,
}

impl LibraryStats {
    /// Count for one category, zero when the server omitted it
    pub fn count_for(&self, category: &ExerciseCategory) -> u64 {
        self.by_category.get(category).copied().unwrap_or(0)
    }
}
