//! Typed request payloads.
//!
//! Optional parameters are modelled as builder structs whose absent fields
//! are omitted from the wire, never sent as `null`.

use serde::{Deserialize, Serialize};

use crate::{Error, ExerciseCategory, PrescriptionStatus, Result};

/// Default page size for listing endpoints
pub const DEFAULT_LIMIT: u32 = 50;

// ============================================================================
// Template listing filters
// ============================================================================

/// Filters for `GET /templates`
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateQuery {
    pub category: Option<ExerciseCategory>,
    pub difficulty_min: Option<u8>,
    pub difficulty_max: Option<u8>,
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for TemplateQuery {
    fn default() -> Self {
        Self {
            category: None,
            difficulty_min: None,
            difficulty_max: None,
            search: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl TemplateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: ExerciseCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn difficulty_min(mut self, min: u8) -> Self {
        self.difficulty_min = Some(min);
        self
    }

    pub fn difficulty_max(mut self, max: u8) -> Self {
        self.difficulty_max = Some(max);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Check the filter combination before it goes on the wire
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidRequest("limit must be at least 1".into()));
        }
        if let (Some(min), Some(max)) = (self.difficulty_min, self.difficulty_max) {
            if min > max {
                return Err(Error::InvalidRequest(format!(
                    "difficulty_min ({}) exceeds difficulty_max ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    /// Query string pairs: paging always, filters only when supplied
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = paging_pairs(self.limit, self.offset);

        if let Some(ref category) = self.category {
            pairs.push(("category".into(), category.to_string()));
        }
        if let Some(min) = self.difficulty_min {
            pairs.push(("difficulty_min".into(), min.to_string()));
        }
        if let Some(max) = self.difficulty_max {
            pairs.push(("difficulty_max".into(), max.to_string()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search".into(), search.clone()));
        }

        pairs
    }
}

pub(crate) fn paging_pairs(limit: u32, offset: u32) -> Vec<(String, String)> {
    vec![
        ("limit".into(), limit.to_string()),
        ("offset".into(), offset.to_string()),
    ]
}

// ============================================================================
// Template creation
// ============================================================================

/// Body for `POST /templates`
///
/// Uses the same wire names as [`crate::ExerciseTemplate`] so a draft can be
/// written by hand as JSON and loaded from disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateDraft {
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
    #[serde(rename = "active", default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl TemplateDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidRequest("template name must not be empty".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Prescription creation
// ============================================================================

/// Body for `POST /prescriptions`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPrescription {
    #[serde(rename = "templateId")]
    pub template_id: String,
    #[serde(rename = "patientId")]
    pub patient_id: String,
    #[serde(rename = "therapistId")]
    pub therapist_id: String,
    #[serde(rename = "frequencyPerWeek")]
    pub frequency_per_week: u32,
    #[serde(rename = "reps", skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(rename = "sets", skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(rename = "customInstructions", skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    #[serde(rename = "primaryJointFocus", skip_serializing_if = "Option::is_none")]
    pub primary_joint_focus: Option<String>,
}

impl NewPrescription {
    pub fn new(
        template_id: impl Into<String>,
        patient_id: impl Into<String>,
        therapist_id: impl Into<String>,
        frequency_per_week: u32,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            patient_id: patient_id.into(),
            therapist_id: therapist_id.into(),
            frequency_per_week,
            reps: None,
            sets: None,
            custom_instructions: None,
            primary_joint_focus: None,
        }
    }

    pub fn reps(mut self, reps: u32) -> Self {
        self.reps = Some(reps);
        self
    }

    pub fn sets(mut self, sets: u32) -> Self {
        self.sets = Some(sets);
        self
    }

    pub fn custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    pub fn primary_joint_focus(mut self, joint: impl Into<String>) -> Self {
        self.primary_joint_focus = Some(joint.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("template_id", &self.template_id),
            ("patient_id", &self.patient_id),
            ("therapist_id", &self.therapist_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidRequest(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Prescription update
// ============================================================================

/// Body for `PATCH /prescriptions/{id}`
///
/// Only the supplied fields are sent, so the server leaves the others alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PrescriptionUpdate {
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub status: Option<PrescriptionStatus>,
    #[serde(rename = "completionPercent", skip_serializing_if = "Option::is_none")]
    pub completion_percent: Option<u8>,
    #[serde(rename = "therapistNotes", skip_serializing_if = "Option::is_none")]
    pub therapist_notes: Option<String>,
}

impl PrescriptionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: PrescriptionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn completion_percent(mut self, percent: u8) -> Self {
        self.completion_percent = Some(percent);
        self
    }

    pub fn therapist_notes(mut self, notes: impl Into<String>) -> Self {
        self.therapist_notes = Some(notes.into());
        self
    }

    /// True when no field would be sent
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.completion_percent.is_none() && self.therapist_notes.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(percent) = self.completion_percent {
            if percent > 100 {
                return Err(Error::InvalidRequest(format!(
                    "completion_percent must be between 0 and 100, got {}",
                    percent
                )));
            }
        }
        Ok(())
    }
}
