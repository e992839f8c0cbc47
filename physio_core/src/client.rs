//! The API client façade.
//!
//! One method per remote operation. Each method validates its input, builds
//! an [`ApiRequest`], sends it through the owned [`Transport`], and maps the
//! response into a typed record. No retries and no local recovery: every
//! failure is returned to the caller as-is.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::request::paging_pairs;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
use crate::types::PrescriptionList;
use crate::{
    Config, Error, ExercisePrescription, ExerciseTemplate, LibraryStats, NewPrescription,
    PrescriptionStatus, PrescriptionUpdate, Result, TemplateDraft, TemplatePage, TemplateQuery,
};

/// Status the server uses to acknowledge a cancellation
const NO_CONTENT: u16 = 204;

/// Client for the prescription API
///
/// Owns its transport exclusively; the underlying session is created once and
/// released when the client is dropped.
pub struct PhysioClient<T: Transport = HttpTransport> {
    transport: T,
}

impl PhysioClient<HttpTransport> {
    /// Connect to `base_url` with a static API key and no request timeout
    pub fn connect(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(base_url, api_key, None)?))
    }

    /// Build a client from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let api_key = config.api.api_key.as_deref().ok_or_else(|| {
            Error::Config(
                "No API key configured (set api.api_key, PHYSIO_API_KEY or --api-key)".into(),
            )
        })?;
        let timeout = config.api.timeout_secs.map(Duration::from_secs);

        tracing::debug!("Using API base URL {}", config.api.base_url);
        let transport = HttpTransport::new(&config.api.base_url, api_key, timeout)?;
        Ok(Self::with_transport(transport))
    }
}

impl<T: Transport> PhysioClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// List templates; only supplied filters are transmitted
    pub fn list_templates(&self, query: &TemplateQuery) -> Result<TemplatePage> {
        query.validate()?;
        let request = ApiRequest::new(Method::Get, ["templates"]).with_query(query.to_query_pairs());

        let mut page: TemplatePage = self.execute(request)?;
        truncate_to_limit(&mut page.templates, query.limit, "templates");
        Ok(page)
    }

    pub fn get_template(&self, template_id: &str) -> Result<ExerciseTemplate> {
        require_id("template_id", template_id)?;
        self.execute(ApiRequest::new(Method::Get, ["templates", template_id]))
    }

    /// Create a template (the server restricts this to therapists and admins)
    pub fn create_template(&self, draft: &TemplateDraft) -> Result<ExerciseTemplate> {
        draft.validate()?;
        let request = ApiRequest::new(Method::Post, ["templates"]).with_body(to_body(draft)?);
        self.execute(request)
    }

    // ========================================================================
    // Prescriptions
    // ========================================================================

    /// Prescribe a template to a patient; the server assigns id, timestamps
    /// and the initial status
    pub fn create_prescription(&self, prescription: &NewPrescription) -> Result<ExercisePrescription> {
        prescription.validate()?;
        let request =
            ApiRequest::new(Method::Post, ["prescriptions"]).with_body(to_body(prescription)?);
        self.execute(request)
    }

    pub fn get_prescription(&self, prescription_id: &str) -> Result<ExercisePrescription> {
        require_id("prescription_id", prescription_id)?;
        self.execute(ApiRequest::new(Method::Get, ["prescriptions", prescription_id]))
    }

    /// Partial update; returns the full record as the server now holds it
    pub fn update_prescription(
        &self,
        prescription_id: &str,
        update: &PrescriptionUpdate,
    ) -> Result<ExercisePrescription> {
        require_id("prescription_id", prescription_id)?;
        update.validate()?;
        if update.is_empty() {
            tracing::debug!("Sending empty update for prescription {}", prescription_id);
        }

        let request = ApiRequest::new(Method::Patch, ["prescriptions", prescription_id])
            .with_body(to_body(update)?);
        self.execute(request)
    }

    /// Cancel a prescription
    ///
    /// Returns `Ok(true)` only for `204 No Content`. Every other status,
    /// including error statuses, yields `Ok(false)`. Transport failures are
    /// returned as `Err`.
    pub fn cancel_prescription(&self, prescription_id: &str) -> Result<bool> {
        require_id("prescription_id", prescription_id)?;
        let request = ApiRequest::new(Method::Delete, ["prescriptions", prescription_id]);

        let response = self.send(&request)?;
        if response.status != NO_CONTENT {
            tracing::warn!(
                "Cancel of prescription {} answered with HTTP {}",
                prescription_id,
                response.status
            );
        }
        Ok(response.status == NO_CONTENT)
    }

    /// Prescriptions for one patient, optionally filtered by status
    pub fn get_patient_prescriptions(
        &self,
        patient_id: &str,
        status: Option<&PrescriptionStatus>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ExercisePrescription>> {
        require_id("patient_id", patient_id)?;
        if limit == 0 {
            return Err(Error::InvalidRequest("limit must be at least 1".into()));
        }

        let mut query = paging_pairs(limit, offset);
        if let Some(status) = status {
            query.push(("status".into(), status.to_string()));
        }

        let request =
            ApiRequest::new(Method::Get, ["patients", patient_id, "prescriptions"]).with_query(query);
        let mut list: PrescriptionList = self.execute(request)?;
        truncate_to_limit(&mut list.prescriptions, limit, "prescriptions");
        Ok(list.prescriptions)
    }

    // ========================================================================
    // Library
    // ========================================================================

    pub fn get_library_stats(&self) -> Result<LibraryStats> {
        self.execute(ApiRequest::new(Method::Get, ["library", "stats"]))
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        tracing::debug!(
            method = %request.method,
            path = %request.path(),
            "Sending request"
        );

        let response = self.transport.send(request).map_err(|e| {
            tracing::warn!("{} {} failed: {}", request.method, request.path(), e);
            e
        })?;

        tracing::debug!(status = response.status, "Received response");
        Ok(response)
    }

    /// Send, require a 2xx status, and decode the body
    fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let response = self.send(&request)?;

        if !response.is_success() {
            tracing::warn!(
                "{} {} returned HTTP {}",
                request.method,
                request.path(),
                response.status
            );
            return Err(Error::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}

/// Listing endpoints never hand back more records than were asked for
fn truncate_to_limit<R>(records: &mut Vec<R>, limit: u32, what: &str) {
    let limit = limit as usize;
    if records.len() > limit {
        tracing::warn!(
            "Server returned {} {} for limit {}, truncating",
            records.len(),
            what,
            limit
        );
        records.truncate(limit);
    }
}

fn require_id(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(body)?)
}
