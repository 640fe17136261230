//! Typed access to the patient and triage registries.
//!
//! [`RegistryClient`] turns a base URL plus an operation into a [`JsonRequest`] and
//! decodes the response. Base URLs come from the config store at the start of each
//! action and may carry a path prefix (an API stage, say), which is preserved.
//! Identifiers are percent-encoded as path segments or query values.

use crate::constants::{INVALID_API_URL, PATIENTS_PATH, TRIAGES_PATH};
use crate::error::{IntakeError, IntakeResult};
use crate::http::{HttpClient, JsonRequest};
use crate::models::{PatientRecord, TriageList, TriageRecord, TriageSummary};
use clinica_types::{Dni, NonEmptyText};
use reqwest::Url;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Builds `<base>/<segments...>`.
///
/// # Errors
///
/// Returns `IntakeError::Validation` with `missing_message` when `base` is empty,
/// and with the invalid-URL message when it cannot serve as a base URL.
pub fn endpoint(base: &str, missing_message: &str, segments: &[&str]) -> IntakeResult<Url> {
    let base = base.trim();
    if base.is_empty() {
        return Err(IntakeError::Validation(missing_message.to_owned()));
    }

    let mut url = Url::parse(base).map_err(|_| IntakeError::Validation(INVALID_API_URL.into()))?;
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| IntakeError::Validation(INVALID_API_URL.into()))?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

/// Client for both registries.
#[derive(Clone)]
pub struct RegistryClient {
    http: Arc<dyn HttpClient>,
}

impl RegistryClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    // ------------------------------------------------------------------------
    // Patients
    // ------------------------------------------------------------------------

    /// `POST /pacientes`
    pub async fn create_patient(
        &self,
        base: &str,
        missing_message: &str,
        payload: Map<String, Value>,
    ) -> IntakeResult<PatientRecord> {
        let url = endpoint(base, missing_message, &[PATIENTS_PATH])?;
        let body = self
            .http
            .request_json(JsonRequest::post(url, Value::Object(payload)))
            .await?;
        Ok(PatientRecord::from_value(body))
    }

    /// `GET /pacientes/{dni}`
    pub async fn get_patient(
        &self,
        base: &str,
        missing_message: &str,
        dni: &Dni,
    ) -> IntakeResult<PatientRecord> {
        let url = endpoint(base, missing_message, &[PATIENTS_PATH, dni.as_str()])?;
        let body = self.http.request_json(JsonRequest::get(url)).await?;
        Ok(PatientRecord::from_value(body))
    }

    /// `PUT /pacientes/{dni}`
    pub async fn update_patient(
        &self,
        base: &str,
        missing_message: &str,
        dni: &Dni,
        payload: Map<String, Value>,
    ) -> IntakeResult<PatientRecord> {
        let url = endpoint(base, missing_message, &[PATIENTS_PATH, dni.as_str()])?;
        let body = self
            .http
            .request_json(JsonRequest::put(url, Value::Object(payload)))
            .await?;
        Ok(PatientRecord::from_value(body))
    }

    /// `DELETE /pacientes/{dni}`
    pub async fn delete_patient(
        &self,
        base: &str,
        missing_message: &str,
        dni: &Dni,
    ) -> IntakeResult<()> {
        let url = endpoint(base, missing_message, &[PATIENTS_PATH, dni.as_str()])?;
        self.http.request_json(JsonRequest::delete(url)).await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Triages
    // ------------------------------------------------------------------------

    /// `POST /triajes`. The payload must already contain `dni`.
    pub async fn create_triage(
        &self,
        base: &str,
        missing_message: &str,
        payload: Map<String, Value>,
    ) -> IntakeResult<Value> {
        let url = endpoint(base, missing_message, &[TRIAGES_PATH])?;
        self.http
            .request_json(JsonRequest::post(url, Value::Object(payload)))
            .await
    }

    /// `GET /triajes?dni={dni}`
    pub async fn list_triages(
        &self,
        base: &str,
        missing_message: &str,
        dni: &Dni,
    ) -> IntakeResult<Vec<TriageSummary>> {
        let mut url = endpoint(base, missing_message, &[TRIAGES_PATH])?;
        url.query_pairs_mut().append_pair("dni", dni.as_str());
        // Form encoding writes spaces as '+' and a literal '+' as %2B.
        let query = url.query().map(|query| query.replace('+', "%20"));
        url.set_query(query.as_deref());

        let body = self.http.request_json(JsonRequest::get(url)).await?;
        let list: TriageList = serde_json::from_value(body).map_err(IntakeError::Decode)?;
        Ok(list.into_items())
    }

    /// `GET /triajes/{dni}/{fechaHora}`
    pub async fn get_triage(
        &self,
        base: &str,
        missing_message: &str,
        dni: &Dni,
        fecha_hora: &NonEmptyText,
    ) -> IntakeResult<TriageRecord> {
        let url = endpoint(
            base,
            missing_message,
            &[TRIAGES_PATH, dni.as_str(), fecha_hora.as_str()],
        )?;
        let body = self.http.request_json(JsonRequest::get(url)).await?;
        serde_json::from_value(body).map_err(IntakeError::Decode)
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient").finish_non_exhaustive()
    }
}
