//! Triage entry screen.
//!
//! The patient DNI lives outside the vital-sign form: loading a preview and
//! submitting a triage both key off it, and a successful submit clears the vital
//! signs but keeps the DNI and the preview so several triages can be entered for one
//! patient.

use crate::config::ConfigStore;
use crate::constants::{
    DNI_REQUIRED_FIND, DNI_REQUIRED_TRIAGE, PATIENTS_API_MISSING, PATIENT_LOADED, TRIAGES_API_MISSING,
    TRIAGE_CREATED, TRIAGE_FIELDS,
};
use crate::error::{IntakeError, IntakeResult};
use crate::form::FormState;
use crate::http::HttpClient;
use crate::registry::RegistryClient;
use crate::view::{FieldView, StatusMessage, TriageFormView};
use clinica_types::Dni;
use serde_json::Value;
use std::sync::Arc;

pub struct TriageFormController {
    config: Arc<ConfigStore>,
    registry: RegistryClient,
    dni: String,
    preview: String,
    form: FormState,
    status: Option<StatusMessage>,
}

impl TriageFormController {
    pub fn new(config: Arc<ConfigStore>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            registry: RegistryClient::new(http),
            dni: String::new(),
            preview: String::new(),
            form: FormState::new(TRIAGE_FIELDS.iter().copied()),
            status: None,
        }
    }

    pub fn set_dni(&mut self, dni: impl Into<String>) {
        self.dni = dni.into();
    }

    pub fn dni(&self) -> &str {
        &self.dni
    }

    /// Display name of the last loaded patient, empty when none is loaded.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Sets one vital-sign field. Unknown field names are rejected.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> IntakeResult<()> {
        self.form.set(name, value)
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn view(&self) -> TriageFormView {
        TriageFormView {
            dni: self.dni.clone(),
            preview: self.preview.clone(),
            fields: self
                .form
                .entries()
                .map(|(name, value)| FieldView {
                    name: name.to_owned(),
                    value: value.to_owned(),
                })
                .collect(),
            status: self.status.clone(),
        }
    }

    fn record(&mut self, outcome: IntakeResult<&'static str>) -> IntakeResult<()> {
        match outcome {
            Ok(message) => {
                self.status = Some(StatusMessage::success(message));
                Ok(())
            }
            Err(err) => {
                self.status = Some(StatusMessage::from_error(&err));
                Err(err)
            }
        }
    }

    /// Fetches the patient for the current DNI and shows their display name.
    ///
    /// A failed lookup clears the preview; a missing DNI leaves it as it was.
    pub async fn load_preview(&mut self) -> IntakeResult<()> {
        let outcome = self.try_load_preview().await;
        self.record(outcome)
    }

    async fn try_load_preview(&mut self) -> IntakeResult<&'static str> {
        let dni = Dni::parse(&self.dni)
            .map_err(|_| IntakeError::Validation(DNI_REQUIRED_FIND.into()))?;
        let config = self.config.get_active();

        let lookup = self
            .registry
            .get_patient(&config.patients_api, PATIENTS_API_MISSING, &dni)
            .await;
        match lookup {
            Ok(record) => {
                self.preview = record.display_name();
                Ok(PATIENT_LOADED)
            }
            Err(err) => {
                self.preview.clear();
                Err(err)
            }
        }
    }

    /// Submits the vital signs plus the DNI as a new triage record.
    ///
    /// On success the vital-sign fields are cleared; the DNI and preview stay.
    pub async fn submit(&mut self) -> IntakeResult<()> {
        let outcome = self.try_submit().await;
        self.record(outcome)
    }

    async fn try_submit(&mut self) -> IntakeResult<&'static str> {
        let dni = Dni::parse(&self.dni)
            .map_err(|_| IntakeError::Validation(DNI_REQUIRED_TRIAGE.into()))?;
        let config = self.config.get_active();

        let mut payload = self.form.serialize();
        payload.insert("dni".into(), Value::String(dni.as_str().to_owned()));

        self.registry
            .create_triage(&config.triages_api, TRIAGES_API_MISSING, payload)
            .await?;
        self.form.reset();
        Ok(TRIAGE_CREATED)
    }
}

impl std::fmt::Debug for TriageFormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageFormController")
            .field("dni", &self.dni)
            .field("preview", &self.preview)
            .field("form", &self.form)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::testing::{configured_store, ScriptedHttpClient};
    use reqwest::Method;
    use serde_json::json;

    fn controller(http: &Arc<ScriptedHttpClient>) -> TriageFormController {
        TriageFormController::new(configured_store(), http.clone())
    }

    fn fill_vitals(controller: &mut TriageFormController) {
        for (name, value) in [
            ("fechaHora", "2024-05-01T10:30"),
            ("presionArterial", "120/80"),
            ("frecuenciaCardiaca", "72"),
            ("saturacionOxigeno", "98"),
            ("temperaturaCorporal", "36.5"),
            ("pesoKg", "70"),
            ("tallaM", "1.70"),
        ] {
            controller.set_field(name, value).expect("vital-sign field");
        }
    }

    #[tokio::test]
    async fn test_load_preview_shows_display_name() {
        let http = Arc::new(ScriptedHttpClient::new());
        http.respond_ok(json!({"dni": "123", "nombres": "Ana", "apellidos": "Lopez"}));
        let mut controller = controller(&http);
        controller.set_dni("123");

        controller.load_preview().await.expect("preview should load");

        assert_eq!(controller.preview(), "Ana Lopez");
        assert_eq!(controller.status().map(|s| s.text.as_str()), Some(PATIENT_LOADED));
        assert_eq!(
            http.requests()[0].url.as_str(),
            "http://patients.test/pacientes/123"
        );
    }

    #[tokio::test]
    async fn test_load_preview_failure_clears_preview() {
        let http = Arc::new(ScriptedHttpClient::new());
        http.respond_ok(json!({"nombres": "Ana", "apellidos": "Lopez"}));
        http.respond_status(404, json!({"message": "Paciente no encontrado."}));
        let mut controller = controller(&http);
        controller.set_dni("123");
        controller.load_preview().await.expect("first preview loads");

        controller.set_dni("999");
        controller.load_preview().await.expect_err("second preview fails");

        assert_eq!(controller.preview(), "");
        let status = controller.status().expect("status set");
        assert!(status.is_error());
        assert_eq!(status.text, "Paciente no encontrado.");
    }

    #[tokio::test]
    async fn test_submit_requires_dni_and_sends_nothing() {
        let http = Arc::new(ScriptedHttpClient::new());
        let mut controller = controller(&http);
        fill_vitals(&mut controller);

        let err = controller.submit().await.expect_err("submit needs dni");

        assert!(err.is_validation());
        assert_eq!(controller.status().map(|s| s.text.as_str()), Some(DNI_REQUIRED_TRIAGE));
        assert!(http.requests().is_empty());
        assert_eq!(controller.form().get("pesoKg"), Some("70"));
    }

    #[tokio::test]
    async fn test_submit_posts_vitals_with_dni_and_keeps_patient() {
        let http = Arc::new(ScriptedHttpClient::new());
        http.respond_ok(json!({"nombres": "Ana", "apellidos": "Lopez"}));
        http.respond_ok(json!({"dni": "123"}));
        let mut controller = controller(&http);
        controller.set_dni(" 123 ");
        controller.load_preview().await.expect("preview should load");
        fill_vitals(&mut controller);

        controller.submit().await.expect("submit should succeed");

        let requests = http.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(requests[1].url.as_str(), "http://triages.test/triajes");
        let body = requests[1].body.as_ref().expect("submit sends a body");
        assert_eq!(body["dni"], "123");
        assert_eq!(body["presionArterial"], "120/80");
        assert_eq!(body["tallaM"], "1.70");

        assert!(controller.form().entries().all(|(_, value)| value.is_empty()));
        assert_eq!(controller.dni(), " 123 ");
        assert_eq!(controller.preview(), "Ana Lopez");
        assert_eq!(controller.status().map(|s| s.text.as_str()), Some(TRIAGE_CREATED));
    }

    #[tokio::test]
    async fn test_submit_without_triage_api_is_validation() {
        let http = Arc::new(ScriptedHttpClient::new());
        let config = configured_store();
        config
            .save(&ApiConfig::new("http://patients.test", ""))
            .expect("save config");
        let mut controller = TriageFormController::new(config, http.clone());
        controller.set_dni("123");

        let err = controller.submit().await.expect_err("submit should fail");

        assert!(err.is_validation());
        assert_eq!(controller.status().map(|s| s.text.as_str()), Some(TRIAGES_API_MISSING));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejection_keeps_vitals() {
        let http = Arc::new(ScriptedHttpClient::new());
        http.respond_status(400, json!({"message": "Faltan campos requeridos: tallaM"}));
        let mut controller = controller(&http);
        controller.set_dni("123");
        fill_vitals(&mut controller);

        controller.submit().await.expect_err("submit should fail");

        assert_eq!(controller.form().get("presionArterial"), Some("120/80"));
        assert_eq!(
            controller.status().map(|s| s.text.as_str()),
            Some("Faltan campos requeridos: tallaM")
        );
    }
}
