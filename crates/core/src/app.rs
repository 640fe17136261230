//! Application shell.
//!
//! [`IntakeApp`] wires one config store and one HTTP client into the three screen
//! controllers and tracks which section is active. It holds no patient or triage
//! data of its own; every screen re-fetches on demand.

use crate::config::{ApiConfig, ConfigStore};
use crate::error::IntakeResult;
use crate::http::HttpClient;
use crate::patient::PatientFormController;
use crate::query::TriageQueryController;
use crate::storage::KeyValueStore;
use crate::triage::TriageFormController;
use crate::view::StatusMessage;
use std::sync::Arc;

/// Top-level sections of the intake client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Section {
    /// Patient registration wizard.
    #[default]
    Pacientes,
    /// Triage entry.
    Triaje,
    /// Triage search.
    Consulta,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Pacientes, Section::Triaje, Section::Consulta];

    pub fn label(self) -> &'static str {
        match self {
            Section::Pacientes => "Pacientes",
            Section::Triaje => "Triaje",
            Section::Consulta => "Consulta",
        }
    }
}

/// Shell state: the active section and the config panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppView {
    pub active: Section,
    pub config: ApiConfig,
    pub hint: Option<StatusMessage>,
}

pub struct IntakeApp {
    config: Arc<ConfigStore>,
    active: Section,
    pub patients: PatientFormController,
    pub triage: TriageFormController,
    pub query: TriageQueryController,
}

impl IntakeApp {
    /// Builds the shell and its controllers over shared storage and HTTP client.
    pub fn new(storage: Arc<dyn KeyValueStore>, http: Arc<dyn HttpClient>) -> Self {
        let config = Arc::new(ConfigStore::new(storage));
        Self {
            patients: PatientFormController::new(config.clone(), http.clone()),
            triage: TriageFormController::new(config.clone(), http.clone()),
            query: TriageQueryController::new(config.clone(), http),
            config,
            active: Section::default(),
        }
    }

    /// The incomplete-config warning left by the last action, if any.
    ///
    /// Actions only record it in the config hint, so front ends that do not show
    /// the config panel after every action surface it through here.
    pub fn config_warning(&self) -> Option<StatusMessage> {
        self.config.hint().filter(StatusMessage::is_error)
    }

    /// Values to pre-fill the config inputs with at startup.
    pub fn config_inputs(&self) -> ApiConfig {
        self.config.load()
    }

    /// Saves the config inputs (trimmed).
    pub fn save_config(&self, patients_api: &str, triages_api: &str) -> IntakeResult<()> {
        self.config.save(&ApiConfig::new(patients_api, triages_api))
    }

    pub fn active_section(&self) -> Section {
        self.active
    }

    pub fn set_active_section(&mut self, section: Section) {
        self.active = section;
    }

    pub fn view(&self) -> AppView {
        AppView {
            active: self.active,
            config: self.config.load(),
            hint: self.config.hint(),
        }
    }
}

impl std::fmt::Debug for IntakeApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeApp")
            .field("active", &self.active)
            .field("patients", &self.patients)
            .field("triage", &self.triage)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CONFIG_INCOMPLETE, CONFIG_SAVED};
    use crate::storage::MemoryKeyValueStore;
    use crate::testing::ScriptedHttpClient;
    use crate::view::{render_app, render_status};
    use serde_json::json;

    fn app(http: &Arc<ScriptedHttpClient>) -> IntakeApp {
        IntakeApp::new(Arc::new(MemoryKeyValueStore::new()), http.clone())
    }

    #[test]
    fn test_section_default_and_labels() {
        assert_eq!(Section::default(), Section::Pacientes);
        let labels: Vec<&str> = Section::ALL.iter().map(|section| section.label()).collect();
        assert_eq!(labels, ["Pacientes", "Triaje", "Consulta"]);
    }

    #[test]
    fn test_fresh_app_has_empty_config_inputs() {
        let http = Arc::new(ScriptedHttpClient::new());
        let app = app(&http);

        assert_eq!(app.config_inputs(), ApiConfig::default());
        assert_eq!(app.view().hint, None);
    }

    #[test]
    fn test_view_tracks_active_section_and_hint() {
        let http = Arc::new(ScriptedHttpClient::new());
        let mut app = app(&http);
        app.save_config(" http://a ", "http://b").expect("save config");
        app.set_active_section(Section::Triaje);

        let view = app.view();
        assert_eq!(view.active, Section::Triaje);
        assert_eq!(view.config.patients_api, "http://a");

        let text = render_app(&view);
        assert!(text.starts_with(" Pacientes  [Triaje]  Consulta \n"));
        assert!(text.contains(&format!("[ok] {CONFIG_SAVED}")));
    }

    #[tokio::test]
    async fn test_action_with_incomplete_config_surfaces_warning() {
        let http = Arc::new(ScriptedHttpClient::new());
        let mut app = app(&http);
        app.save_config("", "http://triages.test").expect("save config");
        assert_eq!(app.config_warning(), None);

        app.patients.set_field("dni", "123").expect("known field");
        app.patients.find().await.expect_err("patients API is missing");

        let warning = app.config_warning().expect("warning recorded");
        assert_eq!(
            render_status(Some(&warning)),
            format!("[error] {CONFIG_INCOMPLETE}")
        );
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_complete_config_leaves_no_warning() {
        let http = Arc::new(ScriptedHttpClient::new());
        http.respond_ok(json!({"items": []}));
        let mut app = app(&http);
        app.save_config("http://patients.test", "http://triages.test")
            .expect("save config");

        app.query.set_query_dni("123");
        app.query.search().await.expect("search succeeds");

        assert_eq!(app.config_warning(), None);
    }

    #[tokio::test]
    async fn test_saved_config_reaches_controllers_without_rebuild() {
        let http = Arc::new(ScriptedHttpClient::new());
        http.respond_ok(json!({"items": []}));
        let mut app = app(&http);

        app.save_config("http://patients.test", "http://triages.test/v1")
            .expect("save config");
        app.query.set_query_dni("123");
        app.query.search().await.expect("search succeeds");

        assert_eq!(
            http.requests()[0].url.as_str(),
            "http://triages.test/v1/triajes?dni=123"
        );
    }
}
