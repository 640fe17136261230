//! View models and their text renderers.
//!
//! Controllers never format output themselves. They expose a view model describing
//! what a screen shows, and the `render_*` functions here turn that into text. Both
//! halves are plain data and plain functions, so screens can be tested without a
//! terminal.

use crate::app::{AppView, Section};
use crate::error::IntakeError;
use crate::models::{TriageRecord, TriageSummary};
use crate::wizard::WizardStep;
use chrono::{DateTime, NaiveDateTime};
use std::fmt::Write as _;

// ============================================================================
// STATUS REGIONS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Info,
    Error,
}

/// Content of a screen's status region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    pub fn from_error(err: &IntakeError) -> Self {
        Self::error(err.user_message())
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// Renders a status region; an empty region renders as an empty string.
pub fn render_status(status: Option<&StatusMessage>) -> String {
    match status {
        None => String::new(),
        Some(message) if message.text.is_empty() => String::new(),
        Some(message) => {
            let marker = match message.kind {
                StatusKind::Success => "[ok]",
                StatusKind::Info => "[info]",
                StatusKind::Error => "[error]",
            };
            format!("{marker} {}", message.text)
        }
    }
}

// ============================================================================
// FORMS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldView {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepView {
    pub step: WizardStep,
    pub active: bool,
    pub fields: Vec<FieldView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientFormView {
    pub current_step: WizardStep,
    pub steps: Vec<StepView>,
    pub status: Option<StatusMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriageFormView {
    pub dni: String,
    pub preview: String,
    pub fields: Vec<FieldView>,
    pub status: Option<StatusMessage>,
}

fn push_field(out: &mut String, field: &FieldView) {
    let _ = writeln!(out, "    {}: {}", field.name, field.value);
}

/// Renders the patient wizard. Only the active step's fields are listed.
pub fn render_patient_form(view: &PatientFormView) -> String {
    let mut out = String::new();

    let tabs: Vec<String> = view
        .steps
        .iter()
        .map(|step| {
            if step.active {
                format!("[{}. {}]", step.step.number(), step.step.title())
            } else {
                format!(" {}. {} ", step.step.number(), step.step.title())
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join(" "));

    for step in view.steps.iter().filter(|step| step.active) {
        for field in &step.fields {
            push_field(&mut out, field);
        }
    }

    let status = render_status(view.status.as_ref());
    if !status.is_empty() {
        let _ = writeln!(out, "{status}");
    }
    out
}

/// Renders the triage entry form with its patient preview.
pub fn render_triage_form(view: &TriageFormView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "DNI: {}", view.dni);
    let _ = writeln!(out, "Paciente: {}", view.preview);
    for field in &view.fields {
        push_field(&mut out, field);
    }

    let status = render_status(view.status.as_ref());
    if !status.is_empty() {
        let _ = writeln!(out, "{status}");
    }
    out
}

// ============================================================================
// TRIAGE QUERY
// ============================================================================

/// One selectable search result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriageRowView {
    pub dni: String,
    /// Raw timestamp, used with `dni` as the detail key.
    pub fecha_hora: String,
    /// Timestamp as displayed.
    pub when: String,
}

impl From<&TriageSummary> for TriageRowView {
    fn from(summary: &TriageSummary) -> Self {
        Self {
            dni: summary.dni.clone(),
            fecha_hora: summary.fecha_hora.clone(),
            when: format_date_time(&summary.fecha_hora),
        }
    }
}

/// Labelled vital signs of one triage record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriageDetailView {
    pub rows: Vec<(&'static str, String)>,
}

impl From<&TriageRecord> for TriageDetailView {
    fn from(record: &TriageRecord) -> Self {
        Self {
            rows: vec![
                ("DNI", record.dni.clone()),
                ("Fecha", format_date_time(&record.fecha_hora)),
                ("Presion arterial", record.presion_arterial.clone()),
                ("Frecuencia cardiaca", record.frecuencia_cardiaca.clone()),
                ("Saturacion oxigeno", record.saturacion_oxigeno.clone()),
                ("Temperatura corporal", record.temperatura_corporal.clone()),
                ("Peso (kg)", record.peso_kg.clone()),
                ("Talla (m)", record.talla_m.clone()),
            ],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DetailPane {
    #[default]
    Empty,
    Record(TriageDetailView),
    /// The pane shows only this message.
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryView {
    pub query_dni: String,
    pub rows: Vec<TriageRowView>,
    pub detail: DetailPane,
    pub status: Option<StatusMessage>,
}

/// Renders search results, one numbered row each.
pub fn render_triage_list(rows: &[TriageRowView]) -> String {
    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}  {}", index + 1, row.dni, row.when);
    }
    out
}

/// Renders the detail pane. An error pane renders exactly its message.
pub fn render_detail(pane: &DetailPane) -> String {
    match pane {
        DetailPane::Empty => String::new(),
        DetailPane::Error(message) => message.clone(),
        DetailPane::Record(detail) => {
            let mut out = String::new();
            for (label, value) in &detail.rows {
                let _ = writeln!(out, "{label}: {value}");
            }
            out
        }
    }
}

pub fn render_query(view: &QueryView) -> String {
    let mut out = render_triage_list(&view.rows);

    let status = render_status(view.status.as_ref());
    if !status.is_empty() {
        let _ = writeln!(out, "{status}");
    }

    let detail = render_detail(&view.detail);
    if !detail.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&detail);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

// ============================================================================
// APPLICATION
// ============================================================================

/// Renders the section tabs and the API configuration panel.
pub fn render_app(view: &AppView) -> String {
    let mut out = String::new();

    let tabs: Vec<String> = Section::ALL
        .iter()
        .map(|section| {
            if *section == view.active {
                format!("[{}]", section.label())
            } else {
                format!(" {} ", section.label())
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join(" "));
    let _ = writeln!(out, "API pacientes: {}", view.config.patients_api);
    let _ = writeln!(out, "API triajes: {}", view.config.triages_api);

    let hint = render_status(view.hint.as_ref());
    if !hint.is_empty() {
        let _ = writeln!(out, "{hint}");
    }
    out
}

// ============================================================================
// FORMATTING
// ============================================================================

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Formats a registry timestamp as `dd/mm/yyyy HH:MM:SS`.
///
/// RFC 3339 timestamps are shown in their own offset. Empty input renders empty and
/// anything unparseable is shown verbatim.
pub fn format_date_time(value: &str) -> String {
    const DISPLAY: &str = "%d/%m/%Y %H:%M:%S";

    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.format(DISPLAY).to_string();
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|parsed| parsed.format(DISPLAY).to_string())
        .unwrap_or_else(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_time_variants() {
        assert_eq!(format_date_time(""), "");
        assert_eq!(format_date_time("2024-05-01T10:30:00"), "01/05/2024 10:30:00");
        assert_eq!(format_date_time("2024-05-01T10:30"), "01/05/2024 10:30:00");
        assert_eq!(
            format_date_time("2024-05-01T10:30:15.250-05:00"),
            "01/05/2024 10:30:15"
        );
        assert_eq!(format_date_time("ayer"), "ayer");
    }

    #[test]
    fn test_render_status_marks_kind() {
        assert_eq!(render_status(None), "");
        assert_eq!(
            render_status(Some(&StatusMessage::success("Paciente eliminado."))),
            "[ok] Paciente eliminado."
        );
        assert_eq!(
            render_status(Some(&StatusMessage::info("No hay triajes."))),
            "[info] No hay triajes."
        );
        assert_eq!(
            render_status(Some(&StatusMessage::error("boom"))),
            "[error] boom"
        );
    }

    #[test]
    fn test_render_detail_error_is_exact_message() {
        let pane = DetailPane::Error("not found".into());
        assert_eq!(render_detail(&pane), "not found");
    }

    #[test]
    fn test_render_detail_record_lists_every_vital_sign() {
        let record = TriageRecord {
            dni: "123".into(),
            fecha_hora: "2024-05-01T10:30:00".into(),
            presion_arterial: "120/80".into(),
            frecuencia_cardiaca: "72".into(),
            saturacion_oxigeno: "98".into(),
            temperatura_corporal: "36.5".into(),
            peso_kg: "70".into(),
            talla_m: "1.70".into(),
        };

        let text = render_detail(&DetailPane::Record(TriageDetailView::from(&record)));

        assert!(text.contains("DNI: 123\n"));
        assert!(text.contains("Fecha: 01/05/2024 10:30:00\n"));
        assert!(text.contains("Presion arterial: 120/80\n"));
        assert!(text.contains("Talla (m): 1.70\n"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_render_triage_list_numbers_rows() {
        let rows = vec![
            TriageRowView::from(&TriageSummary {
                dni: "123".into(),
                fecha_hora: "2024-05-01T10:30:00".into(),
            }),
            TriageRowView::from(&TriageSummary {
                dni: "123".into(),
                fecha_hora: "".into(),
            }),
        ];

        let text = render_triage_list(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["  1. 123  01/05/2024 10:30:00", "  2. 123  "]);
        assert_eq!(render_triage_list(&[]), "");
    }

    #[test]
    fn test_render_patient_form_shows_active_step_only() {
        let view = PatientFormView {
            current_step: WizardStep::Contact,
            steps: WizardStep::ALL
                .iter()
                .map(|step| StepView {
                    step: *step,
                    active: *step == WizardStep::Contact,
                    fields: step
                        .fields()
                        .iter()
                        .map(|name| FieldView {
                            name: (*name).to_owned(),
                            value: String::new(),
                        })
                        .collect(),
                })
                .collect(),
            status: None,
        };

        let text = render_patient_form(&view);
        assert!(text.starts_with(" 1. Datos personales  [2. Contacto]  3. Direccion \n"));
        assert!(text.contains("    correo: \n"));
        assert!(!text.contains("dni"));
    }
}
