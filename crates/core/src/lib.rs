//! # Clinica Core
//!
//! Client-side logic for the clinical intake workflow: patient registration, triage
//! entry and triage search against two external REST registries.
//!
//! This crate contains:
//! - the API configuration store (`config`, `storage`)
//! - the JSON HTTP wrapper and typed registry access (`http`, `registry`)
//! - the three screen controllers (`patient`, `triage`, `query`) and the shell that
//!   wires them together (`app`)
//! - view models and text renderers (`view`)
//!
//! **No presentation concerns**: controllers expose view models; turning them into
//! output belongs to the `render_*` functions or the binary.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod http;
pub mod models;
pub mod patient;
pub mod query;
pub mod registry;
pub mod storage;
pub mod triage;
pub mod validation;
pub mod view;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AppView, IntakeApp, Section};
pub use config::{ApiConfig, ConfigStore};
pub use error::{IntakeError, IntakeResult};
pub use http::{HttpClient, JsonRequest, ReqwestClient};
pub use patient::PatientFormController;
pub use query::{DetailOutcome, DetailTicket, TriageQueryController};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use triage::TriageFormController;
pub use view::{DetailPane, StatusKind, StatusMessage};
pub use wizard::WizardStep;

pub use clinica_types::{Dni, NonEmptyText, TextError};
