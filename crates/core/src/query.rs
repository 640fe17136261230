//! Triage search and detail screen.
//!
//! Searching replaces the result list and clears the detail pane. Selecting a row
//! loads that record's detail into the pane.
//!
//! ## Detail ordering
//!
//! Each detail load is tagged with a [`DetailTicket`] carrying a sequence number.
//! Only the most recently issued ticket may write the pane: a response that resolves
//! after a newer selection (or after a new search) is discarded. Callers that want to
//! overlap loads use [`TriageQueryController::begin_detail`],
//! [`TriageQueryController::fetch_detail`] and [`TriageQueryController::apply_detail`]
//! directly; [`TriageQueryController::view_detail`] runs all three in sequence.

use crate::config::ConfigStore;
use crate::constants::{DNI_REQUIRED_QUERY, NO_TRIAGES, TRIAGES_API_MISSING};
use crate::error::{IntakeError, IntakeResult};
use crate::http::HttpClient;
use crate::models::{TriageRecord, TriageSummary};
use crate::registry::RegistryClient;
use crate::view::{DetailPane, QueryView, StatusMessage, TriageDetailView, TriageRowView};
use clinica_types::{Dni, NonEmptyText};
use std::sync::Arc;

/// Detail pane message when a row's timestamp is missing.
const FECHA_HORA_REQUIRED: &str = "Fecha y hora del triaje requerida.";

/// Claim on the detail pane for one detail load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailTicket {
    seq: u64,
    dni: String,
    fecha_hora: String,
}

impl DetailTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What happened to a detail response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailOutcome {
    /// The response was rendered into the pane.
    Applied,
    /// A newer selection or search superseded the ticket; the response was dropped.
    Stale,
}

pub struct TriageQueryController {
    config: Arc<ConfigStore>,
    registry: RegistryClient,
    query_dni: String,
    rows: Vec<TriageSummary>,
    detail: DetailPane,
    status: Option<StatusMessage>,
    latest_seq: u64,
}

impl TriageQueryController {
    pub fn new(config: Arc<ConfigStore>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            registry: RegistryClient::new(http),
            query_dni: String::new(),
            rows: Vec::new(),
            detail: DetailPane::Empty,
            status: None,
            latest_seq: 0,
        }
    }

    pub fn set_query_dni(&mut self, dni: impl Into<String>) {
        self.query_dni = dni.into();
    }

    pub fn rows(&self) -> &[TriageSummary] {
        &self.rows
    }

    pub fn detail(&self) -> &DetailPane {
        &self.detail
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn view(&self) -> QueryView {
        QueryView {
            query_dni: self.query_dni.clone(),
            rows: self.rows.iter().map(TriageRowView::from).collect(),
            detail: self.detail.clone(),
            status: self.status.clone(),
        }
    }

    /// Replaces the rows and clears the detail pane, invalidating outstanding tickets.
    fn show_rows(&mut self, rows: Vec<TriageSummary>) {
        self.rows = rows;
        self.detail = DetailPane::Empty;
        self.latest_seq += 1;
    }

    /// Lists the triages of the queried DNI.
    ///
    /// An empty result is informational, not an error. On failure the list and the
    /// detail pane are cleared and the error is shown in the status region.
    pub async fn search(&mut self) -> IntakeResult<()> {
        let dni = match Dni::parse(&self.query_dni) {
            Ok(dni) => dni,
            Err(_) => {
                let err = IntakeError::Validation(DNI_REQUIRED_QUERY.into());
                self.status = Some(StatusMessage::from_error(&err));
                return Err(err);
            }
        };
        let config = self.config.get_active();

        let listing = self
            .registry
            .list_triages(&config.triages_api, TRIAGES_API_MISSING, &dni)
            .await;
        match listing {
            Ok(rows) => {
                self.status = if rows.is_empty() {
                    Some(StatusMessage::info(NO_TRIAGES))
                } else {
                    None
                };
                self.show_rows(rows);
                Ok(())
            }
            Err(err) => {
                self.show_rows(Vec::new());
                self.status = Some(StatusMessage::from_error(&err));
                Err(err)
            }
        }
    }

    /// Claims the detail pane for the record keyed by `dni` and `fecha_hora`.
    ///
    /// Any previously issued ticket becomes stale.
    pub fn begin_detail(&mut self, dni: impl Into<String>, fecha_hora: impl Into<String>) -> DetailTicket {
        self.latest_seq += 1;
        DetailTicket {
            seq: self.latest_seq,
            dni: dni.into(),
            fecha_hora: fecha_hora.into(),
        }
    }

    /// Fetches the record a ticket refers to. Does not touch the pane.
    pub async fn fetch_detail(&self, ticket: &DetailTicket) -> IntakeResult<TriageRecord> {
        let dni = Dni::parse(&ticket.dni)
            .map_err(|_| IntakeError::Validation(DNI_REQUIRED_QUERY.into()))?;
        let fecha_hora = NonEmptyText::new(&ticket.fecha_hora)
            .map_err(|_| IntakeError::Validation(FECHA_HORA_REQUIRED.into()))?;
        let config = self.config.get_active();

        self.registry
            .get_triage(&config.triages_api, TRIAGES_API_MISSING, &dni, &fecha_hora)
            .await
    }

    /// Renders a fetched detail if `ticket` is still the latest.
    ///
    /// # Errors
    ///
    /// When the ticket is current and `result` is an error, the pane shows the error
    /// message and the error is returned. Stale results are dropped whatever they hold.
    pub fn apply_detail(
        &mut self,
        ticket: &DetailTicket,
        result: IntakeResult<TriageRecord>,
    ) -> IntakeResult<DetailOutcome> {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "dropping stale triage detail"
            );
            return Ok(DetailOutcome::Stale);
        }

        match result {
            Ok(record) => {
                self.detail = DetailPane::Record(TriageDetailView::from(&record));
                Ok(DetailOutcome::Applied)
            }
            Err(err) => {
                self.detail = DetailPane::Error(err.user_message());
                Err(err)
            }
        }
    }

    /// Loads and shows the detail for one row.
    pub async fn view_detail(
        &mut self,
        dni: impl Into<String>,
        fecha_hora: impl Into<String>,
    ) -> IntakeResult<DetailOutcome> {
        let ticket = self.begin_detail(dni, fecha_hora);
        let result = self.fetch_detail(&ticket).await;
        self.apply_detail(&ticket, result)
    }
}

impl std::fmt::Debug for TriageQueryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageQueryController")
            .field("query_dni", &self.query_dni)
            .field("rows", &self.rows)
            .field("detail", &self.detail)
            .field("status", &self.status)
            .field("latest_seq", &self.latest_seq)
            .finish_non_exhaustive()
    }
}
