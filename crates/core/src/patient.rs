//! Patient registration wizard.
//!
//! [`PatientFormController`] owns the patient form, the wizard step and the patient
//! status region, and runs create/read/update/delete against the patient registry.
//!
//! Every operation:
//! - validates its input before touching the network (a missing DNI or patient API
//!   URL never produces a request)
//! - reads the active config at the moment it runs
//! - leaves exactly one message in the status region, success or error
//!
//! Operations take `&mut self`, so one controller never has two requests in flight.

use crate::config::ConfigStore;
use crate::constants::{
    DNI_REQUIRED_DELETE, DNI_REQUIRED_FIND, DNI_REQUIRED_UPDATE, INVALID_WIZARD_STEP,
    PATIENTS_API_MISSING, PATIENT_CREATED, PATIENT_DELETED, PATIENT_FOUND, PATIENT_UPDATED,
};
use crate::error::{IntakeError, IntakeResult};
use crate::form::FormState;
use crate::http::HttpClient;
use crate::registry::RegistryClient;
use crate::view::{FieldView, PatientFormView, StatusMessage, StepView};
use crate::wizard::{all_patient_fields, WizardStep};
use clinica_types::Dni;
use std::sync::Arc;

pub struct PatientFormController {
    config: Arc<ConfigStore>,
    registry: RegistryClient,
    form: FormState,
    step: WizardStep,
    status: Option<StatusMessage>,
}

impl PatientFormController {
    /// Creates a controller with an empty form on the first step.
    pub fn new(config: Arc<ConfigStore>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            registry: RegistryClient::new(http),
            form: FormState::new(all_patient_fields()),
            step: WizardStep::default(),
            status: None,
        }
    }

    // ------------------------------------------------------------------------
    // Form and wizard state
    // ------------------------------------------------------------------------

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Sets one form field. Unknown field names are rejected.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> IntakeResult<()> {
        self.form.set(name, value)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn next_step(&mut self) {
        self.step = self.step.next();
    }

    pub fn prev_step(&mut self) {
        self.step = self.step.prev();
    }

    /// Jumps straight to step `number` (1 to 3).
    pub fn go_to_step(&mut self, number: u8) -> IntakeResult<()> {
        self.step = WizardStep::from_number(number)
            .ok_or_else(|| IntakeError::Validation(INVALID_WIZARD_STEP.into()))?;
        Ok(())
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn view(&self) -> PatientFormView {
        PatientFormView {
            current_step: self.step,
            steps: WizardStep::ALL
                .iter()
                .map(|step| StepView {
                    step: *step,
                    active: *step == self.step,
                    fields: step
                        .fields()
                        .iter()
                        .map(|name| FieldView {
                            name: (*name).to_owned(),
                            value: self.form.get(name).unwrap_or_default().to_owned(),
                        })
                        .collect(),
                })
                .collect(),
            status: self.status.clone(),
        }
    }

    fn clear(&mut self) {
        self.form.reset();
        self.step = WizardStep::Identity;
    }

    fn required_dni(&self, message: &str) -> IntakeResult<Dni> {
        Dni::parse(self.form.get("dni").unwrap_or_default())
            .map_err(|_| IntakeError::Validation(message.to_owned()))
    }

    fn finish(&mut self, outcome: IntakeResult<&'static str>) -> IntakeResult<()> {
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

    // ------------------------------------------------------------------------
    // Registry operations
    // ------------------------------------------------------------------------

    /// Registers the form as a new patient.
    ///
    /// On success the form is cleared and the wizard returns to step 1.
    ///
    /// # Errors
    ///
    /// Validation error when no patient API URL is configured; otherwise whatever
    /// the registry call returns.
    pub async fn create(&mut self) -> IntakeResult<()> {
        let outcome = self.try_create().await;
        self.finish(outcome)
    }

    async fn try_create(&mut self) -> IntakeResult<&'static str> {
        let config = self.config.get_active();
        let payload = self.form.serialize();
        if config.patients_api.is_empty() {
            return Err(IntakeError::Validation(PATIENTS_API_MISSING.into()));
        }

        self.registry
            .create_patient(&config.patients_api, PATIENTS_API_MISSING, payload)
            .await?;
        self.clear();
        Ok(PATIENT_CREATED)
    }

    /// Sends the whole form as an update of the patient keyed by the DNI field.
    pub async fn update(&mut self) -> IntakeResult<()> {
        let outcome = self.try_update().await;
        self.finish(outcome)
    }

    async fn try_update(&mut self) -> IntakeResult<&'static str> {
        let dni = self.required_dni(DNI_REQUIRED_UPDATE)?;
        let config = self.config.get_active();
        let payload = self.form.serialize();

        self.registry
            .update_patient(&config.patients_api, PATIENTS_API_MISSING, &dni, payload)
            .await?;
        Ok(PATIENT_UPDATED)
    }

    /// Loads the patient keyed by the DNI field into the form.
    ///
    /// Fields present in the response take its values; every other field is cleared.
    pub async fn find(&mut self) -> IntakeResult<()> {
        let outcome = self.try_find().await;
        self.finish(outcome)
    }

    async fn try_find(&mut self) -> IntakeResult<&'static str> {
        let dni = self.required_dni(DNI_REQUIRED_FIND)?;
        let config = self.config.get_active();

        let record = self
            .registry
            .get_patient(&config.patients_api, PATIENTS_API_MISSING, &dni)
            .await?;
        self.form.populate(record.fields());
        Ok(PATIENT_FOUND)
    }

    /// Deletes the patient keyed by the DNI field and clears the form.
    pub async fn delete(&mut self) -> IntakeResult<()> {
        let outcome = self.try_delete().await;
        self.finish(outcome)
    }

    async fn try_delete(&mut self) -> IntakeResult<&'static str> {
        let dni = self.required_dni(DNI_REQUIRED_DELETE)?;
        let config = self.config.get_active();

        self.registry
            .delete_patient(&config.patients_api, PATIENTS_API_MISSING, &dni)
            .await?;
        self.clear();
        Ok(PATIENT_DELETED)
    }
}

impl std::fmt::Debug for PatientFormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientFormController")
            .field("form", &self.form)
            .field("step", &self.step)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
