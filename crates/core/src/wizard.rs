//! Patient wizard steps.
//!
//! The wizard is a display concern only: all steps share one form, and moving between
//! steps neither clears nor validates anything.

use crate::constants::PATIENT_STEP_FIELDS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WizardStep {
    /// Identity: DNI, names, sex, birth date.
    #[default]
    Identity,
    /// Contact details.
    Contact,
    /// Address.
    Address,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Identity, WizardStep::Contact, WizardStep::Address];

    /// 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Identity => 1,
            WizardStep::Contact => 2,
            WizardStep::Address => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(WizardStep::Identity),
            2 => Some(WizardStep::Contact),
            3 => Some(WizardStep::Address),
            _ => None,
        }
    }

    /// Following step; the last step stays put.
    pub fn next(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(self)
    }

    /// Preceding step; the first step stays put.
    pub fn prev(self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(self)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Identity => "Datos personales",
            WizardStep::Contact => "Contacto",
            WizardStep::Address => "Direccion",
        }
    }

    /// Form fields shown on this step.
    pub fn fields(self) -> &'static [&'static str] {
        PATIENT_STEP_FIELDS[usize::from(self.number() - 1)]
    }
}

/// Every patient form field across all steps, in step order.
pub fn all_patient_fields() -> impl Iterator<Item = &'static str> {
    WizardStep::ALL
        .into_iter()
        .flat_map(|step| step.fields().iter().copied())
}
