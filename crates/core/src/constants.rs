//! Constants used throughout the intake client.
//!
//! Storage keys, registry paths and the user-facing texts live here so every
//! controller and test agrees on them.

/// Storage key holding the serialized API configuration.
pub const CONFIG_STORAGE_KEY: &str = "clinicaApiConfig";

/// Filename of the key-value storage file inside the config directory.
pub const STORAGE_FILENAME: &str = "storage.json";

/// Default config directory when none is configured.
pub const DEFAULT_CONFIG_DIR: &str = ".clinica";

/// Collection path of the patient registry.
pub const PATIENTS_PATH: &str = "pacientes";

/// Collection path of the triage registry.
pub const TRIAGES_PATH: &str = "triajes";

/// Fallback message when an error response carries no usable `message`.
pub const GENERIC_REQUEST_ERROR: &str = "Error en la solicitud";

// Config hints.
pub const CONFIG_SAVED: &str = "Configuracion guardada.";
pub const CONFIG_INCOMPLETE: &str = "Completa las URLs de API antes de registrar datos.";
pub const PATIENTS_API_MISSING: &str = "Configura la API de pacientes.";
pub const TRIAGES_API_MISSING: &str = "Configura la API de triajes.";
pub const INVALID_API_URL: &str = "URL de API invalida.";

// Patient screen.
pub const PATIENT_CREATED: &str = "Paciente registrado correctamente.";
pub const PATIENT_UPDATED: &str = "Paciente actualizado.";
pub const PATIENT_FOUND: &str = "Paciente encontrado.";
pub const PATIENT_DELETED: &str = "Paciente eliminado.";
pub const DNI_REQUIRED_UPDATE: &str = "Ingresa DNI para actualizar.";
pub const DNI_REQUIRED_FIND: &str = "Ingresa DNI para buscar.";
pub const DNI_REQUIRED_DELETE: &str = "Ingresa DNI para eliminar.";
pub const INVALID_WIZARD_STEP: &str = "Paso de formulario invalido.";

// Triage screen.
pub const PATIENT_LOADED: &str = "Paciente cargado.";
pub const TRIAGE_CREATED: &str = "Triaje registrado correctamente.";
pub const DNI_REQUIRED_TRIAGE: &str = "Ingresa DNI del paciente.";

// Query screen.
pub const NO_TRIAGES: &str = "No hay triajes.";
pub const DNI_REQUIRED_QUERY: &str = "Ingresa DNI para consultar.";

/// Patient form fields per wizard step, in display order.
pub const PATIENT_STEP_FIELDS: [&[&str]; 3] = [
    &["dni", "nombres", "apellidos", "sexo", "fechaNacimiento"],
    &["correo", "celular"],
    &["direccion", "distrito", "provincia", "departamento"],
];

/// Vital-sign fields of the triage form, in display order.
pub const TRIAGE_FIELDS: &[&str] = &[
    "fechaHora",
    "presionArterial",
    "frecuenciaCardiaca",
    "saturacionOxigeno",
    "temperaturaCorporal",
    "pesoKg",
    "tallaM",
];
