use clap::{Parser, Subcommand};
use clinica_core::{
    constants::DEFAULT_CONFIG_DIR,
    validation::parse_field_assignment,
    view::{render_app, render_patient_form, render_query, render_status, render_triage_form},
    FileKeyValueStore, IntakeApp, IntakeError, IntakeResult, ReqwestClient, Section, StatusMessage,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinica")]
#[command(about = "Clinical intake client for the patient and triage registries")]
struct Cli {
    /// Directory holding the persistent storage file (overrides CLINICA_CONFIG_DIR)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Registry base URLs
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
    /// Patient registration
    Patient {
        #[command(subcommand)]
        action: PatientCommand,
    },
    /// Triage entry and search
    Triage {
        #[command(subcommand)]
        action: TriageCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the sections and the stored configuration
    Show,
    /// Save both registry base URLs
    Set {
        /// Patient registry base URL
        #[arg(long)]
        patients_api: String,
        /// Triage registry base URL
        #[arg(long)]
        triages_api: String,
    },
}

#[derive(Subcommand)]
enum PatientCommand {
    /// Register a new patient
    Create {
        /// Form field assignment, repeatable (e.g. --field nombres=Ana)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Update the patient keyed by the dni field
    Update {
        /// Form field assignment, repeatable; must include dni
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Load a patient
    Find {
        /// Patient DNI
        dni: String,
    },
    /// Delete a patient
    Delete {
        /// Patient DNI
        dni: String,
    },
}

#[derive(Subcommand)]
enum TriageCommand {
    /// Show the display name of a patient
    Preview {
        /// Patient DNI
        dni: String,
    },
    /// Record a new triage for a patient
    Submit {
        /// Patient DNI
        dni: String,
        /// Vital-sign assignment, repeatable (e.g. --field pesoKg=70)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// List the triages of a patient
    Search {
        /// Patient DNI
        dni: String,
    },
    /// Show one triage record
    Detail {
        /// Patient DNI
        dni: String,
        /// Triage timestamp as listed by search
        fecha_hora: String,
    },
}

/// Applies `name=value` assignments through `set`, stopping at the first failure.
fn apply_fields(
    assignments: &[String],
    mut set: impl FnMut(&str, String) -> IntakeResult<()>,
) -> IntakeResult<()> {
    for assignment in assignments {
        let (name, value) = parse_field_assignment(assignment)?;
        set(&name, value)?;
    }
    Ok(())
}

fn print_status(status: Option<&StatusMessage>) -> bool {
    let rendered = render_status(status);
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    !status.is_some_and(StatusMessage::is_error)
}

fn print_rejected_input(err: &IntakeError) -> bool {
    print_status(Some(&StatusMessage::from_error(err)))
}

async fn run(app: &mut IntakeApp, command: Commands) -> bool {
    match command {
        Commands::Config { action } => match action {
            ConfigCommand::Show => {
                print!("{}", render_app(&app.view()));
                true
            }
            ConfigCommand::Set {
                patients_api,
                triages_api,
            } => match app.save_config(&patients_api, &triages_api) {
                Ok(()) => {
                    print!("{}", render_app(&app.view()));
                    true
                }
                Err(e) => {
                    eprintln!("Error saving configuration: {}", e);
                    false
                }
            },
        },
        Commands::Patient { action } => {
            app.set_active_section(Section::Pacientes);
            let patients = &mut app.patients;
            match action {
                PatientCommand::Create { fields } => {
                    if let Err(e) = apply_fields(&fields, |name, value| patients.set_field(name, value)) {
                        return print_rejected_input(&e);
                    }
                    let _ = patients.create().await;
                    print!("{}", render_patient_form(&patients.view()));
                }
                PatientCommand::Update { fields } => {
                    if let Err(e) = apply_fields(&fields, |name, value| patients.set_field(name, value)) {
                        return print_rejected_input(&e);
                    }
                    let _ = patients.update().await;
                    print!("{}", render_patient_form(&patients.view()));
                }
                PatientCommand::Find { dni } => {
                    if let Err(e) = patients.set_field("dni", dni) {
                        return print_rejected_input(&e);
                    }
                    let found = patients.find().await.is_ok();
                    print_status(patients.status());
                    if found {
                        for (name, value) in patients.form().entries() {
                            println!("{name}: {value}");
                        }
                    }
                }
                PatientCommand::Delete { dni } => {
                    if let Err(e) = patients.set_field("dni", dni) {
                        return print_rejected_input(&e);
                    }
                    let _ = patients.delete().await;
                    print_status(patients.status());
                }
            }
            !patients.status().is_some_and(StatusMessage::is_error)
        }
        Commands::Triage { action } => match action {
            TriageCommand::Preview { dni } => {
                app.set_active_section(Section::Triaje);
                app.triage.set_dni(dni);
                let _ = app.triage.load_preview().await;
                print!("{}", render_triage_form(&app.triage.view()));
                !app.triage.status().is_some_and(StatusMessage::is_error)
            }
            TriageCommand::Submit { dni, fields } => {
                app.set_active_section(Section::Triaje);
                let triage = &mut app.triage;
                triage.set_dni(dni);
                if let Err(e) = apply_fields(&fields, |name, value| triage.set_field(name, value)) {
                    return print_rejected_input(&e);
                }
                let _ = triage.submit().await;
                print!("{}", render_triage_form(&triage.view()));
                !triage.status().is_some_and(StatusMessage::is_error)
            }
            TriageCommand::Search { dni } => {
                app.set_active_section(Section::Consulta);
                app.query.set_query_dni(dni);
                let _ = app.query.search().await;
                print!("{}", render_query(&app.query.view()));
                !app.query.status().is_some_and(StatusMessage::is_error)
            }
            TriageCommand::Detail { dni, fecha_hora } => {
                app.set_active_section(Section::Consulta);
                let outcome = app.query.view_detail(dni, fecha_hora).await;
                print!("{}", render_query(&app.query.view()));
                outcome.is_ok()
            }
        },
    }
}

/// Entry point for the intake client.
///
/// Resolves the storage directory (`--config-dir`, then `CLINICA_CONFIG_DIR`, then
/// `.clinica`), runs one command on a single-threaded runtime and exits with status 1
/// when the command's status region ends in an error.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("clinica=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'clinica --help' for commands");
        return Ok(());
    };

    let config_dir = cli
        .config_dir
        .or_else(|| std::env::var("CLINICA_CONFIG_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));
    tracing::debug!("using config directory {}", config_dir.display());

    let mut app = IntakeApp::new(
        Arc::new(FileKeyValueStore::new(&config_dir)),
        Arc::new(ReqwestClient::new()),
    );

    let is_action = !matches!(command, Commands::Config { .. });
    let succeeded = run(&mut app, command).await;
    if let Some(warning) = app.config_warning().filter(|_| is_action) {
        println!("{}", render_status(Some(&warning)));
    }

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}
