//! retrolens CLI
//!
//! Commands:
//! - prep: categorize a day of glucose and treatment history (batch mode)
//! - validate: check a prep input file without running the pipeline
//! - doctor: diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use retrolens::ingest::resolve_samples;
use retrolens::pipeline::{prep, PrepInput};
use retrolens::schedule::{basal_lookup, isf_lookup};
use retrolens::{ENGINE_VERSION, PRODUCER_NAME};

/// retrolens - retrospective glucose categorization for profile tuning
#[derive(Parser)]
#[command(name = "retrolens")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Categorize glucose history for insulin profile tuning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize a day of glucose and treatment history
    Prep {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Validate a prep input file without running the pipeline
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check a prep input file's profile
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PrepCliError> {
    match cli.command {
        Commands::Prep {
            input,
            output,
            output_format,
        } => cmd_prep(&input, &output, output_format),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Doctor { profile, json } => cmd_doctor(profile.as_deref(), json),
    }
}

fn read_input(path: &Path) -> Result<String, PrepCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn cmd_prep(input: &Path, output: &Path, output_format: OutputFormat) -> Result<(), PrepCliError> {
    let input_data = read_input(input)?;
    let prep_input: PrepInput = serde_json::from_str(&input_data)?;

    if prep_input.glucose.is_empty() {
        return Err(PrepCliError::NoGlucose);
    }

    let dataset = prep(&prep_input);

    let output_data = match output_format {
        OutputFormat::Json => serde_json::to_string(&dataset)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&dataset)?,
    };

    if output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), PrepCliError> {
    let input_data = read_input(input)?;
    let prep_input: PrepInput = serde_json::from_str(&input_data)?;

    let resolved = resolve_samples(&prep_input.glucose);
    let midnight = chrono::Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|n| n.and_utc())
        .unwrap_or_else(chrono::Utc::now);

    let mut errors: Vec<String> = Vec::new();
    if resolved.is_empty() {
        errors.push("no resolvable glucose records".to_string());
    }
    if prep_input.treatments.is_empty() {
        errors.push("no treatments".to_string());
    }
    let (sens, _) = isf_lookup(&prep_input.profile.isf_schedule, midnight, None);
    if sens.is_none() {
        errors.push("ISF schedule does not cover offset 0".to_string());
    }
    if basal_lookup(&prep_input.profile.basal_schedule, midnight).is_none() {
        errors.push("basal schedule is empty or ends with a zero rate".to_string());
    }
    if basal_lookup(&prep_input.profile.pump_basal_schedule, midnight).is_none() {
        errors.push("pump basal schedule is empty or ends with a zero rate".to_string());
    }

    let report = ValidationReport {
        glucose_records: prep_input.glucose.len(),
        resolved_samples: resolved.len(),
        dropped_records: prep_input.glucose.len() - resolved.len(),
        treatments: prep_input.treatments.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Glucose records:  {}", report.glucose_records);
        println!("Resolved samples: {}", report.resolved_samples);
        println!("Dropped records:  {}", report.dropped_records);
        println!("Treatments:       {}", report.treatments);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - {}", err);
            }
        }
    }

    if report.errors.is_empty() {
        Ok(())
    } else {
        Err(PrepCliError::ValidationFailed(report.errors.len()))
    }
}

fn cmd_doctor(profile: Option<&Path>, json: bool) -> Result<(), PrepCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("retrolens version {}", ENGINE_VERSION),
    });

    if let Some(profile_path) = profile {
        if profile_path.exists() {
            match fs::read_to_string(profile_path) {
                Ok(content) => match serde_json::from_str::<PrepInput>(&content) {
                    Ok(input) => {
                        checks.push(DoctorCheck {
                            name: "profile".to_string(),
                            status: CheckStatus::Ok,
                            message: format!(
                                "profile valid (curve: {}, dia: {}h)",
                                input.profile.curve, input.profile.dia_hours
                            ),
                        });
                    }
                    Err(e) => {
                        checks.push(DoctorCheck {
                            name: "profile".to_string(),
                            status: CheckStatus::Error,
                            message: format!("invalid prep input: {}", e),
                        });
                    }
                },
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "profile".to_string(),
                        status: CheckStatus::Error,
                        message: format!("cannot read file: {}", e),
                    });
                }
            }
        } else {
            checks.push(DoctorCheck {
                name: "profile".to_string(),
                status: CheckStatus::Warning,
                message: "file does not exist".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (batch mode ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("retrolens Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(PrepCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum PrepCliError {
    Io(io::Error),
    Json(serde_json::Error),
    NoGlucose,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for PrepCliError {
    fn from(e: io::Error) -> Self {
        PrepCliError::Io(e)
    }
}

impl From<serde_json::Error> for PrepCliError {
    fn from(e: serde_json::Error) -> Self {
        PrepCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<PrepCliError> for CliError {
    fn from(e: PrepCliError) -> Self {
        match e {
            PrepCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            PrepCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax against the prep input shape".to_string()),
            },
            PrepCliError::NoGlucose => CliError {
                code: "NO_GLUCOSE".to_string(),
                message: "No glucose records found in input".to_string(),
                hint: Some("Ensure the glucose array is not empty".to_string()),
            },
            PrepCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} validation errors", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            PrepCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    glucose_records: usize,
    resolved_samples: usize,
    dropped_records: usize,
    treatments: usize,
    errors: Vec<String>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
