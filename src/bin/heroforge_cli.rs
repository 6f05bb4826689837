//! HeroForge CLI - Bridge interface for the editor and export pipeline
//!
//! Commands: rules, validate, fix, publish
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure or blocked publish

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use heroforge_core::{rules, Composition, EngineConfig, RuleInfo, ReviewPipeline};

#[derive(Parser)]
#[command(name = "heroforge-cli")]
#[command(about = "HeroForge CLI - Composition rule engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to engine config (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered rules
    Rules {
        /// Only rules in this category
        #[arg(long)]
        category: Option<String>,

        /// Only rules of this severity (error, warning)
        #[arg(long)]
        severity: Option<String>,

        /// Only rules with an auto-fix
        #[arg(long)]
        fixable: bool,
    },

    /// Validate a composition
    Validate {
        #[command(flatten)]
        input: Input,
    },

    /// Auto-fix a composition
    Fix {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        mode: FixMode,
    },

    /// Validate and produce a publish manifest
    Publish {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Input {
    /// JSON payload (Composition)
    #[arg(short, long)]
    payload: Option<String>,

    /// Path to a Composition JSON file
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct FixMode {
    /// Apply a single rule's fix
    #[arg(short, long)]
    rule: Option<String>,

    /// Apply every failing fixable rule once, in registry order
    #[arg(long)]
    all: bool,

    /// Fix and re-validate until clean or out of passes
    #[arg(long)]
    until_clean: bool,
}

impl Input {
    fn read(&self) -> Result<Composition, String> {
        let content = match (&self.payload, &self.file) {
            (Some(payload), _) => payload.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
            (None, None) => return Err("No composition given".to_string()),
        };
        serde_json::from_str(&content).map_err(|e| format!("Invalid payload: {}", e))
    }
}

fn emit<T: Serialize>(value: &T, code: ExitCode) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            code
        }
        Err(e) => fail(&format!("Serialization error: {}", e)),
    }
}

fn fail(message: &str) -> ExitCode {
    println!("{}", serde_json::json!({ "success": false, "error": message }));
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(c) => c,
            Err(e) => return fail(&e.to_string()),
        },
        None => EngineConfig::default(),
    };

    let pipeline = match ReviewPipeline::new(config) {
        Ok(p) => p,
        Err(e) => return fail(&e.to_string()),
    };

    match cli.command {
        Commands::Rules { category, severity, fixable } => {
            let listed: Vec<RuleInfo> = rules::select_rules(category.as_deref(), severity.as_deref(), fixable)
                .into_iter()
                .map(RuleInfo::of)
                .collect();

            emit(&listed, ExitCode::SUCCESS)
        }

        Commands::Validate { input } => {
            let composition = match input.read() {
                Ok(c) => c,
                Err(e) => return fail(&e),
            };

            let report = pipeline.validate(&composition);
            let code = if report.is_valid { ExitCode::SUCCESS } else { ExitCode::from(2) };
            emit(&report, code)
        }

        Commands::Fix { input, mode } => {
            let composition = match input.read() {
                Ok(c) => c,
                Err(e) => return fail(&e),
            };

            if let Some(rule_id) = mode.rule {
                let outcome = pipeline.fix(&composition, &rule_id);
                emit(&outcome, ExitCode::SUCCESS)
            } else if mode.all {
                emit(&pipeline.fix_all(&composition), ExitCode::SUCCESS)
            } else {
                let outcome = pipeline.fix_until_clean(&composition);
                let code = if outcome.report.is_valid { ExitCode::SUCCESS } else { ExitCode::from(2) };
                emit(&outcome, code)
            }
        }

        Commands::Publish { input } => {
            let composition = match input.read() {
                Ok(c) => c,
                Err(e) => return fail(&e),
            };

            match pipeline.publish(&composition) {
                Ok(manifest) => emit(
                    &serde_json::json!({ "success": true, "manifest": manifest }),
                    ExitCode::SUCCESS,
                ),
                Err(e) => {
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", output);
                    ExitCode::from(2)
                }
            }
        }
    }
}
