use clap::{Parser, Subcommand, ValueEnum};
use flowcraft::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// CLI-specific mirror of `ResolutionMode` for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeCli {
    InitialPlan,
    FinalPlan,
    UnplannedWork,
    Replan,
}

impl From<ModeCli> for ResolutionMode {
    fn from(mode: ModeCli) -> Self {
        match mode {
            ModeCli::InitialPlan => ResolutionMode::InitialPlan,
            ModeCli::FinalPlan => ResolutionMode::FinalPlan,
            ModeCli::UnplannedWork => ResolutionMode::UnplannedWork,
            ModeCli::Replan => ResolutionMode::Replan,
        }
    }
}

/// Inspect and resolve project workflow templates
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional engine configuration JSON file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log engine decisions and repairs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the decisions a project asks for, with their current status
    Decisions {
        /// Path to the project JSON file
        project_path: String,
        /// Path to the flow configuration JSON file
        #[arg(short, long)]
        flows: Option<String>,
        /// Path to a saved selections JSON file (`answers` / `ifNecessaryWork`)
        #[arg(short, long)]
        answers: Option<String>,
    },
    /// Resolve a project into the plan for one run
    Resolve {
        /// Path to the project JSON file
        project_path: String,
        /// Path to the flow configuration JSON file
        #[arg(short, long)]
        flows: Option<String>,
        /// Path to a selections JSON file (`answers` / `ifNecessaryWork`)
        #[arg(short, long)]
        answers: Option<String>,
        /// The kind of planning session
        #[arg(short, long, value_enum, default_value = "initial-plan")]
        mode: ModeCli,
        /// Write the resulting project run as JSON to this path
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print a phase list in canonical order
    Order {
        /// Path to a JSON array of phases
        phases_path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Decisions {
            project_path,
            flows,
            answers,
        } => {
            let session = open_session(&project_path, flows, answers, config, ResolutionMode::InitialPlan);
            let rollup = session.rollup();
            println!("{}", PlanFormatter::format_decisions(session.items()));
            println!(
                "\n{} decision(s): {} pending, {} answered, {} need attention",
                rollup.total, rollup.pending, rollup.answered, rollup.requires_attention
            );
        }
        Command::Resolve {
            project_path,
            flows,
            answers,
            mode,
            output,
        } => {
            let start = Instant::now();
            let session = open_session(&project_path, flows, answers, config, mode.into());
            match session.finalize() {
                Ok(finalized) => {
                    println!("{}", PlanFormatter::format_plan(&finalized.run.phases));
                    if !finalized.warnings.is_empty() {
                        println!("{}", PlanFormatter::format_warnings(&finalized.warnings));
                    }
                    if let Some(path) = output {
                        let json = serde_json::to_string_pretty(&finalized.run).unwrap_or_else(|e| {
                            exit_with_error(&format!("Failed to serialize run: {}", e))
                        });
                        fs::write(&path, json).unwrap_or_else(|e| {
                            exit_with_error(&format!("Failed to write '{}': {}", path, e))
                        });
                    }
                    println!("Resolved in {:?}", start.elapsed());
                }
                Err(failure) => {
                    for error in &failure.errors {
                        eprintln!("error: {}", error);
                    }
                    if !failure.warnings.is_empty() {
                        eprintln!("{}", PlanFormatter::format_warnings(&failure.warnings));
                    }
                    std::process::exit(2);
                }
            }
        }
        Command::Order { phases_path } => {
            let phases: Vec<Phase> = read_json(&phases_path);
            let report = PhaseOrdering::new(&config).enforce(&phases);
            println!("{}", PlanFormatter::format_plan(&report.phases));
            if !report.warnings.is_empty() {
                println!("{}", PlanFormatter::format_warnings(&report.warnings));
            }
        }
    }
}

fn open_session(
    project_path: &str,
    flows_path: Option<String>,
    answers_path: Option<String>,
    config: EngineConfig,
    mode: ResolutionMode,
) -> ResolutionSession {
    let project: Project = read_json(project_path);
    let flows = match flows_path {
        Some(path) => {
            let json = read_file(&path);
            FlowConfigStore::from_json_str(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flows '{}': {}", path, e)))
        }
        None => FlowConfigStore::new(),
    };
    let selections: Selections = answers_path.map(|path| read_json(&path)).unwrap_or_default();
    let run_id = format!("{}-run", project.id);
    ResolutionSession::open(project, flows, config, mode, run_id, selections)
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> T {
    serde_json::from_str(&read_file(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
