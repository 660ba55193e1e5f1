//! cogscreen: 认知筛查评估流水线命令行工具
//!
//! Usage:
//!   cogscreen run --request <file.json> --config <agents.yaml> [--offline] [--audio-dir <path>]
//!   cogscreen validate --config <agents.yaml>
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); stdout carries only JSON.

use anyhow::{anyhow, Context};
use cogscreen::agent::{HttpReportAgentBuilder, OfflineAgent};
use cogscreen::stt::WhisperJsonTranscriber;
use cogscreen::{AgentsConfig, AssessmentRequest, Orchestrator, PipelineConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: u8 = 1;
const EXIT_CONFIGURATION: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::from(EXIT_FAILURE);
    }

    let outcome = match args[1].as_str() {
        "run" => cmd_run(&args[2..]).await,
        "validate" => cmd_validate(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("cogscreen {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let fatal_config = e
                .chain()
                .any(|cause| matches!(cause.downcast_ref::<cogscreen::Error>(), Some(err) if err.is_configuration()));
            if fatal_config {
                ExitCode::from(EXIT_CONFIGURATION)
            } else {
                ExitCode::from(EXIT_FAILURE)
            }
        }
    }
}

fn print_usage() {
    println!(
        r#"cogscreen - cognitive screening report pipeline

USAGE:
    cogscreen <COMMAND> [OPTIONS]

COMMANDS:
    run --request <file.json> --config <agents.yaml> [--offline] [--audio-dir <path>]
                                Run one assessment and print the result JSON
    validate --config <agents.yaml>
                                Check an agents configuration file
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    COGSCREEN_AGENT_BASE_URL       OpenAI-compatible API base URL
    COGSCREEN_AGENT_API_KEY        Bearer token for the agent API
    COGSCREEN_AGENT_TIMEOUT_SECS   Agent request timeout (default 120)
    RUST_LOG                       Log filter (default info)"#
    );
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn config_path(args: &[String]) -> anyhow::Result<PathBuf> {
    flag_value(args, "--config")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!(cogscreen::Error::configuration_with_context(
            "--config <agents.yaml> is required",
            cogscreen::ErrorContext::new().with_source("cli"),
        )))
}

async fn load_config(args: &[String]) -> anyhow::Result<PipelineConfig> {
    let path = config_path(args)?;
    let agents = AgentsConfig::load(&path).await?;
    let config = PipelineConfig::from_agents(agents);
    config.validate()?;
    Ok(config)
}

async fn cmd_validate(args: &[String]) -> anyhow::Result<()> {
    let config = load_config(args).await?;
    for stage in cogscreen::agent::ReportStage::ALL {
        match config.agents.agent_for(stage) {
            Some(spec) => println!("  [{stage}] {} ({})", spec.role, spec.llm),
            None => println!("  [{stage}] not configured; stage will use template fallback"),
        }
    }
    println!("Configuration OK.");
    Ok(())
}

async fn cmd_run(args: &[String]) -> anyhow::Result<()> {
    let config = load_config(args).await?;
    let request_path = flag_value(args, "--request").ok_or_else(|| anyhow!("--request <file.json> is required"))?;
    let raw = tokio::fs::read_to_string(&request_path)
        .await
        .with_context(|| format!("cannot read request {request_path}"))?;
    let request: AssessmentRequest =
        serde_json::from_str(&raw).with_context(|| format!("invalid request JSON in {request_path}"))?;

    let mut transcriber = WhisperJsonTranscriber::new();
    if let Some(dir) = flag_value(args, "--audio-dir") {
        transcriber = transcriber.with_base_dir(dir);
    }

    let builder = Orchestrator::builder(config.clone()).transcriber(transcriber);
    let orchestrator = if has_flag(args, "--offline") {
        tracing::info!("offline mode; report stages will use template fallback");
        builder.agent(OfflineAgent).build()?
    } else {
        let agent = HttpReportAgentBuilder::from_env()
            .agents(config.agents.clone())
            .build()?;
        builder.agent(agent).build()?
    };

    let result = orchestrator.run(request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
