mod commands;
mod logging;
mod progress;

use std::io::{self, Write};
use std::path::Path;
use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{BinaryFallback, Cli, Commands};
use dotenv::dotenv;
use kindred_core::hasher::{AlwaysHashRaw, AlwaysSkip, BinaryFileDecision, DecideBinary};
use kindred_core::Pipeline;
use progress::CliReporter;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let mut config = match kindred_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };
    if let Some(working_dir) = args.working_dir {
        config.working_dir = working_dir;
    }

    let pipeline = Pipeline::new(config.clone());

    match args.command {
        Some(Commands::Stage { source }) => {
            if let Err(err) = run_stage(&pipeline, &source) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Convert) => {
            if let Err(err) = run_convert(&pipeline) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Hash { binary }) => {
            if let Err(err) = run_hash(&pipeline, binary) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Binary) => {
            if let Err(err) = run_binary(&pipeline) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Similarity) => {
            if let Err(err) = run_similarity(&pipeline) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::Process { binary }) => {
            let result = run_hash(&pipeline, binary)
                .and_then(|_| run_binary(&pipeline))
                .and_then(|_| run_similarity(&pipeline));
            if let Err(err) = result {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_stage(pipeline: &Pipeline, source: &Path) -> Result<(), kindred_core::Error> {
    let reporter = CliReporter::new();
    let stats = pipeline.stage_corpus(source, &reporter)?;
    println!();
    info!(
        "Staged {} files into {} ({} failed)",
        format!("{}", stats.copied).cyan(),
        pipeline.layout().corpus_dir().display(),
        format!("{}", stats.failed).red(),
    );
    Ok(())
}

fn run_convert(pipeline: &Pipeline) -> Result<(), kindred_core::Error> {
    let reporter = CliReporter::new();
    let stats = pipeline.convert_corpus(&reporter)?;
    println!();
    info!(
        "Converted {} files ({} already present, {} failed)",
        format!("{}", stats.converted).cyan(),
        format!("{}", stats.skipped).green(),
        format!("{}", stats.failed).red(),
    );
    Ok(())
}

fn run_hash(pipeline: &Pipeline, binary: BinaryFallback) -> Result<(), kindred_core::Error> {
    let reporter = CliReporter::new();
    let decider = decider_for(binary);
    let result = pipeline.extract_hashes(decider.as_ref(), &reporter)?;
    println!();
    info!(
        "Hashed {} collections into {} relation pairs in {}",
        format!("{}", result.collections).cyan(),
        format!("{}", result.pairs).cyan(),
        format!("{:.2}s", result.duration.as_secs_f64()).green(),
    );
    info!("Relation table: {}", result.table.display());
    Ok(())
}

fn run_binary(pipeline: &Pipeline) -> Result<(), kindred_core::Error> {
    let reporter = CliReporter::new();
    let result = pipeline.build_presence(&reporter)?;
    println!();
    info!(
        "Presence matrix: {} fingerprints x {} collections in {}",
        format!("{}", result.fingerprints).cyan(),
        format!("{}", result.collections).cyan(),
        format!("{:.2}s", result.duration.as_secs_f64()).green(),
    );
    info!("Presence table: {}", result.table.display());
    Ok(())
}

fn run_similarity(pipeline: &Pipeline) -> Result<(), kindred_core::Error> {
    let reporter = CliReporter::new();
    let result = pipeline.compute_similarity(&reporter)?;
    println!();
    info!(
        "Similarity matrix: {0}x{0} collections in {1}",
        format!("{}", result.collections).cyan(),
        format!("{:.2}s", result.duration.as_secs_f64()).green(),
    );
    info!("Similarity table: {}", result.table.display());
    Ok(())
}

fn decider_for(binary: BinaryFallback) -> Box<dyn DecideBinary> {
    match binary {
        BinaryFallback::Ask => Box::new(PromptDecider),
        BinaryFallback::Hash => Box::new(AlwaysHashRaw),
        BinaryFallback::Skip => Box::new(AlwaysSkip),
    }
}

/// Interactive decision strategy: one y/N prompt per undecodable file.
struct PromptDecider;

impl DecideBinary for PromptDecider {
    fn decide(&self, file: &Path) -> BinaryFileDecision {
        let question = format!(
            "Cannot read '{}' as text. Fingerprint raw bytes instead?",
            file.display()
        );
        match prompt_confirm(&question, Some(false)) {
            Ok(true) => BinaryFileDecision::HashRaw,
            Ok(false) => BinaryFileDecision::Skip,
            Err(e) => {
                error!("Prompt failed for '{}', skipping: {}", file.display(), e);
                BinaryFileDecision::Skip
            }
        }
    }
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
