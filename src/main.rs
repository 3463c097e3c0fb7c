mod batch;
mod models;
mod parser;
mod render;
mod report;

use anyhow::{bail, Context, Result};
use batch::MeetOutcome;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{info, LevelFilter};
use models::{Config, MeetEntry, ReportOptions};
use std::path::Path;

const DEFAULT_CONFIG: &str = "meets.toml";

fn cli() -> Command {
    Command::new("meet-reports")
        .version(clap::crate_version!())
        .about("Builds HTML report pages from cross-country meet result CSV files")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG),
        )
        .arg(
            Arg::new("inputs")
                .value_name("INPUT")
                .help("Meet CSV files to render instead of the configured list")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Directory the pages are written to"),
        )
        .arg(
            Arg::new("top")
                .short('n')
                .long("top")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Only keep the first N finishers (0 keeps everyone)"),
        )
        .arg(
            Arg::new("team")
                .short('t')
                .long("team")
                .value_name("NAME")
                .help("Only list runners whose row mentions this team"),
        )
        .arg(
            Arg::new("plain")
                .long("plain")
                .action(ArgAction::SetTrue)
                .help("Plain pages: every row, no summary, highlights or scripts"),
        )
        .arg(
            Arg::new("no_index")
                .long("no-index")
                .action(ArgAction::SetTrue)
                .help("Do not write index.html and summary.csv"),
        )
}

fn apply_overrides(config: &mut Config, matches: &ArgMatches) {
    if matches.get_flag("plain") {
        config.report = match matches.get_one::<String>("team") {
            Some(team) => ReportOptions::team_subset(team),
            None => ReportOptions::raw_list(),
        };
    }
    if let Some(inputs) = matches.get_many::<String>("inputs") {
        config.meets = inputs
            .map(|input| MeetEntry {
                input: input.clone(),
                output: None,
            })
            .collect();
    }
    if let Some(dir) = matches.get_one::<String>("output_dir") {
        config.output_directory = dir.clone();
    }
    if let Some(&top) = matches.get_one::<usize>("top") {
        config.report.max_results = Some(top);
    }
    if let Some(team) = matches.get_one::<String>("team") {
        config.report.team_filter = Some(team.clone());
    }
    if matches.get_flag("no_index") {
        config.write_index = false;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("MEET_REPORTS_LOG", "warn,meet_reports=info"))
        .init();

    let matches = cli().get_matches();
    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG);
    let has_inputs = matches.contains_id("inputs");

    // Load or create configuration
    let mut config = if Path::new(config_file).exists() {
        info!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)
            .with_context(|| format!("Invalid configuration file: {}", config_file))?
    } else if has_inputs {
        Config::default()
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        Config::default().save_to_file(config_file)?;
        println!(
            "⚠️  Please edit {} and list your meet files, then run the program again.",
            config_file
        );
        return Ok(());
    };
    apply_overrides(&mut config, &matches);

    if config.meets.is_empty() {
        println!("❌ No meets configured in {}", config_file);
        return Ok(());
    }

    info!("📂 Writing pages to: {}", config.output_directory);
    if let Some(team) = &config.report.team_filter {
        info!("🎯 Team filter: {}", team);
    }

    let summary = batch::run_batch(&config).await?;

    for outcome in &summary.outcomes {
        match outcome {
            MeetOutcome::Written { output, .. } => println!("✅ {}", output.display()),
            MeetOutcome::Skipped { .. } => println!("⚠️  Skipped {} (not found)", outcome.input()),
            MeetOutcome::Failed { error, .. } => println!("❌ {}: {:#}", outcome.input(), error),
        }
    }
    if let Some(index) = &summary.index {
        println!("🗂️  {}", index.display());
    }
    println!(
        "📊 {} written, {} skipped, {} failed",
        summary.written(),
        summary.skipped(),
        summary.failed()
    );

    if summary.all_failed() {
        bail!("no meet page could be generated");
    }
    Ok(())
}
