use crate::models::{Config, MeetEntry, MeetReport};
use crate::render::{render_index, render_meet_page, IndexEntry, RenderOptions};
use crate::report::MeetReportBuilder;
use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio::task::JoinHandle;

pub const INDEX_FILE: &str = "index.html";
pub const SUMMARY_FILE: &str = "summary.csv";

static SLUG_SEPARATORS: OnceLock<Regex> = OnceLock::new();

#[derive(Debug)]
pub enum MeetOutcome {
    Written {
        input: String,
        output: PathBuf,
        report: MeetReport,
    },
    /// Input file does not exist.
    Skipped { input: String },
    Failed { input: String, error: anyhow::Error },
}

impl MeetOutcome {
    pub fn input(&self) -> &str {
        match self {
            MeetOutcome::Written { input, .. }
            | MeetOutcome::Skipped { input }
            | MeetOutcome::Failed { input, .. } => input,
        }
    }
}

#[derive(Debug)]
pub struct BatchSummary {
    pub outcomes: Vec<MeetOutcome>,
    pub index: Option<PathBuf>,
}

impl BatchSummary {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, MeetOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, MeetOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, MeetOutcome::Failed { .. }))
    }

    /// True when there was work to do and none of it succeeded.
    pub fn all_failed(&self) -> bool {
        self.failed() > 0 && self.written() == 0
    }

    fn count(&self, pred: impl Fn(&MeetOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Page file name for a meet: the configured one, or a slug of the input
/// file stem (`37th_Early_Bird.csv` -> `37th-early-bird.html`).
pub fn output_name(entry: &MeetEntry) -> String {
    if let Some(output) = &entry.output {
        return output.clone();
    }

    let stem = Path::new(&entry.input)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let separators = SLUG_SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap());
    let slug = separators.replace_all(&stem, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        "meet.html".to_string()
    } else {
        format!("{}.html", slug)
    }
}

enum Pending {
    Rejected(anyhow::Error),
    Running(PathBuf, JoinHandle<Result<Option<MeetReport>>>),
}

async fn process_meet(
    input: String,
    output: PathBuf,
    builder: Arc<MeetReportBuilder>,
    render: Arc<RenderOptions>,
) -> Result<Option<MeetReport>> {
    let exists = tokio::fs::try_exists(&input)
        .await
        .with_context(|| format!("Failed to check meet file: {}", input))?;
    if !exists {
        return Ok(None);
    }

    let content = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("Failed to read meet file: {}", input))?;
    let report = builder.build(&content);
    let page = render_meet_page(&report, &render);

    tokio::fs::write(&output, page)
        .await
        .with_context(|| format!("Failed to write page: {}", output.display()))?;

    Ok(Some(report))
}

/// Renders every configured meet. Meets are processed concurrently; a
/// missing or broken file never stops the others. Only failing to create
/// the output directory or the index aborts the batch.
pub async fn run_batch(config: &Config) -> Result<BatchSummary> {
    let output_dir = PathBuf::from(&config.output_directory);
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let builder = Arc::new(MeetReportBuilder::new(config.report.clone()));
    let render = Arc::new(RenderOptions::from_config(config));

    let mut claimed: HashMap<String, String> = HashMap::new();
    let mut pending = Vec::with_capacity(config.meets.len());

    for entry in &config.meets {
        let name = output_name(entry);
        if let Some(first) = claimed.get(&name) {
            let e = anyhow!("output {} is already used by {}", name, first);
            pending.push((entry.input.clone(), Pending::Rejected(e)));
            continue;
        }
        claimed.insert(name.clone(), entry.input.clone());

        info!("📄 Processing: {} -> {}", entry.input, name);
        let output = output_dir.join(&name);
        let handle = tokio::spawn(process_meet(
            entry.input.clone(),
            output.clone(),
            Arc::clone(&builder),
            Arc::clone(&render),
        ));
        pending.push((entry.input.clone(), Pending::Running(output, handle)));
    }

    // Awaited in configuration order so outcomes line up with the input list.
    let mut outcomes = Vec::with_capacity(pending.len());
    for (input, task) in pending {
        let outcome = match task {
            Pending::Rejected(error) => MeetOutcome::Failed { input, error },
            Pending::Running(output, handle) => match handle.await {
                Ok(Ok(Some(report))) => MeetOutcome::Written {
                    input,
                    output,
                    report,
                },
                Ok(Ok(None)) => MeetOutcome::Skipped { input },
                Ok(Err(error)) => MeetOutcome::Failed { input, error },
                Err(join_error) => MeetOutcome::Failed {
                    input,
                    error: anyhow!("processing task aborted: {}", join_error),
                },
            },
        };
        log_outcome(&outcome);
        outcomes.push(outcome);
    }

    let index = if config.write_index {
        Some(write_index(&outcomes, &output_dir, &render).await?)
    } else {
        None
    };

    Ok(BatchSummary { outcomes, index })
}

fn log_outcome(outcome: &MeetOutcome) {
    match outcome {
        MeetOutcome::Written { output, report, .. } => info!(
            "   ✅ {}: {} teams, {} runners -> {}",
            report.info.name,
            report.team_scores.len(),
            report.runners.len(),
            output.display()
        ),
        MeetOutcome::Skipped { input } => warn!("   ⚠️  Skipping {}: file not found", input),
        MeetOutcome::Failed { input, error } => error!("   ❌ Error processing {}: {:#}", input, error),
    }
}

async fn write_index(outcomes: &[MeetOutcome], output_dir: &Path, render: &RenderOptions) -> Result<PathBuf> {
    use csv::Writer;

    let mut entries = Vec::new();
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(["Meet", "Date", "Winning_Team", "Top_Performer", "Page"])?;

    for outcome in outcomes {
        let MeetOutcome::Written { output, report, .. } = outcome else {
            continue;
        };
        let href = output
            .strip_prefix(output_dir)
            .unwrap_or(output)
            .to_string_lossy()
            .replace('\\', "/");
        let winner = report.winning_team.as_ref().map(|t| t.team.clone());

        writer.write_record([
            report.info.name.as_str(),
            report.info.date.as_str(),
            winner.as_deref().unwrap_or_default(),
            report.top_performer.name.as_str(),
            href.as_str(),
        ])?;

        entries.push(IndexEntry {
            name: report.info.name.clone(),
            date: report.info.date.clone(),
            winner,
            href,
        });
    }
    let summary = writer.into_inner().context("Failed to serialise the meet summary")?;

    let summary_path = output_dir.join(SUMMARY_FILE);
    tokio::fs::write(&summary_path, summary)
        .await
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    let index_path = output_dir.join(INDEX_FILE);
    tokio::fs::write(&index_path, render_index(&entries, render))
        .await
        .with_context(|| format!("Failed to write index: {}", index_path.display()))?;
    info!("🗂️  Index written to {}", index_path.display());

    Ok(index_path)
}
