use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::derive::derive_games;
use crate::game;
use crate::harvest::{HarvestProgress, HarvestSummary, harvest};
use crate::output::export_xlsx;
use crate::reconcile::{merge_with_baseline, reconcile};
use crate::schema::{self, clean};
use crate::table::{Table, read_csv, write_csv};

#[derive(Debug, Clone)]
pub struct Normalized {
    pub cleaned: Table,
    pub games: Table,
    pub team_rows: usize,
}

pub fn normalize(raw: &Table, baseline: Option<&Table>) -> Result<Normalized> {
    let rows = clean(raw).context("schema cleanup failed")?;
    let team_rows = rows.len();
    let cleaned = schema::to_table(&rows);

    let games = derive_games(rows).context("feature derivation failed")?;
    let batch = game::to_table(&games);
    let games = match baseline {
        Some(baseline) => reconcile(&batch, &baseline.headers),
        None => batch,
    };

    Ok(Normalized {
        cleaned,
        games,
        team_rows,
    })
}

#[derive(Debug, Clone)]
pub struct NormalizeSummary {
    pub raw_path: PathBuf,
    pub out_path: PathBuf,
    pub team_rows: usize,
    pub games: usize,
    pub baseline_rows: Option<usize>,
    pub rows_written: usize,
    pub columns_written: usize,
    pub xlsx_path: Option<PathBuf>,
}

pub fn run_normalize(cfg: &PipelineConfig) -> Result<NormalizeSummary> {
    let raw = read_csv(&cfg.raw_path)?;
    tracing::info!(path = %cfg.raw_path.display(), rows = raw.len(), "raw table loaded");

    let baseline = cfg
        .baseline_path
        .as_deref()
        .map(read_csv)
        .transpose()
        .context("failed loading baseline")?;

    let normalized = normalize(&raw, baseline.as_ref())?;
    let games = normalized.games.len();

    let output = match (&baseline, cfg.merge) {
        (Some(baseline), true) => merge_with_baseline(baseline, &normalized.games),
        (None, true) => {
            tracing::warn!("--merge without a baseline; writing the batch only");
            normalized.games
        }
        (_, false) => normalized.games,
    };

    if let Some(path) = cfg.cleaned_path.as_deref() {
        write_csv(path, &normalized.cleaned)?;
        tracing::info!(path = %path.display(), rows = normalized.cleaned.len(), "cleaned table written");
    }

    write_csv(&cfg.out_path, &output)?;
    tracing::info!(path = %cfg.out_path.display(), rows = output.len(), "game table written");

    if let Some(path) = cfg.xlsx_path.as_deref() {
        let report = export_xlsx(path, &output)?;
        tracing::info!(path = %path.display(), rows = report.rows, "workbook written");
    }

    Ok(NormalizeSummary {
        raw_path: cfg.raw_path.clone(),
        out_path: cfg.out_path.clone(),
        team_rows: normalized.team_rows,
        games,
        baseline_rows: baseline.as_ref().map(Table::len),
        rows_written: output.len(),
        columns_written: output.width(),
        xlsx_path: cfg.xlsx_path.clone(),
    })
}

pub fn run_harvest(cfg: &PipelineConfig) -> Result<HarvestSummary> {
    let seasons = cfg.require_seasons()?;
    tracing::info!(
        begin = seasons.begin,
        end = seasons.end,
        teams = cfg.teams.len(),
        "harvest starting"
    );

    let (raw, summary) = harvest(
        seasons,
        &cfg.teams,
        cfg.pause,
        cfg.use_cache,
        |progress: HarvestProgress| {
            tracing::info!(
                current = progress.current,
                total = progress.total,
                "{}",
                progress.message
            );
        },
    )?;

    if raw.headers.is_empty() {
        anyhow::bail!(
            "harvest produced no pages ({} of {} failed)",
            summary.errors.len(),
            summary.pairs_total
        );
    }
    write_csv(&cfg.raw_path, &raw)?;
    tracing::info!(path = %cfg.raw_path.display(), rows = raw.len(), "raw table written");
    Ok(summary)
}

pub fn print_harvest_summary(cfg: &PipelineConfig, summary: &HarvestSummary) {
    println!("Harvest complete");
    println!("Raw: {}", cfg.raw_path.display());
    println!(
        "Team seasons: {}/{}",
        summary.pairs_succeeded, summary.pairs_total
    );
    println!("Rows: {}", summary.rows);
    if !summary.errors.is_empty() {
        println!("  errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(6) {
            println!("   - {err}");
        }
    }
}

pub fn print_normalize_summary(summary: &NormalizeSummary) {
    println!("Normalize complete");
    println!("Raw: {}", summary.raw_path.display());
    println!("Team rows: {}", summary.team_rows);
    println!("Games: {}", summary.games);
    if let Some(rows) = summary.baseline_rows {
        println!("Baseline rows: {rows}");
    }
    println!(
        "Out: {} ({} rows x {} columns)",
        summary.out_path.display(),
        summary.rows_written,
        summary.columns_written
    );
    if let Some(path) = summary.xlsx_path.as_ref() {
        println!("Workbook: {}", path.display());
    }
}
