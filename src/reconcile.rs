use std::cmp::Ordering;
use std::collections::HashSet;

use crate::table::{Cell, Table};

const GAME_ID: &str = "game_id";
const DATE: &str = "date";

/// Batch columns shared with the baseline, in baseline order, then batch
/// columns the baseline lacks, in batch order.
pub fn reconcile_columns(baseline: &[String], batch: &[String]) -> Vec<String> {
    let common = baseline.iter().filter(|c| batch.contains(c));
    let additional = batch.iter().filter(|c| !baseline.contains(c));
    common.chain(additional).cloned().collect()
}

pub fn union_columns(baseline: &[String], batch: &[String]) -> Vec<String> {
    baseline
        .iter()
        .chain(batch.iter().filter(|c| !baseline.contains(c)))
        .cloned()
        .collect()
}

pub fn project(table: &Table, columns: &[String]) -> Table {
    let sources = columns
        .iter()
        .map(|c| table.column_index(c))
        .collect::<Vec<_>>();
    let mut out = Table::new(columns.to_vec());
    for row in &table.rows {
        let cells = sources
            .iter()
            .map(|src| src.and_then(|idx| row.get(idx).cloned().flatten()))
            .collect::<Vec<Cell>>();
        out.push_row(cells);
    }
    out
}

pub fn reconcile(batch: &Table, baseline: &[String]) -> Table {
    project(batch, &reconcile_columns(baseline, &batch.headers))
}

/// Baseline plus batch under the union column order. A baseline game the batch
/// also carries is replaced by the batch row. Rows are ordered by ISO date,
/// undated rows last.
pub fn merge_with_baseline(baseline: &Table, batch: &Table) -> Table {
    let columns = union_columns(&baseline.headers, &batch.headers);

    let batch_ids = batch
        .column_index(GAME_ID)
        .map(|idx| {
            batch
                .rows
                .iter()
                .filter_map(|row| row.get(idx).cloned().flatten())
                .collect::<HashSet<_>>()
        })
        .unwrap_or_default();

    let mut kept = baseline.clone();
    if let Some(idx) = baseline.column_index(GAME_ID) {
        kept.rows.retain(|row| {
            row.get(idx)
                .and_then(|c| c.as_ref())
                .is_none_or(|id| !batch_ids.contains(id))
        });
    }
    let replaced = baseline.len() - kept.len();

    let mut merged = project(&kept, &columns);
    merged.extend_rows(project(batch, &columns));

    if let Some(idx) = merged.column_index(DATE) {
        merged
            .rows
            .sort_by(|a, b| cmp_dates(a[idx].as_deref(), b[idx].as_deref()));
    }

    tracing::info!(
        baseline_rows = baseline.len(),
        replaced,
        batch_rows = batch.len(),
        merged_rows = merged.len(),
        "merged batch into baseline"
    );
    merged
}

fn cmp_dates(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
