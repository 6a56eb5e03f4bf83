use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use rand::Rng;
use scraper::{ElementRef, Html, Selector};

use crate::config::{PauseRange, SeasonRange};
use crate::fetch::{PageCache, fetch_page, http_client};
use crate::reconcile::{project, union_columns};
use crate::schema::raw_headers;
use crate::table::{Cell, Table};

const SITE_URL: &str = "https://www.pro-football-reference.com/teams";

pub fn gamelog_url(code: &str, season: i32) -> String {
    format!("{SITE_URL}/{code}/{season}/gamelog/")
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

pub struct HarvestProgress {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct HarvestSummary {
    pub pairs_total: usize,
    pub pairs_succeeded: usize,
    pub rows: usize,
    pub errors: Vec<String>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("bad selector `{css}`: {err}"))
}

fn cell_text(el: ElementRef<'_>) -> Cell {
    let text = el.text().collect::<String>();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Find `table#<id>` in a page, including tables the site ships inside HTML
/// comments. Header text comes from the last header row; repeated header rows
/// inside the body are skipped.
pub fn extract_table(html: &str, table_id: &str) -> Result<Option<HtmlTable>> {
    let uncommented = html.replace("<!--", "").replace("-->", "");
    let doc = Html::parse_document(&uncommented);

    let table_sel = selector(&format!("table#{table_id}"))?;
    let header_row_sel = selector("thead tr")?;
    let body_row_sel = selector("tbody tr")?;
    let cell_sel = selector("th, td")?;

    let Some(table) = doc.select(&table_sel).next() else {
        return Ok(None);
    };

    let headers = table
        .select(&header_row_sel)
        .last()
        .map(|tr| {
            tr.select(&cell_sel)
                .map(|c| cell_text(c).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let rows = table
        .select(&body_row_sel)
        .filter(|tr| !tr.value().classes().any(|c| c == "thead"))
        .map(|tr| tr.select(&cell_sel).map(cell_text).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(Option::is_some))
        .collect::<Vec<_>>();

    Ok(Some(HtmlTable { headers, rows }))
}

pub fn team_season_table(html: &str, code: &str, season: i32) -> Result<Table> {
    let own_id = format!("gamelog{season}");
    let opp_id = format!("gamelog_opp{season}");
    let own = extract_table(html, &own_id)?.ok_or_else(|| anyhow!("no table #{own_id}"))?;
    let opp = extract_table(html, &opp_id)?.ok_or_else(|| anyhow!("no table #{opp_id}"))?;

    let mut table = Table::new(raw_headers(&own.headers, &opp.headers));
    let games = own.rows.len().max(opp.rows.len());
    for idx in 0..games {
        let mut row: Vec<Cell> = vec![Some(season.to_string()), Some(code.to_ascii_uppercase())];
        row.extend(side_cells(&own, idx));
        row.extend(side_cells(&opp, idx));
        table.push_row(row);
    }
    Ok(table)
}

fn side_cells(table: &HtmlTable, idx: usize) -> Vec<Cell> {
    let mut cells = table.rows.get(idx).cloned().unwrap_or_default();
    cells.resize(table.headers.len(), None);
    cells
}

fn append_page(acc: &mut Table, page: Table) {
    if acc.headers.is_empty() {
        *acc = page;
    } else if acc.headers == page.headers {
        acc.extend_rows(page);
    } else {
        tracing::warn!(
            expected = acc.width(),
            found = page.width(),
            "page layout differs; aligning columns by name"
        );
        let columns = union_columns(&acc.headers, &page.headers);
        let mut merged = project(acc, &columns);
        merged.extend_rows(project(&page, &columns));
        *acc = merged;
    }
}

/// Walk every (season, team) pair. A pair whose page fails is recorded in the
/// summary and skipped. `pause` runs between consecutive fetches.
pub fn harvest_with(
    seasons: SeasonRange,
    teams: &[String],
    mut fetch: impl FnMut(&str) -> Result<String>,
    mut pause: impl FnMut(),
    mut on_progress: impl FnMut(HarvestProgress),
) -> (Table, HarvestSummary) {
    let total = seasons.seasons().count() * teams.len();
    let mut table = Table::default();
    let mut summary = HarvestSummary {
        pairs_total: total,
        ..HarvestSummary::default()
    };

    let mut current = 0usize;
    for season in seasons.seasons() {
        for code in teams {
            if current > 0 {
                pause();
            }
            current += 1;

            let url = gamelog_url(code, season);
            let page = fetch(&url)
                .with_context(|| format!("fetch {url}"))
                .and_then(|html| team_season_table(&html, code, season));
            let message = match page {
                Ok(page) => {
                    summary.pairs_succeeded += 1;
                    summary.rows += page.len();
                    let message = format!("{season} {code}: {} games", page.len());
                    append_page(&mut table, page);
                    message
                }
                Err(err) => {
                    tracing::warn!(season, team = %code, error = %format!("{err:#}"), "skipping team season");
                    let message = format!("{season} {code}: {err:#}");
                    summary.errors.push(message.clone());
                    message
                }
            };
            on_progress(HarvestProgress {
                current,
                total,
                message,
            });
        }
    }
    (table, summary)
}

pub fn harvest(
    seasons: SeasonRange,
    teams: &[String],
    pause: PauseRange,
    use_cache: bool,
    on_progress: impl FnMut(HarvestProgress),
) -> Result<(Table, HarvestSummary)> {
    let client = http_client()?;
    let mut cache = if use_cache {
        PageCache::default_dir().map(PageCache::open)
    } else {
        None
    };
    if let Some(cache) = cache.as_ref() {
        tracing::info!(pages = cache.len(), "page cache loaded");
    }

    let mut rng = rand::thread_rng();
    let fetch = |url: &str| match cache.as_mut() {
        Some(cache) => cache.fetch(client, url),
        None => fetch_page(client, url),
    };
    let sleep = || {
        let secs = rng.gen_range(pause.min_secs..=pause.max_secs);
        if secs > 0 {
            thread::sleep(Duration::from_secs(secs));
        }
    };

    Ok(harvest_with(seasons, teams, fetch, sleep, on_progress))
}
