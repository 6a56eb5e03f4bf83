use std::ops::Range;

use crate::error::SchemaError;
use crate::table::{Cell, Table, dedup_headers, unnamed};

pub const GAMELOG_TABLE_HEADERS: [&str; 36] = [
    "Week", "Day", "Date", "", "", "OT", "", "Opp", "Tm", "Opp", "Cmp", "Att", "Yds", "TD", "Int",
    "Sk", "Yds", "Y/A", "NY/A", "Cmp%", "Rate", "Att", "Yds", "Y/A", "TD", "FGM", "FGA", "XPM",
    "XPA", "Pnt", "Yds", "3DConv", "3DAtt", "4DConv", "4DAtt", "ToP",
];

pub const RAW_COLUMN_COUNT: usize = 2 + 2 * GAMELOG_TABLE_HEADERS.len();

pub fn raw_headers(own: &[String], opponent: &[String]) -> Vec<String> {
    let per_table = |headers: &[String]| {
        headers
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                if h.trim().is_empty() {
                    unnamed(idx)
                } else {
                    h.trim().to_string()
                }
            })
            .collect::<Vec<_>>()
    };
    let combined = ["season".to_string(), "team".to_string()]
        .into_iter()
        .chain(per_table(own))
        .chain(per_table(opponent));
    dedup_headers(combined)
}

pub fn expected_raw_headers() -> Vec<String> {
    let site = GAMELOG_TABLE_HEADERS
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    raw_headers(&site, &site)
}

/// The opponent table's week/day/date/boxscore/result/OT/@/opp/score columns
/// repeat what the team's own table already holds.
const REDUNDANT_BLOCK: Range<usize> = 38..48;

const BOXSCORE_COLUMN: &str = "Unnamed: 3";

const RENAMES: &[(&str, &str)] = &[
    ("unnamed: 4", "result"),
    ("unnamed: 6", "host"),
    ("tm", "pts"),
    ("opp.1", "opp_pts"),
    ("cmp", "pass_cmp"),
    ("att", "pass_att"),
    ("yds", "pass_yds"),
    ("td", "pass_td"),
    ("yds.1", "yds_lost_sks"),
    ("y/a", "yds_pass_att"),
    ("ny/a", "net_yds_pass_att"),
    ("rate", "pass_rating"),
    ("att.1", "rush_att"),
    ("yds.2", "rush_yds"),
    ("y/a.1", "rush_yds_att"),
    ("td.1", "rush_td"),
    ("yds.3", "punt_yds"),
];

pub const SIDE_STATS: [&str; 26] = [
    "pass_cmp",
    "pass_att",
    "pass_yds",
    "pass_td",
    "int",
    "sk",
    "yds_lost_sks",
    "yds_pass_att",
    "net_yds_pass_att",
    "cmp%",
    "pass_rating",
    "rush_att",
    "rush_yds",
    "rush_yds_att",
    "rush_td",
    "fgm",
    "fga",
    "xpm",
    "xpa",
    "pnt",
    "punt_yds",
    "3dconv",
    "3datt",
    "4dconv",
    "4datt",
    "top",
];

pub const NUMERIC_STATS: usize = SIDE_STATS.len() - 1;

const GAME_COLUMNS: [&str; 11] = [
    "season", "team", "week", "day", "date", "result", "ot", "host", "opp", "pts", "opp_pts",
];

const OWN_COLUMN_COUNT: usize = GAME_COLUMNS.len() + SIDE_STATS.len();

pub fn stat_index(name: &str) -> Option<usize> {
    SIDE_STATS[..NUMERIC_STATS].iter().position(|s| *s == name)
}

pub fn cleaned_columns() -> Vec<String> {
    GAME_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(SIDE_STATS.iter().map(|s| s.to_string()))
        .chain(SIDE_STATS.iter().map(|s| format!("{s}_opp")))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Home,
    Away,
}

impl Host {
    /// `@` marks a road game; blank (or anything else) is a home game.
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker.map(str::trim) {
            Some("@") => Host::Away,
            _ => Host::Home,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Host::Home => "home",
            Host::Away => "away",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideStats {
    pub pts: Option<f64>,
    pub numeric: [Option<f64>; NUMERIC_STATS],
    pub top: Option<String>,
}

impl SideStats {
    pub fn stat(&self, name: &str) -> Option<f64> {
        stat_index(name).and_then(|idx| self.numeric[idx])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedGameRow {
    pub season: i32,
    pub team: String,
    pub week: Option<String>,
    pub day: Option<String>,
    pub date: Option<String>,
    pub result: Option<String>,
    pub overtime: bool,
    pub host: Host,
    pub opp: Option<String>,
    pub own: SideStats,
    pub opponent: SideStats,
}

impl CleanedGameRow {
    pub fn overtime_label(&self) -> &'static str {
        if self.overtime { "yes" } else { "no" }
    }
}

fn cleaned_layout(raw_headers: &[String]) -> Result<Vec<(usize, String)>, SchemaError> {
    if raw_headers.len() != RAW_COLUMN_COUNT {
        return Err(SchemaError::ColumnCount {
            expected: RAW_COLUMN_COUNT,
            found: raw_headers.len(),
        });
    }

    let mut layout = raw_headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !REDUNDANT_BLOCK.contains(idx))
        .map(|(idx, name)| (idx, name.clone()))
        .collect::<Vec<_>>();

    let boxscore = layout
        .iter()
        .position(|(_, name)| name == BOXSCORE_COLUMN)
        .ok_or_else(|| SchemaError::MissingColumn(BOXSCORE_COLUMN.to_string()))?;
    layout.remove(boxscore);

    for (_, name) in layout.iter_mut() {
        *name = name.to_lowercase();
        if let Some((_, to)) = RENAMES.iter().find(|(from, _)| *from == name.as_str()) {
            *name = to.to_string();
        }
    }

    for ((_, name), stat) in layout[OWN_COLUMN_COUNT..].iter_mut().zip(SIDE_STATS) {
        *name = format!("{stat}_opp");
    }

    for (position, ((_, found), expected)) in layout.iter().zip(cleaned_columns()).enumerate() {
        if *found != expected {
            return Err(SchemaError::UnexpectedColumn {
                position,
                expected,
                found: found.clone(),
            });
        }
    }
    Ok(layout)
}

pub fn clean(raw: &Table) -> Result<Vec<CleanedGameRow>, SchemaError> {
    let layout = cleaned_layout(&raw.headers)?;
    let sources = layout.iter().map(|(idx, _)| *idx).collect::<Vec<_>>();

    raw.rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let cells = sources
                .iter()
                .map(|src| row.get(*src).cloned().flatten())
                .collect::<Vec<_>>();
            clean_row(idx + 1, &cells)
        })
        .collect()
}

fn clean_row(row: usize, cells: &[Cell]) -> Result<CleanedGameRow, SchemaError> {
    let text = |idx: usize| cells[idx].clone();

    let season_raw = text(0).unwrap_or_default();
    let season = season_raw
        .trim()
        .parse::<i32>()
        .map_err(|_| SchemaError::InvalidSeason {
            row,
            value: season_raw.clone(),
        })?;

    let number = |idx: usize, column: String| -> Result<Option<f64>, SchemaError> {
        parse_number(cells[idx].as_deref()).map_err(|value| SchemaError::InvalidNumber {
            row,
            column,
            value,
        })
    };

    let side = |first: usize, pts_idx: usize, suffix: &str| -> Result<SideStats, SchemaError> {
        let mut stats = SideStats {
            pts: number(pts_idx, GAME_COLUMNS[pts_idx].to_string())?,
            ..SideStats::default()
        };
        for (offset, slot) in stats.numeric.iter_mut().enumerate() {
            *slot = number(first + offset, format!("{}{suffix}", SIDE_STATS[offset]))?;
        }
        stats.top = text(first + NUMERIC_STATS);
        Ok(stats)
    };

    Ok(CleanedGameRow {
        season,
        team: text(1).unwrap_or_default().to_ascii_uppercase(),
        week: text(2),
        day: text(3),
        date: text(4),
        result: text(5),
        overtime: text(6).is_some_and(|v| v.trim() == "OT"),
        host: Host::from_marker(cells[7].as_deref()),
        opp: text(8),
        own: side(GAME_COLUMNS.len(), 9, "")?,
        opponent: side(OWN_COLUMN_COUNT, 10, "_opp")?,
    })
}

fn parse_number(cell: Option<&str>) -> Result<Option<f64>, String> {
    let Some(raw) = cell else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| trimmed.to_string())
}

pub fn to_table(rows: &[CleanedGameRow]) -> Table {
    let mut table = Table::new(cleaned_columns());
    for row in rows {
        let mut cells: Vec<Cell> = vec![
            Some(row.season.to_string()),
            Some(row.team.clone()),
            row.week.clone(),
            row.day.clone(),
            row.date.clone(),
            row.result.clone(),
            Some(row.overtime_label().to_string()),
            Some(row.host.as_str().to_string()),
            row.opp.clone(),
            row.own.pts.map(format_number),
            row.opponent.pts.map(format_number),
        ];
        for side in [&row.own, &row.opponent] {
            cells.extend(side.numeric.iter().map(|v| v.map(format_number)));
            cells.push(side.top.clone());
        }
        table.push_row(cells);
    }
    table
}

pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn contract_has_own_and_opponent_halves() {
        let cols = cleaned_columns();
        assert_eq!(cols.len(), RAW_COLUMN_COUNT - REDUNDANT_BLOCK.len() - 1);
        assert_eq!(cols[36], "top");
        assert_eq!(cols[37], "pass_cmp_opp");
        assert_eq!(cols.last().map(String::as_str), Some("top_opp"));
    }

    #[test]
    fn raw_headers_disambiguate_like_the_harvest_file() {
        let headers = expected_raw_headers();
        assert_eq!(headers.len(), RAW_COLUMN_COUNT);
        assert_eq!(headers[5], "Unnamed: 3");
        assert_eq!(headers[11], "Opp.1");
        assert_eq!(headers[18], "Yds.1");
        assert_eq!(headers[32], "Yds.3");
        assert_eq!(headers[37], "ToP");
        assert_eq!(headers[38], "Week.1");
        assert_eq!(headers[41], "Unnamed: 3.1");
    }

    #[test]
    fn cleans_a_harvested_row() {
        let raw = fixtures::raw_table(&[fixtures::nyg_vs_dal_2023()]);
        let rows = clean(&raw).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.season, 2023);
        assert_eq!(row.team, "NYG");
        assert_eq!(row.host, Host::Home);
        assert_eq!(row.opp.as_deref(), Some("Dallas Cowboys"));
        assert_eq!(row.own.pts, Some(0.0));
        assert_eq!(row.opponent.pts, Some(40.0));
        assert_eq!(row.own.stat("pass_yds"), Some(171.0));
        assert_eq!(row.opponent.stat("rush_yds"), Some(134.0));
        assert_eq!(row.own.top.as_deref(), Some("26:14"));
        assert_eq!(row.opponent.top.as_deref(), Some("33:46"));
        assert_eq!(row.overtime_label(), "no");
    }

    #[test]
    fn host_and_overtime_markers() {
        assert_eq!(Host::from_marker(Some("@")), Host::Away);
        assert_eq!(Host::from_marker(None), Host::Home);
        assert_eq!(Host::from_marker(Some("N")), Host::Home);

        let mut game = fixtures::nyg_vs_dal_2023();
        game.overtime = true;
        game.away = true;
        let rows = clean(&fixtures::raw_table(&[game])).unwrap();
        assert_eq!(rows[0].overtime_label(), "yes");
        assert_eq!(rows[0].host.as_str(), "away");
    }

    #[test]
    fn wrong_width_fails_loudly() {
        let mut raw = fixtures::raw_table(&[fixtures::nyg_vs_dal_2023()]);
        raw.headers.pop();
        assert_eq!(
            clean(&raw).unwrap_err(),
            SchemaError::ColumnCount {
                expected: 74,
                found: 73
            }
        );
    }

    #[test]
    fn missing_boxscore_column_fails() {
        let mut raw = fixtures::raw_table(&[fixtures::nyg_vs_dal_2023()]);
        raw.headers[5] = "Boxscore".to_string();
        assert_eq!(
            clean(&raw).unwrap_err(),
            SchemaError::MissingColumn("Unnamed: 3".to_string())
        );
    }

    #[test]
    fn drifted_header_names_its_position() {
        let mut raw = fixtures::raw_table(&[fixtures::nyg_vs_dal_2023()]);
        raw.headers[14] = "Yards".to_string();
        let err = clean(&raw).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnexpectedColumn {
                position: 13,
                expected: "pass_yds".to_string(),
                found: "yards".to_string(),
            }
        );
    }

    #[test]
    fn non_numeric_stat_names_row_and_column() {
        let mut raw = fixtures::raw_table(&[fixtures::nyg_vs_dal_2023()]);
        raw.rows[0][14] = Some("n/a".to_string());
        let err = clean(&raw).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidNumber {
                row: 1,
                column: "pass_yds".to_string(),
                value: "n/a".to_string(),
            }
        );
    }

    #[test]
    fn formats_integral_numbers_plainly() {
        assert_eq!(format_number(171.0), "171");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(65.5), "65.5");
    }
}
