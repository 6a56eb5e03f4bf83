use chrono::{Datelike, NaiveDate};

use crate::schema::{NUMERIC_STATS, SIDE_STATS, format_number, stat_index};
use crate::table::{Cell, Table};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamLine {
    pub pts: f64,
    pub numeric: [f64; NUMERIC_STATS],
    pub top: i64,
}

impl TeamLine {
    pub fn stat(&self, name: &str) -> f64 {
        stat_index(name).map(|idx| self.numeric[idx]).unwrap_or(0.0)
    }

    pub fn pass_yds(&self) -> f64 {
        self.stat("pass_yds")
    }

    pub fn rush_yds(&self) -> f64 {
        self.stat("rush_yds")
    }

    pub fn total_yds(&self) -> f64 {
        self.pass_yds() + self.rush_yds()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalGameRow {
    pub season: i32,
    pub week: String,
    pub overtime: u8,
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_results: u8,
    pub date: Option<NaiveDate>,
    pub home: TeamLine,
    pub away: TeamLine,
}

impl FinalGameRow {
    pub fn day_of_week(&self) -> Option<u32> {
        self.date.map(|d| d.weekday().num_days_from_monday())
    }

    pub fn month(&self) -> Option<u32> {
        self.date.map(|d| d.month())
    }

    pub fn pts_diff_home(&self) -> f64 {
        self.home.pts - self.away.pts
    }

    pub fn pass_yds_diff_home(&self) -> f64 {
        self.home.pass_yds() - self.away.pass_yds()
    }

    pub fn rush_yds_diff_home(&self) -> f64 {
        self.home.rush_yds() - self.away.rush_yds()
    }

    pub fn top_diff_home(&self) -> i64 {
        self.home.top - self.away.top
    }

    pub fn home_total_yds(&self) -> f64 {
        self.home.total_yds()
    }

    pub fn away_total_yds(&self) -> f64 {
        self.away.total_yds()
    }

    fn cells(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = vec![
            Some(self.season.to_string()),
            Some(self.week.clone()),
            Some(self.overtime.to_string()),
            Some(self.game_id.clone()),
            Some(self.home_team.clone()),
            Some(self.away_team.clone()),
            Some(self.home_results.to_string()),
            self.date.map(|d| d.format("%Y-%m-%d").to_string()),
            self.day_of_week().map(|d| d.to_string()),
            self.month().map(|m| m.to_string()),
            Some(format_number(self.home.pts)),
            Some(format_number(self.away.pts)),
        ];
        for idx in 0..NUMERIC_STATS {
            cells.push(Some(format_number(self.home.numeric[idx])));
            cells.push(Some(format_number(self.away.numeric[idx])));
        }
        cells.push(Some(self.home.top.to_string()));
        cells.push(Some(self.away.top.to_string()));
        cells.extend([
            Some(format_number(self.pts_diff_home())),
            Some(format_number(self.pass_yds_diff_home())),
            Some(format_number(self.rush_yds_diff_home())),
            Some(self.top_diff_home().to_string()),
            Some(format_number(self.home_total_yds())),
            Some(format_number(self.away_total_yds())),
        ]);
        cells
    }
}

pub fn final_columns() -> Vec<String> {
    let mut cols = [
        "season",
        "week",
        "overtime",
        "game_id",
        "home_team",
        "away_team",
        "home_results",
        "date",
        "day_of_week",
        "month",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect::<Vec<_>>();

    let stats = std::iter::once("pts").chain(SIDE_STATS.iter().copied());
    for stat in stats {
        cols.push(format!("home_{stat}"));
        cols.push(format!("away_{stat}"));
    }

    cols.extend(
        [
            "pts_diff_home",
            "pass_yds_diff_home",
            "rush_yds_diff_home",
            "top_diff_home",
            "home_total_yds",
            "away_total_yds",
        ]
        .iter()
        .map(|c| c.to_string()),
    );
    cols
}

pub fn to_table(games: &[FinalGameRow]) -> Table {
    let mut table = Table::new(final_columns());
    for game in games {
        table.push_row(game.cells());
    }
    table
}
