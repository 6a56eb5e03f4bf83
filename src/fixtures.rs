use chrono::{Duration, NaiveDate};

use crate::schema::{SIDE_STATS, expected_raw_headers};
use crate::table::{Cell, Table};
use crate::teams::{TEAM_CODES, full_name};

#[derive(Debug, Clone, PartialEq)]
pub struct SideLine {
    pub pts: Option<f64>,
    pub pass_yds: Option<f64>,
    pub rush_yds: Option<f64>,
    pub top: Option<String>,
}

impl SideLine {
    pub fn played(pts: f64, pass_yds: f64, rush_yds: f64, top: &str) -> Self {
        Self {
            pts: Some(pts),
            pass_yds: Some(pass_yds),
            rush_yds: Some(rush_yds),
            top: Some(top.to_string()),
        }
    }

    pub fn unplayed() -> Self {
        Self {
            pts: None,
            pass_yds: None,
            rush_yds: None,
            top: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameLog {
    pub season: i32,
    pub team: String,
    pub week: u32,
    pub date: String,
    pub opponent: String,
    pub away: bool,
    pub overtime: bool,
    pub result: Option<String>,
    pub own: SideLine,
    pub opp: SideLine,
}

impl GameLog {
    pub fn mirrored(&self, team_code: &str, opponent_name: &str) -> GameLog {
        let result = self.result.as_deref().map(|r| match r {
            "W" => "L".to_string(),
            "L" => "W".to_string(),
            other => other.to_string(),
        });
        GameLog {
            season: self.season,
            team: team_code.to_ascii_uppercase(),
            week: self.week,
            date: self.date.clone(),
            opponent: opponent_name.to_string(),
            away: !self.away,
            overtime: self.overtime,
            result,
            own: self.opp.clone(),
            opp: self.own.clone(),
        }
    }

    pub fn to_row(&self) -> Vec<Cell> {
        let mut cells: Vec<Cell> = vec![
            Some(self.season.to_string()),
            Some(self.team.to_ascii_uppercase()),
        ];
        cells.extend(self.game_cells());
        cells.extend(stat_cells(&self.own));
        cells.extend(self.game_cells());
        cells.extend(stat_cells(&self.opp));
        cells
    }

    fn game_cells(&self) -> Vec<Cell> {
        vec![
            Some(self.week.to_string()),
            Some("Sun".to_string()),
            Some(self.date.clone()),
            Some("boxscore".to_string()),
            self.result.clone(),
            self.overtime.then(|| "OT".to_string()),
            self.away.then(|| "@".to_string()),
            Some(self.opponent.clone()),
            self.own.pts.map(|v| v.to_string()),
            self.opp.pts.map(|v| v.to_string()),
        ]
    }
}

fn stat_cells(side: &SideLine) -> Vec<Cell> {
    SIDE_STATS
        .iter()
        .enumerate()
        .map(|(idx, name)| match *name {
            "pass_yds" => side.pass_yds.map(|v| v.to_string()),
            "rush_yds" => side.rush_yds.map(|v| v.to_string()),
            "top" => side.top.clone(),
            "cmp%" => side.pts.map(|_| "62.5".to_string()),
            _ => side.pts.map(|_| (idx + 1).to_string()),
        })
        .collect()
}

pub fn raw_table(games: &[GameLog]) -> Table {
    let mut table = Table::new(expected_raw_headers());
    for game in games {
        table.push_row(game.to_row());
    }
    table
}

pub fn nyg_vs_dal_2023() -> GameLog {
    GameLog {
        season: 2023,
        team: "NYG".to_string(),
        week: 1,
        date: "September 10".to_string(),
        opponent: "Dallas Cowboys".to_string(),
        away: false,
        overtime: false,
        result: Some("L".to_string()),
        own: SideLine::played(0.0, 171.0, 70.0, "26:14"),
        opp: SideLine::played(40.0, 111.0, 134.0, "33:46"),
    }
}

pub fn dal_at_nyg_2023() -> GameLog {
    nyg_vs_dal_2023().mirrored("DAL", "New York Giants")
}

pub fn synthetic_season(season: i32, weeks: u32) -> Vec<GameLog> {
    let n = TEAM_CODES.len();
    let mut order = (0..n).collect::<Vec<_>>();
    let kickoff = NaiveDate::from_ymd_opt(season, 9, 7).unwrap_or_default();
    let mut out = Vec::with_capacity(n * weeks as usize);

    for week in 1..=weeks {
        let date = kickoff + Duration::days(7 * i64::from(week - 1));
        let date_text = date.format("%B %-d").to_string();
        for k in 0..n / 2 {
            let home = TEAM_CODES[order[k]];
            let away = TEAM_CODES[order[n - 1 - k]];
            let (Ok(home_name), Ok(away_name)) = (full_name(home, season), full_name(away, season))
            else {
                continue;
            };
            let seed = (week as usize * 7 + k * 3) % 17;
            let home_pts = (10 + seed * 2) as f64;
            let away_pts = (7 + (seed * 5) % 31) as f64;
            let home_top = 30 * 60 + (seed as i64 * 37) % 600 - 300;
            let away_top = 60 * 60 - home_top;
            let log = GameLog {
                season,
                team: home.to_ascii_uppercase(),
                week,
                date: date_text.clone(),
                opponent: away_name.to_string(),
                away: false,
                overtime: seed == 3,
                result: Some(
                    if home_pts > away_pts {
                        "W"
                    } else if home_pts < away_pts {
                        "L"
                    } else {
                        "T"
                    }
                    .to_string(),
                ),
                own: SideLine::played(
                    home_pts,
                    (180 + seed * 9) as f64,
                    (60 + seed * 4) as f64,
                    &clock(home_top),
                ),
                opp: SideLine::played(
                    away_pts,
                    (150 + seed * 11) as f64,
                    (80 + seed * 3) as f64,
                    &clock(away_top),
                ),
            };
            out.push(log.mirrored(away, home_name));
            out.push(log);
        }
        order[1..].rotate_right(1);
    }
    out
}

fn clock(seconds: i64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
