use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

use chrono::{Month, NaiveDate};

use crate::error::DeriveError;
use crate::game::{FinalGameRow, TeamLine};
use crate::schema::{CleanedGameRow, Host, SideStats};
use crate::teams;

const ROLLOVER_MONTH: u32 = 1;

pub fn provisional_game_id(season: i32, week: &str, team: &str, opponent: &str) -> String {
    let mut names = [team, opponent];
    names.sort_unstable();
    format!("{season}_{week}_{}_{}", names[0], names[1])
}

fn week_label(row: &CleanedGameRow) -> String {
    row.week
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .unwrap_or("0")
        .to_string()
}

fn opponent_name(idx: usize, row: &CleanedGameRow) -> Result<&str, DeriveError> {
    row.opp
        .as_deref()
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .ok_or_else(|| DeriveError::MissingOpponent {
            row: idx + 1,
            team: row.team.clone(),
            season: row.season,
            week: week_label(row),
        })
}

pub fn dedup_team_games(rows: Vec<CleanedGameRow>) -> Result<Vec<CleanedGameRow>, DeriveError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(rows.len() / 2 + 1);
    for (idx, row) in rows.into_iter().enumerate() {
        let team = teams::full_name(&row.team, row.season)?;
        let opponent = opponent_name(idx, &row)?;
        let key = provisional_game_id(row.season, &week_label(&row), team, opponent);
        if seen.insert(key) {
            out.push(row);
        }
    }
    Ok(out)
}

pub fn parse_time_of_possession(text: &str) -> Option<i64> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let minutes = minutes.trim().parse::<u32>().ok()?;
    let seconds = seconds.trim().parse::<u32>().ok()?;
    Some(i64::from(minutes) * 60 + i64::from(seconds))
}

/// The site prints `Month Day`; January games belong to the calendar year after
/// the season label. ISO dates are taken as printed, anything else is `None`.
pub fn resolve_date(text: Option<&str>, season: i32) -> Option<NaiveDate> {
    let text = text?.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    let (month, day) = text.split_once(' ')?;
    let month = Month::from_str(month.trim()).ok()?.number_from_month();
    let day = day.trim().parse::<u32>().ok()?;
    let year = if month == ROLLOVER_MONTH {
        season + 1
    } else {
        season
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn home_won(result: Option<&str>, host: Host) -> u8 {
    match (result.map(str::trim), host) {
        (Some("W"), Host::Home) | (Some("L"), Host::Away) => 1,
        _ => 0,
    }
}

fn team_line(side: &SideStats, game_id: &str) -> Result<TeamLine, DeriveError> {
    let top_text = side.top.as_deref().unwrap_or("0:0");
    let top = parse_time_of_possession(top_text).ok_or_else(|| {
        DeriveError::InvalidTimeOfPossession {
            game_id: game_id.to_string(),
            value: top_text.to_string(),
        }
    })?;
    Ok(TeamLine {
        pts: side.pts.unwrap_or(0.0),
        numeric: side.numeric.map(|v| v.unwrap_or(0.0)),
        top,
    })
}

pub fn resolve_game(idx: usize, row: &CleanedGameRow) -> Result<FinalGameRow, DeriveError> {
    let team = teams::full_name(&row.team, row.season)?;
    let opponent = opponent_name(idx, row)?;
    let week = week_label(row);

    let (home_team, away_team) = match row.host {
        Host::Home => (team, opponent),
        Host::Away => (opponent, team),
    };
    let game_id = format!("{}_{week}_{home_team}_{away_team}", row.season);

    let own = team_line(&row.own, &game_id)?;
    let other = team_line(&row.opponent, &game_id)?;
    let (home, away) = match row.host {
        Host::Home => (own, other),
        Host::Away => (other, own),
    };

    Ok(FinalGameRow {
        season: row.season,
        week,
        overtime: u8::from(row.overtime_label() == "yes"),
        home_results: home_won(row.result.as_deref(), row.host),
        date: resolve_date(row.date.as_deref(), row.season),
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        game_id,
        home,
        away,
    })
}

/// Undated games sort after every dated one, keeping input order among
/// themselves.
pub fn by_date(a: &FinalGameRow, b: &FinalGameRow) -> Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn derive_games(rows: Vec<CleanedGameRow>) -> Result<Vec<FinalGameRow>, DeriveError> {
    let team_rows = rows.len();
    let unique = dedup_team_games(rows)?;

    let mut games = unique
        .iter()
        .enumerate()
        .map(|(idx, row)| resolve_game(idx, row))
        .collect::<Result<Vec<_>, _>>()?;

    for game in games.iter().filter(|g| g.date.is_none()) {
        tracing::warn!(game_id = %game.game_id, "unparseable game date; kept and sorted last");
    }
    games.sort_by(by_date);

    tracing::info!(team_rows, games = games.len(), "derived per-game rows");
    Ok(games)
}
