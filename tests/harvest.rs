use std::fs;
use std::path::PathBuf;

use anyhow::anyhow;

use nfl_gamelog::config::SeasonRange;
use nfl_gamelog::derive::derive_games;
use nfl_gamelog::harvest::{extract_table, gamelog_url, harvest_with, team_season_table};
use nfl_gamelog::schema::{RAW_COLUMN_COUNT, clean, expected_raw_headers};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn builds_gamelog_urls() {
    assert_eq!(
        gamelog_url("nyg", 2023),
        "https://www.pro-football-reference.com/teams/nyg/2023/gamelog/"
    );
}

#[test]
fn finds_visible_and_commented_tables() {
    let html = read_fixture("gamelog_nyg_2023.html");
    let own = extract_table(&html, "gamelog2023")
        .expect("page should parse")
        .expect("team table present");
    let opp = extract_table(&html, "gamelog_opp2023")
        .expect("page should parse")
        .expect("opponent table hidden in a comment");

    assert_eq!(own.headers.len(), 36);
    assert_eq!(own.headers[0], "Week");
    assert_eq!(own.headers[35], "ToP");
    assert_eq!(own.rows.len(), 2, "repeated header row is skipped");
    assert_eq!(own.rows[0][3].as_deref(), Some("boxscore"));
    assert_eq!(own.rows[1][6].as_deref(), Some("@"));
    assert_eq!(opp.rows[0][35].as_deref(), Some("33:46"));
}

#[test]
fn page_becomes_raw_rows_in_site_layout() {
    let html = read_fixture("gamelog_nyg_2023.html");
    let raw = team_season_table(&html, "nyg", 2023).expect("both tables present");
    assert_eq!(raw.width(), RAW_COLUMN_COUNT);
    assert_eq!(raw.headers, expected_raw_headers());
    assert_eq!(raw.len(), 2);
    assert_eq!(raw.rows[0][0].as_deref(), Some("2023"));
    assert_eq!(raw.rows[0][1].as_deref(), Some("NYG"));
}

#[test]
fn harvested_page_normalizes() {
    let html = read_fixture("gamelog_nyg_2023.html");
    let raw = team_season_table(&html, "nyg", 2023).unwrap();
    let games = derive_games(clean(&raw).unwrap()).unwrap();
    assert_eq!(games.len(), 2);

    let opener = &games[0];
    assert_eq!(opener.game_id, "2023_1_New York Giants_Dallas Cowboys");
    assert_eq!(opener.home_results, 0);
    assert_eq!(opener.away.pts, 40.0);

    let road = &games[1];
    assert_eq!(road.game_id, "2023_2_Arizona Cardinals_New York Giants");
    assert_eq!(road.home.pts, 28.0);
    assert_eq!(road.away.pts, 31.0);
    assert_eq!(road.home_results, 0);
    assert_eq!(road.home.top, 28 * 60 + 58);
    assert_eq!(road.away.rush_yds(), 200.0);
}

#[test]
fn missing_tables_are_recorded_not_fatal() {
    let html = read_fixture("gamelog_nyg_2023.html");
    let seasons = SeasonRange::new(2022, 2023).unwrap();
    let teams = vec!["nyg".to_string()];
    let mut messages = Vec::new();

    let (raw, summary) = harvest_with(
        seasons,
        &teams,
        |url| {
            if url.contains("/2023/") {
                Ok(html.clone())
            } else {
                Err(anyhow!("http 404 Not Found for {url}"))
            }
        },
        || {},
        |progress| messages.push(progress.message),
    );

    assert_eq!(summary.pairs_total, 2);
    assert_eq!(summary.pairs_succeeded, 1);
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("2022 nyg"));
    assert!(summary.errors[0].contains("404"));
    assert_eq!(raw.len(), 2);
    assert_eq!(messages.len(), 2);
}

#[test]
fn page_without_opponent_table_is_an_error() {
    let html = read_fixture("gamelog_nyg_2023.html");
    let err = team_season_table(&html, "nyg", 2022).unwrap_err();
    assert!(err.to_string().contains("gamelog2022"));
}
