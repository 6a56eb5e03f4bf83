use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("raw table has {found} columns, expected {expected}")]
    ColumnCount { expected: usize, found: usize },

    #[error("raw table is missing required column `{0}`")]
    MissingColumn(String),

    #[error("column {position} is `{found}`, expected `{expected}`")]
    UnexpectedColumn {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("row {row}: season `{value}` is not a year")]
    InvalidSeason { row: usize, value: String },

    #[error("row {row}: column `{column}` holds non-numeric value `{value}`")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum DeriveError {
    #[error("team code `{code}` has no entry in the team table (season {season})")]
    UnmappedTeam { code: String, season: i32 },

    #[error("row {row}: {team} week {week} of {season} has no opponent")]
    MissingOpponent {
        row: usize,
        team: String,
        season: i32,
        week: String,
    },

    #[error("game {game_id}: time of possession `{value}` is not MM:SS")]
    InvalidTimeOfPossession { game_id: String, value: String },
}
