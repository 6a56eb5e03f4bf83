use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::teams::{TEAM_CODES, parse_codes};

const DEFAULT_RAW_PATH: &str = "nfl_raw.csv";
const DEFAULT_OUT_PATH: &str = "nfl_games.csv";
const DEFAULT_PAUSE: PauseRange = PauseRange {
    min_secs: 7,
    max_secs: 8,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonRange {
    pub begin: i32,
    pub end: i32,
}

impl SeasonRange {
    pub fn new(begin: i32, end: i32) -> Result<Self> {
        if begin > end {
            return Err(anyhow!("season range {begin}..{end} is empty (begin > end)"));
        }
        Ok(Self { begin, end })
    }

    pub fn seasons(&self) -> RangeInclusive<i32> {
        self.begin..=self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl PauseRange {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (min, max) = raw.split_once('-').unwrap_or((raw, raw));
        let min_secs = min
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid pause range `{raw}`"))?;
        let max_secs = max
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid pause range `{raw}`"))?;
        if min_secs > max_secs {
            return Err(anyhow!("invalid pause range `{raw}` (min > max)"));
        }
        Ok(Self { min_secs, max_secs })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub seasons: Option<SeasonRange>,
    pub teams: Vec<String>,
    pub raw_path: PathBuf,
    pub out_path: PathBuf,
    pub baseline_path: Option<PathBuf>,
    pub merge: bool,
    pub xlsx_path: Option<PathBuf>,
    pub cleaned_path: Option<PathBuf>,
    pub pause: PauseRange,
    pub use_cache: bool,
}

impl PipelineConfig {
    pub fn load() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    pub fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let setting = |flag: &str, key: &str| {
            arg_value(args, flag)
                .or_else(|| env(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let switch = |flag: &str, key: &str| {
            has_flag(args, flag) || env(key).is_some_and(|v| truthy(&v))
        };

        let begin = setting("--begin", "NFL_SEASON_BEGIN")
            .map(|v| parse_year(&v))
            .transpose()?;
        let end = setting("--end", "NFL_SEASON_END")
            .map(|v| parse_year(&v))
            .transpose()?;
        let seasons = match (begin, end) {
            (Some(begin), end) => Some(SeasonRange::new(begin, end.unwrap_or(begin))?),
            (None, Some(_)) => return Err(anyhow!("--end given without --begin")),
            (None, None) => None,
        };

        let teams = match setting("--teams", "NFL_TEAMS") {
            Some(raw) => {
                let teams = parse_codes(&raw);
                if teams.is_empty() {
                    return Err(anyhow!("no known team codes in `{raw}`"));
                }
                teams
            }
            None => TEAM_CODES.iter().map(|c| c.to_string()).collect(),
        };

        let pause = setting("--pause-secs", "NFL_PAUSE_SECS")
            .map(|v| PauseRange::parse(&v))
            .transpose()?
            .unwrap_or(DEFAULT_PAUSE);

        Ok(Self {
            seasons,
            teams,
            raw_path: setting("--raw", "NFL_RAW_PATH")
                .unwrap_or_else(|| DEFAULT_RAW_PATH.to_string())
                .into(),
            out_path: setting("--out", "NFL_OUT_PATH")
                .unwrap_or_else(|| DEFAULT_OUT_PATH.to_string())
                .into(),
            baseline_path: setting("--baseline", "NFL_BASELINE_PATH").map(PathBuf::from),
            merge: switch("--merge", "NFL_MERGE"),
            xlsx_path: setting("--xlsx", "NFL_XLSX_PATH").map(PathBuf::from),
            cleaned_path: setting("--cleaned", "NFL_CLEANED_PATH").map(PathBuf::from),
            pause,
            use_cache: !switch("--no-cache", "NFL_NO_CACHE"),
        })
    }

    pub fn require_seasons(&self) -> Result<SeasonRange> {
        self.seasons
            .context("no season range: pass --begin <year> [--end <year>] or set NFL_SEASON_BEGIN")
    }
}

fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .with_context(|| format!("invalid season year `{raw}`"))
}

fn truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.starts_with("--")
        {
            return Some(next.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_input() {
        let cfg = PipelineConfig::from_sources(&[], no_env).unwrap();
        assert_eq!(cfg.seasons, None);
        assert_eq!(cfg.teams.len(), 32);
        assert_eq!(cfg.raw_path, PathBuf::from("nfl_raw.csv"));
        assert_eq!(cfg.out_path, PathBuf::from("nfl_games.csv"));
        assert_eq!(cfg.pause, DEFAULT_PAUSE);
        assert!(cfg.use_cache);
        assert!(!cfg.merge);
        assert!(cfg.require_seasons().is_err());
    }

    #[test]
    fn flags_in_both_spellings() {
        let cfg = PipelineConfig::from_sources(
            &args(&[
                "--begin=2020",
                "--end",
                "2023",
                "--out",
                "games.csv",
                "--merge",
                "--teams=nyg,dal",
                "--pause-secs",
                "0",
            ]),
            no_env,
        )
        .unwrap();
        let seasons = cfg.require_seasons().unwrap();
        assert_eq!(seasons.seasons().collect::<Vec<_>>(), vec![2020, 2021, 2022, 2023]);
        assert_eq!(cfg.out_path, PathBuf::from("games.csv"));
        assert!(cfg.merge);
        assert_eq!(cfg.teams, vec!["nyg", "dal"]);
        assert_eq!(cfg.pause, PauseRange { min_secs: 0, max_secs: 0 });
    }

    #[test]
    fn flags_override_environment() {
        let env = HashMap::from([
            ("NFL_SEASON_BEGIN", "2019"),
            ("NFL_BASELINE_PATH", "base.csv"),
            ("NFL_NO_CACHE", "1"),
        ]);
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());
        let cfg = PipelineConfig::from_sources(&args(&["--begin", "2022"]), lookup).unwrap();
        assert_eq!(cfg.seasons, Some(SeasonRange { begin: 2022, end: 2022 }));
        assert_eq!(cfg.baseline_path, Some(PathBuf::from("base.csv")));
        assert!(!cfg.use_cache);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = PipelineConfig::from_sources(&args(&["--begin", "2023", "--end", "2020"]), no_env);
        assert!(err.is_err());
        assert!(PauseRange::parse("9-3").is_err());
        assert_eq!(
            PauseRange::parse("7-8").unwrap(),
            PauseRange { min_secs: 7, max_secs: 8 }
        );
    }
}
