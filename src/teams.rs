use crate::error::DeriveError;

pub const TEAM_CODES: &[&str] = &[
    "crd", "atl", "rav", "buf", "car", "chi", "cin", "cle", "dal", "den", "det", "gnb", "htx",
    "clt", "jax", "kan", "sdg", "ram", "rai", "mia", "min", "nwe", "nor", "nyg", "nyj", "phi",
    "pit", "sea", "sfo", "tam", "oti", "was",
];

struct Era {
    from_season: i32,
    name: &'static str,
}

const fn era(from_season: i32, name: &'static str) -> Era {
    Era { from_season, name }
}

fn eras(code: &str) -> Option<&'static [Era]> {
    let eras: &'static [Era] = match code {
        "CRD" => const { &[
            era(1960, "St. Louis Cardinals"),
            era(1988, "Phoenix Cardinals"),
            era(1994, "Arizona Cardinals"),
        ] },
        "ATL" => const { &[era(1966, "Atlanta Falcons")] },
        "RAV" => const { &[era(1996, "Baltimore Ravens")] },
        "BUF" => const { &[era(1960, "Buffalo Bills")] },
        "CAR" => const { &[era(1995, "Carolina Panthers")] },
        "CHI" => const { &[era(1920, "Chicago Bears")] },
        "CIN" => const { &[era(1968, "Cincinnati Bengals")] },
        "CLE" => const { &[era(1946, "Cleveland Browns")] },
        "DAL" => const { &[era(1960, "Dallas Cowboys")] },
        "DEN" => const { &[era(1960, "Denver Broncos")] },
        "DET" => const { &[era(1934, "Detroit Lions")] },
        "GNB" => const { &[era(1921, "Green Bay Packers")] },
        "HTX" => const { &[era(2002, "Houston Texans")] },
        "CLT" => const { &[era(1953, "Baltimore Colts"), era(1984, "Indianapolis Colts")] },
        "JAX" => const { &[era(1995, "Jacksonville Jaguars")] },
        "KAN" => const { &[era(1963, "Kansas City Chiefs")] },
        "SDG" => const { &[era(1961, "San Diego Chargers"), era(2017, "Los Angeles Chargers")] },
        "RAM" => const { &[
            era(1946, "Los Angeles Rams"),
            era(1995, "St. Louis Rams"),
            era(2016, "Los Angeles Rams"),
        ] },
        "RAI" => const { &[
            era(1960, "Oakland Raiders"),
            era(1982, "Los Angeles Raiders"),
            era(1995, "Oakland Raiders"),
            era(2020, "Las Vegas Raiders"),
        ] },
        "MIA" => const { &[era(1966, "Miami Dolphins")] },
        "MIN" => const { &[era(1961, "Minnesota Vikings")] },
        "NWE" => const { &[era(1960, "Boston Patriots"), era(1971, "New England Patriots")] },
        "NOR" => const { &[era(1967, "New Orleans Saints")] },
        "NYG" => const { &[era(1925, "New York Giants")] },
        "NYJ" => const { &[era(1963, "New York Jets")] },
        "PHI" => const { &[era(1933, "Philadelphia Eagles")] },
        "PIT" => const { &[era(1940, "Pittsburgh Steelers")] },
        "SEA" => const { &[era(1976, "Seattle Seahawks")] },
        "SFO" => const { &[era(1950, "San Francisco 49ers")] },
        "TAM" => const { &[era(1976, "Tampa Bay Buccaneers")] },
        "OTI" => const { &[
            era(1960, "Houston Oilers"),
            era(1997, "Tennessee Oilers"),
            era(1999, "Tennessee Titans"),
        ] },
        "WAS" => const { &[
            era(1937, "Washington Redskins"),
            era(2020, "Washington Football Team"),
            era(2022, "Washington Commanders"),
        ] },
        _ => return None,
    };
    Some(eras)
}

pub fn full_name(code: &str, season: i32) -> Result<&'static str, DeriveError> {
    let upper = code.trim().to_ascii_uppercase();
    let eras = eras(&upper).ok_or_else(|| DeriveError::UnmappedTeam {
        code: code.to_string(),
        season,
    })?;
    let name = eras
        .iter()
        .rev()
        .find(|e| e.from_season <= season)
        .or_else(|| eras.first())
        .map(|e| e.name)
        .ok_or_else(|| DeriveError::UnmappedTeam {
            code: code.to_string(),
            season,
        })?;
    Ok(name)
}

pub fn parse_codes(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split([',', ';', ' ']) {
        let code = part.trim().to_ascii_lowercase();
        if code.is_empty() || !TEAM_CODES.contains(&code.as_str()) {
            continue;
        }
        if !out.contains(&code) {
            out.push(code);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_harvested_code_resolves() {
        for code in TEAM_CODES {
            assert!(full_name(code, 2023).is_ok(), "{code}");
        }
    }

    #[test]
    fn relocations_follow_the_season() {
        assert_eq!(full_name("RAI", 2019).unwrap(), "Oakland Raiders");
        assert_eq!(full_name("RAI", 2020).unwrap(), "Las Vegas Raiders");
        assert_eq!(full_name("ram", 2010).unwrap(), "St. Louis Rams");
        assert_eq!(full_name("SDG", 2016).unwrap(), "San Diego Chargers");
        assert_eq!(full_name("WAS", 2021).unwrap(), "Washington Football Team");
        assert_eq!(full_name("OTI", 1998).unwrap(), "Tennessee Oilers");
    }

    #[test]
    fn unknown_code_is_an_error() {
        let err = full_name("XYZ", 2023).unwrap_err();
        assert_eq!(
            err,
            DeriveError::UnmappedTeam {
                code: "XYZ".to_string(),
                season: 2023
            }
        );
    }

    #[test]
    fn parse_codes_filters_and_dedups() {
        assert_eq!(parse_codes("NYG, dal;nyg zzz"), vec!["nyg", "dal"]);
    }
}
