//! Loading and validating session rules from presets or TOML files.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use neon_defence_core::{Rules, RulesError};
use thiserror::Error;

/// Built-in maps selectable from the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Preset {
    /// Winding 20x15 map.
    #[default]
    Neon,
    /// Compact 10x10 map.
    Isometric,
}

impl Preset {
    fn rules(self) -> Rules {
        match self {
            Self::Neon => Rules::neon(),
            Self::Isometric => Rules::isometric(),
        }
    }
}

/// Failures while producing the rules for a session.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration file is not valid TOML for [`Rules`].
    #[error("failed to parse {}", path.display())]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// The rules parsed but cannot drive a session.
    #[error("invalid rules")]
    Invalid(#[from] RulesError),
}

/// Loads rules from `path` when provided, otherwise from `preset`, and
/// validates them.
pub(crate) fn load(path: Option<&Path>, preset: Preset) -> Result<Rules, ConfigError> {
    let rules = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse_rules(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => preset.rules(),
    };

    let _ = rules.validate()?;
    Ok(rules)
}

fn parse_rules(text: &str) -> Result<Rules, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn bundled_files_match_the_presets() {
        let neon = parse_rules(include_str!("../config/neon.toml")).expect("neon.toml parses");
        assert_eq!(neon, Rules::neon());

        let isometric =
            parse_rules(include_str!("../config/isometric.toml")).expect("isometric.toml parses");
        assert_eq!(isometric, Rules::isometric());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let rules = parse_rules("[economy]\nstarting_money = 250\n").expect("partial file parses");
        assert_eq!(rules.economy.starting_money, 250);
        assert_eq!(rules.economy.tower_cost, 50);
        assert_eq!(rules.map, Rules::default().map);
    }

    #[test]
    fn presets_load_without_a_file() {
        let rules = load(None, Preset::Isometric).expect("preset is valid");
        assert_eq!(rules.map.columns, 10);
        assert_eq!(load(None, Preset::default()).expect("preset"), Rules::neon());
    }

    #[test]
    fn unreadable_file_reports_its_path() {
        let error = load(Some(Path::new("does/not/exist.toml")), Preset::Neon)
            .expect_err("file is missing");
        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().contains("does/not/exist.toml"));
        assert!(error.source().is_some());
    }

    #[test]
    fn degenerate_rules_are_rejected_after_parsing() {
        let rules = parse_rules("[map]\ncolumns = 0\n").expect("parses");
        assert!(matches!(rules.validate(), Err(RulesError::EmptyGrid)));
        assert!(parse_rules("[map]\ncolumns = \"wide\"\n").is_err());
    }
}
