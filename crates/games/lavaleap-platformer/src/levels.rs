use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::map_gen::{self, MapError};

const FIRST_STEPS: &str = include_str!("../levels/first-steps.toml");
const LAVA_FIELD: &str = include_str!("../levels/lava-field.toml");

/// Names accepted by [`builtin`].
pub const BUILTIN_NAMES: &[&str] = &["first-steps", "lava-field"];

/// Errors raised while loading a level file.
#[derive(Debug)]
pub enum LevelFileError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Map(MapError),
    UnknownBuiltin(String),
}

impl fmt::Display for LevelFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read level file: {e}"),
            Self::Parse(e) => write!(f, "malformed level file: {e}"),
            Self::Map(e) => write!(f, "invalid level map: {e}"),
            Self::UnknownBuiltin(name) => write!(
                f,
                "unknown level {name:?} (built-in levels: {})",
                BUILTIN_NAMES.join(", ")
            ),
        }
    }
}

impl std::error::Error for LevelFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Map(e) => Some(e),
            Self::UnknownBuiltin(_) => None,
        }
    }
}

impl From<std::io::Error> for LevelFileError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for LevelFileError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<MapError> for LevelFileError {
    fn from(e: MapError) -> Self {
        Self::Map(e)
    }
}

/// A named map schema as stored on disk.
///
/// ```toml
/// name = "First Steps"
/// rows = ["..C.", ".PPP", "GGGG"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    pub name: String,
    pub rows: Vec<String>,
}

impl LevelFile {
    /// Parse and validate a level document.
    pub fn from_toml_str(s: &str) -> Result<Self, LevelFileError> {
        let level: LevelFile = toml::from_str(s)?;
        map_gen::validate(&level.rows)?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelFileError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            name = %level.name,
            rows = level.rows.len(),
            "Loaded level file"
        );
        Ok(level)
    }

    pub fn to_toml_string_pretty(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Number of coins in the schema.
    pub fn coin_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.chars().filter(|&c| c == 'C').count())
            .sum()
    }
}

/// Look up a level shipped with the crate.
pub fn builtin(name: &str) -> Result<LevelFile, LevelFileError> {
    let source = match name {
        "first-steps" => FIRST_STEPS,
        "lava-field" => LAVA_FIELD,
        other => return Err(LevelFileError::UnknownBuiltin(other.to_string())),
    };
    LevelFile::from_toml_str(source)
}

/// Resolve `name_or_path` as a built-in name first, then as a file path.
pub fn resolve(name_or_path: &str) -> Result<LevelFile, LevelFileError> {
    if BUILTIN_NAMES.contains(&name_or_path) {
        builtin(name_or_path)
    } else {
        LevelFile::load(name_or_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_parses() {
        for name in BUILTIN_NAMES {
            let level = builtin(name).unwrap();
            assert!(!level.rows.is_empty(), "{name} has no rows");
            assert!(level.coin_count() > 0, "{name} has no coins");
        }
    }

    #[test]
    fn lava_field_keeps_its_shape() {
        let level = builtin("lava-field").unwrap();
        assert_eq!(level.name, "Lava Field");
        assert_eq!(level.rows.len(), 11);
        assert!(level.rows.last().unwrap().chars().all(|c| c == 'L'));
        assert_eq!(level.coin_count(), 2);
    }

    #[test]
    fn unknown_builtin_lists_choices() {
        let err = builtin("nope").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope"));
        assert!(msg.contains("first-steps"));
    }

    #[test]
    fn bad_symbol_is_rejected() {
        let err = LevelFile::from_toml_str("name = \"x\"\nrows = [\"G$G\"]\n").unwrap_err();
        assert!(matches!(
            err,
            LevelFileError::Map(MapError::UnknownSymbol {
                row: 0,
                col: 1,
                symbol: '$'
            })
        ));
    }

    #[test]
    fn missing_rows_is_parse_error() {
        let err = LevelFile::from_toml_str("name = \"x\"\n").unwrap_err();
        assert!(matches!(err, LevelFileError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LevelFile::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, LevelFileError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn toml_roundtrip() {
        let level = LevelFile {
            name: "Tiny".into(),
            rows: vec!["..C".into(), "GGG".into()],
        };
        let text = level.to_toml_string_pretty().unwrap();
        assert_eq!(LevelFile::from_toml_str(&text).unwrap(), level);
    }

    #[test]
    fn load_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("lavaleap-level-{}.toml", std::process::id()));
        std::fs::write(&path, "name = \"Disk\"\nrows = [\"C.\", \"GG\"]\n").unwrap();
        let level = resolve(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(level.name, "Disk");
        assert_eq!(level.coin_count(), 1);
    }
}
