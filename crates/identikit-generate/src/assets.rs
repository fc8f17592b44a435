use std::fs;
use std::path::Path;

use identikit_core::Gender;
use tracing::{info, warn};

use crate::errors::GenerationError;

pub const MALE_FIRST_FILE: &str = "male_first.txt";
pub const FEMALE_FIRST_FILE: &str = "female_first.txt";
pub const LAST_FILE: &str = "last.txt";

const BUNDLED_MALE_FIRST: &str = include_str!("../assets/en_US/male_first.txt");
const BUNDLED_FEMALE_FIRST: &str = include_str!("../assets/en_US/female_first.txt");
const BUNDLED_LAST: &str = include_str!("../assets/en_US/last.txt");

/// Name tables consulted by the record builder.
///
/// An empty table means "not loaded"; the builder then uses its fixed
/// fallback lists, so a missing file never stops generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTables {
    male_first: Vec<String>,
    female_first: Vec<String>,
    last: Vec<String>,
}

impl NameTables {
    /// Tables with no data at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tables compiled into the binary.
    pub fn bundled() -> Self {
        Self {
            male_first: parse_lines(BUNDLED_MALE_FIRST),
            female_first: parse_lines(BUNDLED_FEMALE_FIRST),
            last: parse_lines(BUNDLED_LAST),
        }
    }

    pub fn from_lists(male_first: Vec<String>, female_first: Vec<String>, last: Vec<String>) -> Self {
        Self {
            male_first,
            female_first,
            last,
        }
    }

    /// Load `male_first.txt`, `female_first.txt` and `last.txt` from `dir`.
    ///
    /// Missing files leave the corresponding table empty; other I/O errors
    /// are reported.
    pub fn load(dir: &Path) -> Result<Self, GenerationError> {
        let tables = Self {
            male_first: read_lines(&dir.join(MALE_FIRST_FILE))?,
            female_first: read_lines(&dir.join(FEMALE_FIRST_FILE))?,
            last: read_lines(&dir.join(LAST_FILE))?,
        };
        info!(
            dir = %dir.display(),
            male_first = tables.male_first.len(),
            female_first = tables.female_first.len(),
            last = tables.last.len(),
            "name tables loaded"
        );
        Ok(tables)
    }

    pub fn first_names(&self, gender: Gender) -> &[String] {
        match gender {
            Gender::Male => &self.male_first,
            Gender::Female => &self.female_first,
        }
    }

    pub fn last_names(&self) -> &[String] {
        &self.last
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, GenerationError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(parse_lines(&contents)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "name table missing; fallback names will be used");
            Ok(Vec::new())
        }
        Err(err) => Err(GenerationError::Asset(format!(
            "failed to read asset {}: {}",
            path.display(),
            err
        ))),
    }
}

fn parse_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "identikit_assets_{label}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn bundled_tables_are_populated() {
        let tables = NameTables::bundled();
        assert!(!tables.first_names(Gender::Male).is_empty());
        assert!(!tables.first_names(Gender::Female).is_empty());
        assert!(!tables.last_names().is_empty());
        assert!(
            tables
                .last_names()
                .iter()
                .all(|name| !name.trim().is_empty() && name.trim() == name)
        );
    }

    #[test]
    fn load_skips_blank_lines_and_tolerates_missing_files() {
        let dir = temp_dir("partial");
        fs::write(dir.join(MALE_FIRST_FILE), "  Arthur \n\nBruce\n   \n").expect("write male");
        fs::write(dir.join(LAST_FILE), "Wayne\n").expect("write last");

        let tables = NameTables::load(&dir).expect("load tables");
        assert_eq!(tables.first_names(Gender::Male), ["Arthur", "Bruce"]);
        assert!(tables.first_names(Gender::Female).is_empty());
        assert_eq!(tables.last_names(), ["Wayne"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_of_missing_directory_yields_empty_tables() {
        let dir = std::env::temp_dir().join("identikit_assets_does_not_exist");
        let tables = NameTables::load(&dir).expect("missing dir is not fatal");
        assert_eq!(tables, NameTables::empty());
    }
}
