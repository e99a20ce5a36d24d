use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

use super::settings::Difficulty;

/// Catalog shipped with the binary. Used whenever `--countries` is not given.
const BUILTIN_CATALOG: &str = include_str!("../../../data/countries.json");

/// One country's reference data. Loaded once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryRecord {
    pub name: String,
    pub capital: String,
    pub continent: String,
    pub population: u64,
    /// Land area in square kilometers.
    pub area: u64,
    pub languages: Vec<String>,
    pub subregion: String,
    pub currency: String,
    pub flag: String,
    pub fact: String,
    pub difficulty: Difficulty,
}

/// The full reference list of countries.
#[derive(Debug, Clone)]
pub struct Catalog {
    countries: Vec<CountryRecord>,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let countries: Vec<CountryRecord> =
            serde_json::from_str(json).context("country catalog is not valid JSON")?;
        Ok(Self { countries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;
        Self::from_json_str(&json)
    }

    /// The catalog embedded in the binary.
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_CATALOG).expect("built-in catalog must parse")
    }

    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Countries whose continent matches `filter`, or everything for "all".
    pub fn filtered(&self, filter: &str) -> Vec<&CountryRecord> {
        self.countries
            .iter()
            .filter(|c| filter == "all" || c.continent == filter)
            .collect()
    }

    /// Continent names present in the catalog, sorted, deduplicated.
    pub fn continents(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.countries.iter().map(|c| c.continent.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
