//! Saved calculations.
//!
//! Calculator pages keep a short history of loans the user chose to save.
//! Storage is an injected [`CalculationStore`] so the calculation core never
//! touches global state: [`InMemoryStore`] for tests and embedding,
//! [`JsonFileStore`] for the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::amortization::engine::LoanOutput;
use crate::amortization::params::LoanInput;
use crate::error::LoanCalcError;
use crate::types::Money;
use crate::LoanCalcResult;

/// A loan request and its headline figures, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCalculation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub saved_at: DateTime<Utc>,
    pub input: LoanInput,
    pub payment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl SavedCalculation {
    /// Snapshot a finished calculation under a fresh UUID.
    pub fn new(input: &LoanInput, output: &LoanOutput) -> Self {
        SavedCalculation {
            id: uuid::Uuid::new_v4().to_string(),
            label: input.label.clone(),
            saved_at: Utc::now(),
            input: input.clone(),
            payment: output.payment,
            total_interest: output.total_interest,
            total_payment: output.total_payment,
        }
    }
}

/// Key-value store of saved calculations, keyed by id.
pub trait CalculationStore {
    /// Insert or replace by id; returns the id.
    fn save(&mut self, calculation: SavedCalculation) -> LoanCalcResult<String>;

    fn load(&self, id: &str) -> LoanCalcResult<SavedCalculation>;

    fn delete(&mut self, id: &str) -> LoanCalcResult<()>;

    /// All entries, newest first.
    fn list(&self) -> LoanCalcResult<Vec<SavedCalculation>>;
}

fn newest_first(entries: &BTreeMap<String, SavedCalculation>) -> Vec<SavedCalculation> {
    let mut all: Vec<SavedCalculation> = entries.values().cloned().collect();
    all.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.id.cmp(&b.id)));
    all
}

fn validate_id(id: &str) -> LoanCalcResult<()> {
    if id.trim().is_empty() {
        return Err(LoanCalcError::invalid("id", "Id cannot be empty"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: BTreeMap<String, SavedCalculation>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CalculationStore for InMemoryStore {
    fn save(&mut self, calculation: SavedCalculation) -> LoanCalcResult<String> {
        validate_id(&calculation.id)?;
        let id = calculation.id.clone();
        self.entries.insert(id.clone(), calculation);
        Ok(id)
    }

    fn load(&self, id: &str) -> LoanCalcResult<SavedCalculation> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| LoanCalcError::NotFound(format!("saved calculation '{id}'")))
    }

    fn delete(&mut self, id: &str) -> LoanCalcResult<()> {
        self.entries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| LoanCalcError::NotFound(format!("saved calculation '{id}'")))
    }

    fn list(&self) -> LoanCalcResult<Vec<SavedCalculation>> {
        Ok(newest_first(&self.entries))
    }
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// Store backed by a single JSON array file, rewritten on every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, SavedCalculation>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> LoanCalcResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| {
                LoanCalcError::Storage(format!("Failed to read '{}': {}", path.display(), e))
            })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                let saved: Vec<SavedCalculation> = serde_json::from_str(&contents)?;
                saved.into_iter().map(|c| (c.id.clone(), c)).collect()
            }
        } else {
            BTreeMap::new()
        };
        log::debug!("opened {} with {} saved calculations", path.display(), entries.len());
        Ok(JsonFileStore { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write to a sibling file and rename it over the store, so a crash
    /// mid-write leaves the previous contents intact.
    fn persist(&self) -> LoanCalcResult<()> {
        let all: Vec<&SavedCalculation> = self.entries.values().collect();
        let json = serde_json::to_string_pretty(&all)?;
        let staging = self.staging_path();
        fs::write(&staging, json).map_err(|e| {
            LoanCalcError::Storage(format!("Failed to write '{}': {}", staging.display(), e))
        })?;
        fs::rename(&staging, &self.path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            LoanCalcError::Storage(format!("Failed to replace '{}': {}", self.path.display(), e))
        })
    }
}

impl CalculationStore for JsonFileStore {
    fn save(&mut self, calculation: SavedCalculation) -> LoanCalcResult<String> {
        validate_id(&calculation.id)?;
        let id = calculation.id.clone();
        self.entries.insert(id.clone(), calculation);
        self.persist()?;
        Ok(id)
    }

    fn load(&self, id: &str) -> LoanCalcResult<SavedCalculation> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| LoanCalcError::NotFound(format!("saved calculation '{id}'")))
    }

    fn delete(&mut self, id: &str) -> LoanCalcResult<()> {
        if self.entries.remove(id).is_none() {
            return Err(LoanCalcError::NotFound(format!("saved calculation '{id}'")));
        }
        self.persist()
    }

    fn list(&self) -> LoanCalcResult<Vec<SavedCalculation>> {
        Ok(newest_first(&self.entries))
    }
}
