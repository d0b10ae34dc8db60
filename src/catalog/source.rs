use crate::catalog::CatalogError;
use crate::domain::PropertyRecord;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Where the catalog records come from. The service asks for the full set on
/// first use and again on every reload.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<Vec<PropertyRecord>, CatalogError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// A JSON file holding an array of property objects.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonFileSource {
    fn load(&self) -> Result<Vec<PropertyRecord>, CatalogError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| CatalogError::Read {
            path: self.path.display().to_string(),
            source,
        })?;

        let entries: Vec<Value> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: self.path.display().to_string(),
                source,
            })?;

        let total = entries.len();
        let records: Vec<PropertyRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match PropertyRecord::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), index, error = %e, "skipping catalog entry");
                    None
                }
            })
            .collect();

        if records.len() < total {
            tracing::warn!(
                path = %self.path.display(),
                skipped = total - records.len(),
                "catalog loaded with unusable entries"
            );
        }
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed in-memory record set.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<PropertyRecord>,
}

#[cfg(test)]
impl StaticSource {
    pub fn new(records: Vec<PropertyRecord>) -> Self {
        Self { records }
    }
}

#[cfg(test)]
impl CatalogSource for StaticSource {
    fn load(&self) -> Result<Vec<PropertyRecord>, CatalogError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} records)", self.records.len())
    }
}
