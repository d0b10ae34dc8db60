use crate::catalog::{CatalogError, CatalogSource};
use crate::domain::stats::{self, CatalogMetadata, CatalogStatistics};
use crate::domain::{PageRequest, PropertyFilter, PropertyRecord};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

/// An immutable view of every record the source produced.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<PropertyRecord>,
}

impl Catalog {
    pub fn new(records: Vec<PropertyRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn valid(&self) -> impl Iterator<Item = &PropertyRecord> {
        self.records.iter().filter(|r| r.is_valid())
    }

    /// Looks at every record, valid or not.
    pub fn find(&self, ad_id: &str) -> Option<&PropertyRecord> {
        self.records.iter().find(|r| r.ad_id == ad_id)
    }
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPage {
    pub properties: Vec<PropertyRecord>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// Read-only catalog over a [`CatalogSource`].
///
/// Records are loaded on first use and kept for the life of the service.
/// Nothing invalidates them implicitly; [`CatalogService::reload`] is the only
/// way to pick up a changed source. A failed load leaves nothing cached, so
/// the next call tries again.
pub struct CatalogService {
    source: Box<dyn CatalogSource>,
    snapshot: RwLock<Option<Arc<Catalog>>>,
}

impl CatalogService {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            snapshot: RwLock::new(None),
        }
    }

    /// Current snapshot, loading it if this is the first call.
    pub fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = self
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(catalog));
        }

        // Two threads may both get here on a cold start; both parse the same
        // file and whichever writes last wins.
        let loaded = Arc::new(self.load()?);
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Re-read the source and swap the snapshot. On failure the previous
    /// snapshot stays in place. Returns the new record count.
    pub fn reload(&self) -> Result<usize, CatalogError> {
        let loaded = self.load()?;
        let count = loaded.len();
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(loaded));
        Ok(count)
    }

    fn load(&self) -> Result<Catalog, CatalogError> {
        let origin = self.source.describe();
        match self.source.load() {
            Ok(records) => {
                let catalog = Catalog::new(records);
                tracing::info!(
                    source = %origin,
                    records = catalog.len(),
                    valid = catalog.valid().count(),
                    "catalog loaded"
                );
                Ok(catalog)
            }
            Err(e) => {
                tracing::error!(source = %origin, error = %e, "catalog load failed");
                Err(e)
            }
        }
    }

    pub fn list(
        &self,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<PropertyPage, CatalogError> {
        let catalog = self.catalog()?;
        let matching: Vec<&PropertyRecord> =
            catalog.valid().filter(|r| filter.matches(r)).collect();

        let total = matching.len();
        let (start, end) = page.window(total);

        Ok(PropertyPage {
            properties: matching[start..end].iter().map(|r| (*r).clone()).collect(),
            total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages(total),
        })
    }

    pub fn get_by_id(&self, ad_id: &str) -> Result<Option<PropertyRecord>, CatalogError> {
        Ok(self.catalog()?.find(ad_id).cloned())
    }

    pub fn metadata(&self) -> Result<CatalogMetadata, CatalogError> {
        let catalog = self.catalog()?;
        Ok(stats::metadata(catalog.len(), catalog.valid()))
    }

    pub fn statistics(&self) -> Result<CatalogStatistics, CatalogError> {
        Ok(stats::statistics(self.catalog()?.valid()))
    }
}
