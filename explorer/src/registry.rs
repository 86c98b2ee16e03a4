use crate::error::LoadError;
use crate::record::{Dataset, Header};
use indexmap::IndexSet;
use log::debug;

/// Datasets of the current load batch, in file selection order.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    datasets: Vec<Dataset>,
    reference_header: Option<Header>,
    universe: IndexSet<String>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every dataset: a new batch replaces the previous one wholesale.
    pub fn begin_load_batch(&mut self) {
        self.datasets.clear();
        self.reference_header = None;
        self.universe.clear();
    }

    /// Admits a dataset if it is the first of the batch or if its header
    /// matches the first one name for name. Rejected datasets leave the
    /// registry untouched.
    pub fn admit(&mut self, dataset: Dataset) -> Result<(), LoadError> {
        match &self.reference_header {
            None => {
                debug!(
                    "Reference header from {}: {:?}",
                    dataset.name,
                    dataset.header().names()
                );
                self.reference_header = Some(dataset.header().clone());
            }
            Some(reference) if reference != dataset.header() => {
                return Err(LoadError::SchemaMismatch {
                    file: dataset.name,
                    expected: reference.names().to_vec(),
                    found: dataset.table.header.names().to_vec(),
                });
            }
            Some(_) => (),
        }

        self.universe.extend(dataset.header().names().iter().cloned());
        self.datasets.push(dataset);
        Ok(())
    }

    /// Union of the attributes of every admitted dataset, in first-seen order.
    ///
    /// Since `admit` requires identical headers, this equals the reference
    /// header whenever the registry is non-empty.
    pub fn attribute_universe(&self) -> &IndexSet<String> {
        &self.universe
    }

    pub fn reference_header(&self) -> Option<&Header> {
        self.reference_header.as_ref()
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
