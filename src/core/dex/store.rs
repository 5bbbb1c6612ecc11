//! Exactly-once dataset loading.
//!
//! The first read from any caller triggers a single bulk read and parse.
//! Concurrent first callers wait on the same initialisation and all observe
//! its outcome. A failed load is memoised too: there is no retry and no
//! partial dataset.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::OnceCell;

use super::error::LoadError;
use super::source::{index_by_id, parse_dataset, DatasetSource, FileSource};
use super::types::Pokemon;

/// Loaded records, immutable for the life of the process.
#[derive(Debug, Default)]
pub struct Dataset {
    /// Ascending by id.
    records: Vec<Pokemon>,
    /// id -> position in `records`.
    positions: HashMap<u32, usize>,
}

impl Dataset {
    pub fn from_records(records: Vec<Pokemon>) -> Self {
        let mut records: Vec<Pokemon> = index_by_id(records).into_values().collect();
        records.sort_unstable_by_key(|p| p.id);

        let positions = records
            .iter()
            .enumerate()
            .map(|(pos, p)| (p.id, pos))
            .collect();

        Self { records, positions }
    }

    pub fn all_sorted_by_id(&self) -> &[Pokemon] {
        &self.records
    }

    pub fn by_id(&self, id: u32) -> Option<&Pokemon> {
        self.positions.get(&id).map(|&pos| &self.records[pos])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

type LoadOutcome = Result<Arc<Dataset>, Arc<LoadError>>;
type LoadTask = Shared<BoxFuture<'static, LoadOutcome>>;

/// Owns the dataset and its one-time population.
///
/// The bulk read runs on its own spawned task, so a caller that is
/// cancelled while waiting does not abandon it; the next caller awaits the
/// same task.
pub struct DatasetStore {
    source: Arc<dyn DatasetSource>,
    task: OnceLock<LoadTask>,
    cell: OnceCell<LoadOutcome>,
}

impl DatasetStore {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            task: OnceLock::new(),
            cell: OnceCell::new(),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileSource::new(path)))
    }

    /// Load the dataset if needed and return it.
    ///
    /// Safe to call from any number of tasks concurrently; the underlying
    /// read runs once and every caller gets the same dataset or the same
    /// shared error.
    pub async fn load(&self) -> Result<&Dataset, Arc<LoadError>> {
        self.cell
            .get_or_init(|| self.load_task())
            .await
            .as_ref()
            .map(|dataset| dataset.as_ref())
            .map_err(Arc::clone)
    }

    /// Whether the one-time load has settled, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn all_sorted_by_id(&self) -> Result<&[Pokemon], Arc<LoadError>> {
        Ok(self.load().await?.all_sorted_by_id())
    }

    pub async fn by_id(&self, id: u32) -> Result<Option<&Pokemon>, Arc<LoadError>> {
        Ok(self.load().await?.by_id(id))
    }

    /// The spawned load, started on first use.
    fn load_task(&self) -> LoadTask {
        self.task
            .get_or_init(|| {
                let handle = tokio::spawn(read_and_parse(Arc::clone(&self.source)));
                async move {
                    handle.await.unwrap_or_else(|e| {
                        log::error!("Dataset load task failed: {}", e);
                        Err(Arc::new(LoadError::TaskFailed(e.to_string())))
                    })
                }
                .boxed()
                .shared()
            })
            .clone()
    }
}

async fn read_and_parse(source: Arc<dyn DatasetSource>) -> LoadOutcome {
    let name = source.name();
    let start = Instant::now();
    log::info!("Loading dataset from {}", name);

    let result = match source.read().await {
        Ok(text) => parse_dataset(&text, &name).map(Dataset::from_records),
        Err(e) => Err(e),
    };

    match result {
        Ok(dataset) => {
            log::info!(
                "Loaded {} records from {} in {}ms",
                dataset.len(),
                name,
                start.elapsed().as_millis()
            );
            Ok(Arc::new(dataset))
        }
        Err(e) => {
            log::error!("Failed to load dataset from {}: {}", name, e);
            Err(Arc::new(e))
        }
    }
}
