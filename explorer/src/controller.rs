use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, LoadError};
use crate::record::{Dataset, check_file_name};
use crate::registry::DatasetRegistry;
use crate::render::{ChartSurface, Point, RenderOutcome, Renderer, ScatterPlot, Tooltip};
use crate::selection::{Role, Selection};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::future::Future;

/// A user-selected file whose text can be read asynchronously.
pub trait FileSource {
    fn name(&self) -> String;
    fn read_text(&self) -> impl Future<Output = anyhow::Result<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    fn success(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

pub const NO_FILES: &str = "No files selected. Please choose at least one TSV file.";
pub const RENDERED: &str = "Chart rendered successfully.";
pub const NO_VALID_DATA: &str = "No valid numeric data found for the selected attributes.";

/// Files of one selection that passed the extension check, waiting to be
/// read. Produced by [`Explorer::begin_load`].
pub struct LoadBatch<F> {
    generation: u64,
    files: Vec<(F, Option<LoadError>)>,
}

/// Text of every file of a batch, in selection order.
pub struct BatchResult {
    generation: u64,
    files: Vec<(String, Result<String, LoadError>)>,
}

impl<F: FileSource> LoadBatch<F> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reads every accepted file concurrently. Completions are stored by
    /// selection index, so the result order never depends on which read
    /// finishes first.
    pub async fn read(self) -> BatchResult {
        let mut slots: Vec<Option<Result<String, LoadError>>> = self
            .files
            .iter()
            .map(|(_, rejected)| rejected.clone().map(Err))
            .collect();

        let mut pending: FuturesUnordered<_> = self
            .files
            .iter()
            .enumerate()
            .filter(|(_, (_, rejected))| rejected.is_none())
            .map(|(index, (file, _))| async move {
                let result = file.read_text().await.map_err(|e| LoadError::Read {
                    file: file.name(),
                    reason: format!("{e:#}"),
                });
                (index, result)
            })
            .collect();

        let mut remaining = pending.len();
        while let Some((index, result)) = pending.next().await {
            remaining -= 1;
            trace!(
                "Read #{index} of generation {} ({remaining} remaining)",
                self.generation
            );
            slots[index] = Some(result);
        }

        let files = self
            .files
            .iter()
            .zip(slots)
            .map(|((file, _), slot)| {
                let name = file.name();
                let result = slot.unwrap_or_else(|| {
                    Err(LoadError::Read {
                        file: name.clone(),
                        reason: "no result".into(),
                    })
                });
                (name, result)
            })
            .collect();

        BatchResult {
            generation: self.generation,
            files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub admitted: usize,
    pub errors: Vec<LoadError>,
    pub render: RenderOutcome,
}

/// What a new file selection turned into.
pub enum BatchStart<F> {
    Reading(LoadBatch<F>),
    /// Nothing could be read, so nothing was changed.
    Done(LoadReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A newer batch was started while this one was being read.
    Stale,
    Loaded(LoadReport),
}

/// Reacts to file selections and attribute changes, keeping the chart in
/// sync with the loaded datasets and the selected attributes.
pub struct Explorer<S> {
    config: ExplorerConfig,
    registry: DatasetRegistry,
    selection: Selection,
    renderer: Renderer<S>,
    status: Vec<StatusMessage>,
    generation: u64,
}

impl<S: ChartSurface> Explorer<S> {
    pub fn new(surface: S, config: ExplorerConfig) -> Self {
        Self {
            config,
            registry: DatasetRegistry::new(),
            selection: Selection::new(),
            renderer: Renderer::new(surface),
            status: Vec::new(),
            generation: 0,
        }
    }

    /// Starts a load batch for a new file selection.
    ///
    /// Files with the wrong extension are rejected here, without reading
    /// them. If no file is left to read, nothing changes apart from the
    /// status. Otherwise the registry is emptied and any batch still being
    /// read becomes stale.
    pub fn begin_load<F: FileSource>(&mut self, files: Vec<F>) -> BatchStart<F> {
        self.status.clear();
        let unchanged = |errors| {
            BatchStart::Done(LoadReport {
                admitted: 0,
                errors,
                render: RenderOutcome::Skipped,
            })
        };
        if files.is_empty() {
            self.status.push(StatusMessage::error(NO_FILES));
            return unchanged(Vec::new());
        }

        let files: Vec<(F, Option<LoadError>)> = files
            .into_iter()
            .map(|file| {
                let rejected =
                    check_file_name(&file.name(), &self.config.accepted_extension).err();
                (file, rejected)
            })
            .collect();

        if files.iter().all(|(_, rejected)| rejected.is_some()) {
            let errors: Vec<LoadError> = files
                .into_iter()
                .filter_map(|(_, rejected)| rejected)
                .collect();
            for error in &errors {
                warn!("{error}");
                self.status.push(StatusMessage::error(error.to_string()));
            }
            return unchanged(errors);
        }

        self.generation += 1;
        self.registry.begin_load_batch();
        info!(
            "Loading {} files (generation {})",
            files.len(),
            self.generation
        );
        BatchStart::Reading(LoadBatch {
            generation: self.generation,
            files,
        })
    }

    /// Admits the datasets of a fully read batch, in selection order, then
    /// resets the selection and renders once.
    pub fn finish_load(&mut self, batch: BatchResult) -> Result<LoadOutcome, ExplorerError> {
        if batch.generation != self.generation {
            debug!(
                "Discarding stale batch {} (current: {})",
                batch.generation, self.generation
            );
            return Ok(LoadOutcome::Stale);
        }

        self.status.clear();
        let mut errors = Vec::new();
        for (name, text) in batch.files {
            let admitted = text
                .and_then(|text| Dataset::parse(&name, &text))
                .and_then(|dataset| self.registry.admit(dataset));
            if let Err(error) = admitted {
                warn!("{error}");
                self.status.push(StatusMessage::error(error.to_string()));
                errors.push(error);
            }
        }
        info!(
            "Loaded {} datasets with attributes {:?}",
            self.registry.len(),
            self.registry.attribute_universe()
        );

        self.selection
            .set_options(self.registry.attribute_universe().iter().cloned());
        if !self.selection.is_complete() {
            self.renderer.dispose()?;
        }
        let render = self.render()?;

        Ok(LoadOutcome::Loaded(LoadReport {
            admitted: self.registry.len(),
            errors,
            render,
        }))
    }

    /// Reads a whole selection and loads it.
    pub async fn load<F: FileSource>(&mut self, files: Vec<F>) -> Result<LoadOutcome, ExplorerError> {
        match self.begin_load(files) {
            BatchStart::Reading(batch) => {
                let result = batch.read().await;
                self.finish_load(result)
            }
            BatchStart::Done(report) => Ok(LoadOutcome::Loaded(report)),
        }
    }

    /// Assigns an attribute to a role and renders once. An unknown attribute
    /// is reported and the previous choice kept.
    pub fn select(&mut self, role: Role, attribute: &str) -> Result<RenderOutcome, ExplorerError> {
        self.status.clear();
        if let Err(e) = self.selection.set(role, attribute) {
            warn!("{e}");
            self.status.push(StatusMessage::error(e.to_string()));
            return Err(e.into());
        }
        Ok(self.render()?)
    }

    /// Renders the current datasets and selection again.
    pub fn refresh(&mut self) -> Result<RenderOutcome, ExplorerError> {
        self.status.clear();
        Ok(self.render()?)
    }

    fn render(&mut self) -> anyhow::Result<RenderOutcome> {
        let outcome = match self.renderer.render(&self.registry, &self.selection) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Failed to render chart: {e:?}");
                self.status
                    .push(StatusMessage::error(format!("Failed to render chart: {e:#}")));
                return Err(e);
            }
        };
        match outcome {
            RenderOutcome::Drawn { .. } => self.status.push(StatusMessage::success(RENDERED)),
            RenderOutcome::NoValidData => self.status.push(StatusMessage::error(NO_VALID_DATA)),
            RenderOutcome::Skipped => (),
        }
        Ok(outcome)
    }

    /// Tooltip of the point under a pixel, highlighting that point.
    pub fn hover(&mut self, x: i32, y: i32) -> Result<Option<Tooltip>, ExplorerError> {
        Ok(self.renderer.hover(x, y)?)
    }

    pub fn click(&self, x: i32, y: i32) -> Option<&Point> {
        self.renderer.click(x, y)
    }

    pub fn status(&self) -> &[StatusMessage] {
        &self.status
    }

    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn plot(&self) -> Option<&ScatterPlot> {
        self.renderer.plot()
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }
}
