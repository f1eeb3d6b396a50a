//! Debounced background filtering.
//!
//! [`DeferredEntryFilter`] stores filter inputs synchronously so the caller
//! can read them back immediately, while a tokio task recomputes the filtered
//! list once the inputs have been quiet for the debounce window. Every
//! published [`FilteredSnapshot`] equals [`filter_entries`] over the inputs
//! of its generation.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use trace_core::logging;
use trace_core::{Clock, Entry, Error, Result, ViewConfig};

use crate::filter::{filter_entries, EntryFilter};

/// Filtered entries computed from one generation of inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSnapshot {
    /// Input generation the entries were computed from. Starts at 0 and
    /// increases by one per input change.
    pub generation: u64,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct FilterInputs {
    generation: u64,
    entries: Arc<Vec<Entry>>,
    criteria: EntryFilter,
    search: String,
    clock: Clock,
}

impl FilterInputs {
    fn compute(&self) -> FilteredSnapshot {
        FilteredSnapshot {
            generation: self.generation,
            entries: filter_entries(&self.entries, &self.criteria, &self.search, &self.clock),
        }
    }
}

/// Handle to a running deferred filter task.
///
/// Dropping the handle stops the task.
pub struct DeferredEntryFilter {
    inputs_tx: watch::Sender<FilterInputs>,
    output_rx: watch::Receiver<FilteredSnapshot>,
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl DeferredEntryFilter {
    /// Start a filter task over `entries`. Must be called inside a tokio runtime.
    ///
    /// The generation 0 snapshot is computed before returning.
    pub fn spawn(entries: Vec<Entry>, criteria: EntryFilter, debounce: Duration, clock: Clock) -> Self {
        let inputs = FilterInputs {
            generation: 0,
            entries: Arc::new(entries),
            criteria,
            search: String::new(),
            clock,
        };
        let initial = inputs.compute();

        let (inputs_tx, inputs_rx) = watch::channel(inputs);
        let (output_tx, output_rx) = watch::channel(initial);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(run(inputs_rx, output_tx, shutdown_rx, debounce));

        Self {
            inputs_tx,
            output_rx,
            shutdown_tx,
            task: Some(task),
        }
    }

    /// Start with the debounce window and archive visibility from `config`.
    pub fn from_config(config: &ViewConfig, entries: Vec<Entry>, clock: Clock) -> Self {
        let criteria = EntryFilter::new().show_archived(config.show_archived);
        Self::spawn(entries, criteria, config.filter_debounce(), clock)
    }

    // =========================================================================
    // INPUTS
    // =========================================================================

    pub fn set_criteria(&self, criteria: EntryFilter) -> Result<()> {
        self.update(|inputs| inputs.criteria = criteria)
    }

    pub fn set_search(&self, search: impl Into<String>) -> Result<()> {
        let search = search.into();
        self.update(|inputs| inputs.search = search)
    }

    pub fn set_entries(&self, entries: Vec<Entry>) -> Result<()> {
        self.update(|inputs| inputs.entries = Arc::new(entries))
    }

    pub fn set_clock(&self, clock: Clock) -> Result<()> {
        self.update(|inputs| inputs.clock = clock)
    }

    fn update(&self, apply: impl FnOnce(&mut FilterInputs)) -> Result<()> {
        if self.inputs_tx.is_closed() {
            return Err(Error::TaskClosed("deferred filter".to_string()));
        }
        self.inputs_tx.send_modify(|inputs| {
            apply(inputs);
            inputs.generation += 1;
        });
        Ok(())
    }

    /// Criteria as last set, before any recomputation.
    pub fn current_criteria(&self) -> EntryFilter {
        self.inputs_tx.borrow().criteria.clone()
    }

    pub fn current_search(&self) -> String {
        self.inputs_tx.borrow().search.clone()
    }

    /// Generation of the latest inputs.
    pub fn generation(&self) -> u64 {
        self.inputs_tx.borrow().generation
    }

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Most recently published result, possibly for older inputs.
    pub fn snapshot(&self) -> FilteredSnapshot {
        self.output_rx.borrow().clone()
    }

    /// Receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<FilteredSnapshot> {
        self.output_rx.clone()
    }

    /// Wait until the result for the latest inputs is published.
    pub async fn settled(&self) -> Result<FilteredSnapshot> {
        let target = self.generation();
        let mut rx = self.output_rx.clone();
        let snapshot = rx
            .wait_for(|s| s.generation >= target)
            .await
            .map_err(|_| Error::TaskClosed("deferred filter".to_string()))?;
        Ok(snapshot.clone())
    }

    /// Stop the task and wait for it to exit. Later input updates fail with
    /// [`Error::TaskClosed`].
    pub async fn shutdown(&mut self) -> Result<()> {
        // Already stopped when the receiver is gone.
        let _ = self.shutdown_tx.send(()).await;
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| Error::Internal(format!("Deferred filter task failed: {}", e)))?;
        }
        Ok(())
    }
}

async fn run(
    mut inputs_rx: watch::Receiver<FilterInputs>,
    output_tx: watch::Sender<FilteredSnapshot>,
    mut shutdown_rx: mpsc::Receiver<()>,
    debounce: Duration,
) {
    info!(
        { logging::COMPONENT } = "deferred_filter",
        debounce_ms = debounce.as_millis() as u64,
        "Deferred filter started"
    );

    'outer: loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            changed = inputs_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        // Restart the window on every change until inputs go quiet.
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break 'outer,
                changed = inputs_rx.changed() => {
                    if changed.is_err() {
                        break 'outer;
                    }
                }
                _ = sleep(debounce) => break,
            }
        }

        let inputs = inputs_rx.borrow_and_update().clone();
        let snapshot = inputs.compute();
        debug!(
            { logging::GENERATION } = snapshot.generation,
            { logging::INPUT_COUNT } = inputs.entries.len(),
            { logging::RESULT_COUNT } = snapshot.entries.len(),
            "Published filtered snapshot"
        );
        output_tx.send_replace(snapshot);
    }

    info!({ logging::COMPONENT } = "deferred_filter", "Deferred filter stopped");
}
