//! Browse session: the working set of one listing view.
//!
//! Every load is tagged with a ticket. Only the result carrying the most
//! recent ticket is applied; anything older, or anything arriving after
//! teardown, is dropped.

use tracing::{debug, warn};

use crate::backend::{BackendClient, BackendError};
use crate::listings::{filter, Facets, FilterCriteria, FilterField, ListingKind, ListingRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct BrowseSession {
    kind: ListingKind,
    generation: u64,
    phase: LoadPhase,
    records: Vec<ListingRecord>,
    filtered: Vec<ListingRecord>,
    criteria: FilterCriteria,
    facets: Facets,
    torn_down: bool,
}

impl BrowseSession {
    pub fn new(kind: ListingKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_criteria(kind: ListingKind, criteria: FilterCriteria) -> Self {
        Self {
            kind,
            criteria,
            ..Default::default()
        }
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn has_error(&self) -> bool {
        self.phase == LoadPhase::Failed
    }

    /// Every record of the last applied load.
    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    /// Records satisfying the applied criteria.
    pub fn filtered(&self) -> &[ListingRecord] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Whether the working set has to be fetched before it can be shown:
    /// nothing was loaded for the current kind yet, or the last load failed.
    pub fn needs_load(&self) -> bool {
        matches!(self.phase, LoadPhase::Idle | LoadPhase::Failed)
    }

    /// Switch the listing type. Returns whether it changed; a change
    /// discards the current working set and needs a fresh load.
    pub fn set_kind(&mut self, kind: ListingKind) -> bool {
        if self.kind == kind {
            return false;
        }
        self.kind = kind;
        self.generation += 1;
        self.clear_working_set();
        self.phase = LoadPhase::Idle;
        true
    }

    /// Start a load for the current kind and return its ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = LoadPhase::Loading;
        self.clear_working_set();
        LoadTicket(self.generation)
    }

    /// Apply the outcome of the load identified by `ticket`.
    ///
    /// Returns `false` when the result is stale and was discarded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<ListingRecord>, BackendError>,
    ) -> bool {
        if self.torn_down || ticket.0 != self.generation {
            debug!("Discarding stale {} load", self.kind.as_str());
            return false;
        }

        match result {
            Ok(records) => {
                self.records = records
                    .into_iter()
                    .filter(|record| record.kind() == self.kind)
                    .collect();
                self.facets = Facets::from_records(&self.records);
                self.filtered = filter(&self.records, &self.criteria);
                self.phase = LoadPhase::Ready;
            }
            Err(e) => {
                warn!("Failed to load {} records: {}", self.kind.as_str(), e);
                self.clear_working_set();
                self.phase = LoadPhase::Failed;
            }
        }
        true
    }

    /// Fetch the collection for the current kind and apply it.
    pub async fn load(&mut self, backend: &BackendClient) -> bool {
        let ticket = self.begin_load();
        let result = backend.load_records(self.kind).await;
        self.finish_load(ticket, result)
    }

    /// Update one criterion without re-filtering.
    pub fn set_criterion(&mut self, field: FilterField, value: &str) {
        self.criteria.set(field, value);
    }

    /// Re-filter the working set with the current criteria.
    pub fn search(&mut self) {
        self.filtered = filter(&self.records, &self.criteria);
    }

    /// Replace the criteria and re-filter.
    pub fn apply(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.search();
    }

    /// Show `criteria` over the current working set. Empty criteria reset the
    /// view; neither case refetches.
    pub fn show(&mut self, criteria: &FilterCriteria) {
        if criteria.is_empty() {
            self.reset();
        } else {
            self.apply(criteria.clone());
        }
    }

    /// Clear every criterion and show the full working set.
    pub fn reset(&mut self) {
        self.criteria.reset();
        self.filtered = self.records.clone();
    }

    /// End the session. In-flight loads are invalidated.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.generation += 1;
    }

    fn clear_working_set(&mut self) {
        self.records.clear();
        self.filtered.clear();
        self.facets = Facets::default();
    }
}
