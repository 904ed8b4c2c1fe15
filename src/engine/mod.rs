//! View-state engine.
//!
//! Owns the record set, sort spec, search query and pagination cursor of one
//! table, and derives the visible page from them after every mutation:
//!
//! ```text
//! ingest → coerce → sort → filter by query → slice page
//! ```
//!
//! While a load is in flight every mutating operation is a no-op. A load is a
//! [`DataRequest`] ticket handed out by [`ViewEngine::take_request`]; only the
//! completion carrying the latest generation is applied.

pub mod coerce;
pub mod compare;

pub use coerce::CoercionPlan;
pub use compare::{compare_records, default_compare, matches_query, sort_records};

use crate::config::TableConfig;
use crate::format::Formats;
use crate::model::{ColumnKind, ColumnSpec, FetchError, Record, SortSpec};
use crate::persistence::{PersistKey, RestoredState};
use crate::source::{DataPayload, DataRequest, QueryParams, RequestGeneration};
use std::fmt;
use tracing::{debug, info, warn};

// ===== Phase and outcomes =====

/// Load phase of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Constructed, no load issued yet.
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last load failed. Left only through `refresh`.
    Error,
}

/// Result of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use]
pub struct Mutation {
    applied: bool,
    persist: Vec<PersistKey>,
}

impl Mutation {
    /// The operation was rejected and changed nothing.
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn applied(persist: Vec<PersistKey>) -> Self {
        Self {
            applied: true,
            persist,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Values that changed and must be written back.
    pub fn persist_keys(&self) -> &[PersistKey] {
        &self.persist
    }
}

/// What happened to a reported completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Rows were ingested.
    Ingested,
    /// The table moved to the `Error` phase.
    Failed,
    /// A newer request superseded this one; nothing changed.
    Stale,
}

/// Direction for [`ViewEngine::move_to_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Back,
    Forward,
}

// ===== Hooks =====

/// Sees and may rewrite each payload before coercion.
pub type DataCallback = Box<dyn FnMut(&mut DataPayload)>;

/// Told about each failed load.
pub type ErrorCallback = Box<dyn FnMut(&FetchError)>;

#[derive(Default)]
struct Hooks {
    data: Option<DataCallback>,
    error: Option<ErrorCallback>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("data", &self.data.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

// ===== Engine =====

#[derive(Debug)]
pub struct ViewEngine {
    columns: Vec<ColumnSpec>,
    plan: CoercionPlan,
    formats: Formats,
    load_all_data: bool,
    method: String,
    url: String,

    /// Everything in load-all mode, the current page otherwise. `None` until
    /// the first load lands.
    records: Option<Vec<Record>>,
    sorting: SortSpec,
    search_query: String,
    items_per_page: usize,
    current_start_item: usize,
    filtered_total: usize,
    page_total: usize,
    /// Positions in `records` of the visible page, in display order.
    visible: Vec<usize>,

    phase: LoadPhase,
    last_error: Option<FetchError>,
    generation: RequestGeneration,
    in_flight: Option<RequestGeneration>,
    pending: Option<DataRequest>,
    hooks: Hooks,
}

impl ViewEngine {
    /// Engine in the `Idle` phase with restored state.
    ///
    /// A restored start item that is not a multiple of the page size snaps
    /// down to the start of its page.
    pub fn new(config: &TableConfig, restored: RestoredState) -> Self {
        let items_per_page = restored.items_per_page.max(1);
        let current_start_item =
            restored.current_start_item / items_per_page * items_per_page;

        Self {
            columns: config.columns.clone(),
            plan: CoercionPlan::new(&config.columns),
            formats: config.formats.clone(),
            load_all_data: config.load_all_data,
            method: config.request_method.clone(),
            url: config.url.clone(),
            records: None,
            sorting: restored.sorting,
            search_query: restored.search_query,
            items_per_page,
            current_start_item,
            filtered_total: 0,
            page_total: 0,
            visible: Vec::new(),
            phase: LoadPhase::Idle,
            last_error: None,
            generation: RequestGeneration::default(),
            in_flight: None,
            pending: None,
            hooks: Hooks::default(),
        }
    }

    pub fn set_data_callback(&mut self, callback: impl FnMut(&mut DataPayload) + 'static) {
        self.hooks.data = Some(Box::new(callback));
    }

    pub fn set_error_callback(&mut self, callback: impl FnMut(&FetchError) + 'static) {
        self.hooks.error = Some(Box::new(callback));
    }

    // ===== Accessors =====

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, field: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.field() == field)
    }

    pub fn formats(&self) -> &Formats {
        &self.formats
    }

    pub fn load_all_data(&self) -> bool {
        self.load_all_data
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn sorting(&self) -> &SortSpec {
        &self.sorting
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn current_start_item(&self) -> usize {
        self.current_start_item
    }

    pub fn filtered_total(&self) -> usize {
        self.filtered_total
    }

    pub fn page_total(&self) -> usize {
        self.page_total
    }

    /// 1-based page holding `current_start_item`.
    pub fn current_page(&self) -> usize {
        self.current_start_item / self.items_per_page + 1
    }

    /// Records in their current (sorted) order, if loaded.
    pub fn records(&self) -> Option<&[Record]> {
        self.records.as_deref()
    }

    /// The derived visible page.
    pub fn visible_page(&self) -> Vec<&Record> {
        let Some(records) = &self.records else {
            return Vec::new();
        };
        self.visible.iter().filter_map(|&i| records.get(i)).collect()
    }

    pub fn generation(&self) -> RequestGeneration {
        self.generation
    }

    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    // ===== Loading =====

    /// Issue a new load. Supersedes any load still in flight.
    pub fn request_data(&mut self) -> RequestGeneration {
        self.generation = self.generation.next();
        self.phase = LoadPhase::Loading;
        self.last_error = None;
        self.in_flight = Some(self.generation);

        let params = QueryParams::new(
            self.current_start_item,
            self.items_per_page,
            &self.search_query,
            &self.sorting,
        );
        info!(
            generation = self.generation.get(),
            start_item = params.start_item,
            items = params.items,
            "Requesting table data"
        );
        self.pending = Some(DataRequest {
            generation: self.generation,
            method: self.method.clone(),
            url: self.url.clone(),
            params,
        });
        self.generation
    }

    /// Hand the pending load to the host.
    pub fn take_request(&mut self) -> Option<DataRequest> {
        self.pending.take()
    }

    /// Report the outcome of the load with `generation`.
    pub fn complete(
        &mut self,
        generation: RequestGeneration,
        result: Result<DataPayload, FetchError>,
    ) -> Completion {
        if self.in_flight != Some(generation) {
            debug!(
                generation = generation.get(),
                latest = self.generation.get(),
                "Discarding stale completion"
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(payload) => {
                self.ingest(payload);
                Completion::Ingested
            }
            Err(error) => {
                warn!(generation = generation.get(), error = %error, "Table data request failed");
                self.phase = LoadPhase::Error;
                if let Some(callback) = self.hooks.error.as_mut() {
                    callback(&error);
                }
                self.last_error = Some(error);
                Completion::Failed
            }
        }
    }

    /// Replace the record set with `payload`. Any load still in flight is
    /// superseded.
    pub fn ingest(&mut self, mut payload: DataPayload) {
        if let Some(callback) = self.hooks.data.as_mut() {
            callback(&mut payload);
        }
        self.in_flight = None;
        self.pending = None;

        let records: Vec<Record> = payload
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.plan.record(i, row, &self.formats))
            .collect();
        info!(
            rows = records.len(),
            filtered_total = payload.filtered_total,
            "Ingested table data"
        );

        self.records = Some(records);
        self.filtered_total = payload.filtered_total;
        self.phase = LoadPhase::Ready;
        self.last_error = None;
        self.sort();
        self.recompute(false);
    }

    // ===== Mutations =====

    /// Start over from the first page with a fresh load. Allowed in any phase.
    pub fn refresh(&mut self) -> Mutation {
        self.current_start_item = 0;
        self.request_data();
        Mutation::applied(vec![PersistKey::CurrentStartItem])
    }

    pub fn set_search_query(&mut self, query: &str) -> Mutation {
        if self.reject_while_loading("set_search_query") || self.search_query == query {
            return Mutation::ignored();
        }
        self.search_query = query.to_string();
        self.current_start_item = 0;
        self.recompute(true);
        Mutation::applied(vec![PersistKey::SearchQuery, PersistKey::CurrentStartItem])
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) -> Mutation {
        if self.reject_while_loading("set_items_per_page")
            || items_per_page == 0
            || items_per_page == self.items_per_page
        {
            return Mutation::ignored();
        }
        self.items_per_page = items_per_page;
        self.current_start_item = 0;
        self.recompute(true);
        Mutation::applied(vec![PersistKey::ItemsPerPage, PersistKey::CurrentStartItem])
    }

    /// Go to 1-based `page`. Out-of-range pages are ignored.
    pub fn change_page(&mut self, page: usize) -> Mutation {
        if self.reject_while_loading("change_page") {
            return Mutation::ignored();
        }
        if page == 0 || page > self.page_total {
            debug!(page, page_total = self.page_total, "Ignoring out-of-range page");
            return Mutation::ignored();
        }
        self.current_start_item = (page - 1) * self.items_per_page;
        self.recompute(true);
        Mutation::applied(vec![PersistKey::CurrentStartItem])
    }

    /// Previous/next page, or first/last with `to_end`.
    pub fn move_to_page(&mut self, direction: PageMove, to_end: bool) -> Mutation {
        let current = self.current_page();
        let target = match (direction, to_end) {
            (PageMove::Back, true) => 1,
            (PageMove::Forward, true) => self.page_total,
            (PageMove::Back, false) => current.saturating_sub(1),
            (PageMove::Forward, false) => current + 1,
        };
        self.change_page(target)
    }

    /// Apply a header click on `field`. Unknown and unsortable fields are ignored.
    pub fn toggle_sort(&mut self, field: &str, data_type: ColumnKind, multi_key: bool) -> Mutation {
        if self.reject_while_loading("toggle_sort") {
            return Mutation::ignored();
        }
        if !self.column(field).is_some_and(|c| c.is_sortable()) {
            debug!(field, "Ignoring sort on unknown or unsortable column");
            return Mutation::ignored();
        }
        self.sorting.toggle(field, data_type, multi_key);
        self.current_start_item = 0;
        self.sort();
        self.recompute(true);
        Mutation::applied(vec![PersistKey::Sorting, PersistKey::CurrentStartItem])
    }

    // ===== Derivation =====

    fn reject_while_loading(&self, operation: &'static str) -> bool {
        if self.is_loading() {
            debug!(operation, "Ignoring mutation while loading");
        }
        self.is_loading()
    }

    fn sort(&mut self) {
        if let Some(records) = self.records.as_mut() {
            sort_records(records, &self.sorting);
        }
    }

    /// Re-derive the visible page. With `force_reload` in server mode this
    /// issues a load instead and derivation waits for the ingest.
    fn recompute(&mut self, force_reload: bool) {
        if self.is_loading() {
            return;
        }
        if force_reload && !self.load_all_data {
            self.request_data();
            return;
        }

        let items_per_page = self.items_per_page;
        let Some(records) = &self.records else {
            self.visible.clear();
            self.filtered_total = 0;
            self.page_total = 0;
            return;
        };

        if !self.load_all_data {
            if records.len() > items_per_page {
                warn!(
                    rows = records.len(),
                    items_per_page, "Server returned more rows than a page, truncating"
                );
            }
            self.visible = (0..records.len().min(items_per_page)).collect();
        } else {
            let query = self.search_query.to_lowercase();
            let start = self.current_start_item;
            let end = start.saturating_add(items_per_page);
            let mut matched = 0;
            self.visible.clear();
            for (i, record) in records.iter().enumerate() {
                if query.is_empty() || matches_query(record, &query) {
                    if (start..end).contains(&matched) {
                        self.visible.push(i);
                    }
                    matched += 1;
                }
            }
            self.filtered_total = matched;
        }

        self.page_total = self.filtered_total.div_ceil(items_per_page);
        debug!(
            visible = self.visible.len(),
            filtered_total = self.filtered_total,
            page_total = self.page_total,
            "Recomputed visible page"
        );
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
