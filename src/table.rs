//! Table widget facade.
//!
//! A [`Table`] is one mounted widget: its view-state engine, its layout
//! engine and the persistence adapter they write through. Every operation a
//! UI wires to an event lives here, and every applied mutation is persisted
//! before the call returns.

use crate::config::{ConfigError, TableConfig};
use crate::engine::{Completion, LoadPhase, Mutation, PageMove, ViewEngine};
use crate::layout::{
    CommittedWidths, LayoutEngine, PointerEvent, SyntheticMouse, TableGeometry, TouchEvent,
};
use crate::model::FetchError;
use crate::persistence::{ColumnWidth, PersistKey, StateSnapshot, StateStore};
use crate::projection::{
    body_state, display_value, footer_summary, header_cells, render_grid, BodyState,
    FooterSummary, HeaderView,
};
use crate::source::{DataPayload, DataRequest, DataSource, RequestGeneration};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Table {
    config: TableConfig,
    engine: ViewEngine,
    layout: LayoutEngine,
    store: StateStore,
}

impl Table {
    /// Validate `config`, restore saved state from `store` and issue the
    /// first load.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` when the configuration is invalid.
    pub fn new(config: TableConfig, store: StateStore) -> Result<Self, ConfigError> {
        config.validate()?;

        let restored = store.restore(&config);
        let layout = LayoutEngine::new(
            restored.column_widths.clone(),
            restored.width,
            config.column_min_width,
            config.editable,
        );
        let mut engine = ViewEngine::new(&config, restored);
        engine.request_data();

        info!(
            table = %config.id,
            columns = config.columns.len(),
            load_all_data = config.load_all_data,
            "Table initialized"
        );
        Ok(Self {
            config,
            engine,
            layout,
            store,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn engine(&self) -> &ViewEngine {
        &self.engine
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn set_data_callback(&mut self, callback: impl FnMut(&mut DataPayload) + 'static) {
        self.engine.set_data_callback(callback);
    }

    pub fn set_error_callback(&mut self, callback: impl FnMut(&FetchError) + 'static) {
        self.engine.set_error_callback(callback);
    }

    // ===== Loading =====

    pub fn take_request(&mut self) -> Option<DataRequest> {
        self.engine.take_request()
    }

    pub fn complete(
        &mut self,
        generation: RequestGeneration,
        result: Result<DataPayload, FetchError>,
    ) -> Completion {
        self.engine.complete(generation, result)
    }

    /// Serve pending loads from `source` until none is left. Returns the
    /// completion of the last one served.
    pub fn run_pending(&mut self, source: &mut impl DataSource) -> Option<Completion> {
        let mut last = None;
        while let Some(request) = self.engine.take_request() {
            let result = source.fetch(&request);
            last = Some(self.engine.complete(request.generation, result));
        }
        last
    }

    // ===== View-state mutations =====

    fn apply(&mut self, mutation: Mutation) -> bool {
        if mutation.is_applied() {
            let snapshot = self.snapshot();
            self.store.persist(mutation.persist_keys(), &snapshot);
        }
        mutation.is_applied()
    }

    pub fn refresh(&mut self) -> bool {
        let mutation = self.engine.refresh();
        self.apply(mutation)
    }

    pub fn set_search_query(&mut self, query: &str) -> bool {
        let mutation = self.engine.set_search_query(query);
        self.apply(mutation)
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) -> bool {
        let mutation = self.engine.set_items_per_page(items_per_page);
        self.apply(mutation)
    }

    pub fn change_page(&mut self, page: usize) -> bool {
        let mutation = self.engine.change_page(page);
        self.apply(mutation)
    }

    pub fn move_to_page(&mut self, direction: PageMove, to_end: bool) -> bool {
        let mutation = self.engine.move_to_page(direction, to_end);
        self.apply(mutation)
    }

    /// Header click on `field`. Read-only tables ignore it.
    pub fn on_header_click(&mut self, field: &str, multi_key: bool) -> bool {
        if !self.config.editable {
            return false;
        }
        let Some(kind) = self.engine.column(field).map(|c| c.kind()) else {
            debug!(field, "Header click on unknown column");
            return false;
        };
        let mutation = self.engine.toggle_sort(field, kind, multi_key);
        self.apply(mutation)
    }

    // ===== Layout =====

    pub fn mount(&mut self, geometry: &TableGeometry) -> bool {
        self.layout.mount(geometry)
    }

    /// Stop handling input and drop any drag in progress.
    pub fn destroy(&mut self) {
        self.layout.destroy();
        debug!(table = %self.config.id, "Table destroyed");
    }

    pub fn update_layout(&mut self) {
        self.layout.update_layout();
    }

    pub fn on_viewport_resize(&mut self, container_client_width: f64) -> bool {
        self.layout.on_viewport_resize(container_client_width)
    }

    pub fn on_scroll(&mut self, scroll_left: f64) -> bool {
        self.layout.on_scroll(scroll_left)
    }

    pub fn on_header_mouse_down(&mut self, event: &PointerEvent) -> bool {
        self.layout.on_header_mouse_down(event)
    }

    pub fn on_mouse_move(&mut self, event: &PointerEvent, now: Instant) -> bool {
        self.layout.on_mouse_move(event, now)
    }

    pub fn poll_timer(&mut self, now: Instant) -> bool {
        self.layout.poll_timer(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.layout.next_deadline()
    }

    /// End a drag and persist the new widths.
    pub fn on_mouse_up(&mut self) -> Option<CommittedWidths> {
        let committed = self.layout.on_mouse_up()?;
        self.persist_widths();
        Some(committed)
    }

    /// Feed a touch event to the layout. A tap comes back as `Click` for the
    /// host to dispatch to the element under the finger.
    pub fn handle_touch(&mut self, event: &TouchEvent, now: Instant) -> Option<SyntheticMouse> {
        let outcome = self.layout.handle_touch(event, now)?;
        if outcome.committed.is_some() {
            self.persist_widths();
        }
        Some(outcome.mouse)
    }

    fn persist_widths(&mut self) {
        let mut keys = vec![PersistKey::Width];
        keys.extend(
            self.config
                .columns
                .iter()
                .map(|c| PersistKey::ColumnWidth(c.field().to_string())),
        );
        let snapshot = self.snapshot();
        self.store.persist(&keys, &snapshot);
    }

    // ===== Projection =====

    /// Full state as a snapshot sink would receive it.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            items_per_page: self.engine.items_per_page(),
            current_start_item: self.engine.current_start_item(),
            search_query: self.engine.search_query().to_string(),
            width: self.layout.width(),
            sorting: self.engine.sorting().clone(),
            column_widths: self
                .config
                .columns
                .iter()
                .zip(self.layout.column_widths())
                .map(|(column, width)| ColumnWidth {
                    field: column.field().to_string(),
                    width: *width,
                })
                .collect(),
        }
    }

    pub fn header(&self) -> Vec<HeaderView> {
        header_cells(self.engine.columns(), self.engine.sorting(), self.config.editable)
    }

    pub fn body(&self) -> BodyState<'_> {
        body_state(
            self.engine.phase(),
            self.engine.filtered_total(),
            &self.config.resources,
        )
    }

    /// Display strings of the visible page, one row per record.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let formats = self.engine.formats();
        self.engine
            .visible_page()
            .into_iter()
            .map(|record| {
                self.engine
                    .columns()
                    .iter()
                    .map(|c| display_value(record.get(c.field()), c.kind(), formats))
                    .collect()
            })
            .collect()
    }

    /// Footer contents. `None` while loading or after a failed load.
    pub fn footer(&self) -> Option<FooterSummary> {
        if matches!(self.engine.phase(), LoadPhase::Loading | LoadPhase::Error) {
            return None;
        }
        Some(footer_summary(
            &self.config.resources,
            self.engine.current_start_item(),
            self.engine.items_per_page(),
            self.engine.filtered_total(),
            self.engine.page_total(),
            self.config.page_dropdown,
        ))
    }

    /// The visible page as a text grid followed by the footer line.
    pub fn render_text(&self) -> String {
        let headers: Vec<String> = self.header().iter().map(HeaderView::text).collect();
        let mut out = match self.body() {
            BodyState::Rows => render_grid(&headers, &self.rows()),
            BodyState::Loading => render_grid(&headers, &[]) + "...\n",
            BodyState::NoData(message) => render_grid(&headers, &[]) + message + "\n",
            BodyState::Error { message, retry } => {
                format!("{}{} ({})\n", render_grid(&headers, &[]), message, retry)
            }
        };
        if let Some(footer) = self.footer() {
            out.push('\n');
            out.push_str(&footer.showing);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
