//! Table state controller.
//!
//! A [`TableController`] owns the sort, filter, page, selection and expansion
//! state of one table instance. Caller-owned rows and columns are held by
//! `Rc` and never mutated; the controller keeps a view, a list of indices into
//! the caller's rows, exactly like a filtered and sorted view over a parent
//! table.
//!
//! # Local and remote mode
//!
//! In local mode every action recomputes the view synchronously: filters run
//! against the original rows, the active sort is re-applied, and the page
//! window is sliced out at snapshot time. In remote mode the controller only
//! updates its own state and hands a [`FetchRequest`] to the configured
//! [`RemoteSource`]; the rows it later receives are treated as the already
//! filtered, sorted and paged result.
//!
//! # Examples
//!
//! ```
//! use livegrid::{make_row, CellValue, Column, PaginationOptions, TableController, TableOptions};
//! use std::rc::Rc;
//!
//! let rows = Rc::new(vec![
//!     make_row([("id", CellValue::Int(1)), ("name", "b".into())]),
//!     make_row([("id", CellValue::Int(2)), ("name", "a".into())]),
//! ]);
//! let columns = Rc::new(vec![Column::new("id", "ID"), Column::new("name", "Name").sortable()]);
//! let options = TableOptions::new("id").with_pagination(PaginationOptions::with_size(1));
//!
//! let mut table = TableController::new(options, columns, rows).unwrap();
//! table.sort_click("name").unwrap(); // descending first
//! table.sort_click("name").unwrap(); // then ascending
//!
//! let snapshot = table.snapshot();
//! assert_eq!(snapshot.page_count, 2);
//! assert_eq!(snapshot.rows[0].key.as_str(), "2");
//! ```

use crate::column::{validate_columns, Column, RenderedCell, Style};
use crate::error::{Result, TableError};
use crate::expansion::ExpansionState;
use crate::filter::{filter_rows, wire_filters, ColumnFilter, FilterState, FilterValue};
use crate::messages::{FetchRequest, RemoteSource, RequestToken, TableEvent};
use crate::options::TableOptions;
use crate::pagination::{paginate, skip_for, PageLinks, PageSlice, PageSummary};
use crate::selection::{HeaderCheck, Selection};
use crate::sort::{sort_indices, SortOrder, SortState};
use crate::value::{Row, RowKey};
use log::{debug, trace, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Called with `(page, size_per_page)` whenever the page changes
pub type PageHook = Box<dyn FnMut(usize, usize)>;
/// Called with the new selection after every selection change
pub type SelectHook = Box<dyn FnMut(&Selection)>;
/// Produces the expansion content of a row, or `None` for no expansion
pub type ExpandRenderer = Box<dyn Fn(&Row, usize) -> Option<String>>;

/// Whether the table is waiting on a remote fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Idle,
    Mutating,
}

/// Client-side state engine of one data table
pub struct TableController {
    options: TableOptions,
    columns: Rc<Vec<Column>>,
    data: Rc<Vec<Row>>,
    /// View positions to indices into `data`, after filtering and sorting
    view: Vec<usize>,
    sort: SortState,
    filters: FilterState,
    page: usize,
    selection: Option<Selection>,
    expanded: ExpansionState,
    has_run_default_sort: bool,
    status: TableStatus,
    last_token: u64,
    remote_source: Option<Box<dyn RemoteSource>>,
    on_page_change: Option<PageHook>,
    on_select_change: Option<SelectHook>,
    expand_renderer: Option<ExpandRenderer>,
}

impl fmt::Debug for TableController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("options", &self.options)
            .field("rows", &self.data.len())
            .field("view", &self.view.len())
            .field("sort", &self.sort)
            .field("page", &self.page)
            .field("selection", &self.selection)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl TableController {
    /// Create a controller and derive the first view.
    ///
    /// Fails fast on an empty key field or malformed columns.
    pub fn new(options: TableOptions, columns: Rc<Vec<Column>>, data: Rc<Vec<Row>>) -> Result<Self> {
        if options.key_field.is_empty() {
            return Err(TableError::EmptyKeyField);
        }
        validate_columns(&columns)?;

        let page = options
            .pagination
            .as_ref()
            .and_then(|p| p.page)
            .filter(|&p| p > 0)
            .unwrap_or(1);
        let selection = options.select_row.as_ref().map(|s| Selection::new(s.mode));

        let mut controller = TableController {
            sort: SortState::from_columns(&columns, &options.default_sorted),
            filters: FilterState::from_columns(&columns),
            options,
            columns,
            data,
            view: Vec::new(),
            page,
            selection,
            expanded: ExpansionState::new(),
            has_run_default_sort: false,
            status: TableStatus::Idle,
            last_token: 0,
            remote_source: None,
            on_page_change: None,
            on_select_change: None,
            expand_renderer: None,
        };
        controller.rebuild_view();
        Ok(controller)
    }

    pub fn with_remote_source<S>(mut self, source: S) -> Self
    where
        S: RemoteSource + 'static,
    {
        self.remote_source = Some(Box::new(source));
        self
    }

    pub fn on_page_change<F>(mut self, hook: F) -> Self
    where
        F: FnMut(usize, usize) + 'static,
    {
        self.on_page_change = Some(Box::new(hook));
        self
    }

    pub fn on_select_change<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Selection) + 'static,
    {
        self.on_select_change = Some(Box::new(hook));
        self
    }

    pub fn with_expand_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&Row, usize) -> Option<String> + 'static,
    {
        self.expand_renderer = Some(Box::new(renderer));
        self
    }

    // === Accessors ===

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn columns(&self) -> &Rc<Vec<Column>> {
        &self.columns
    }

    pub fn data(&self) -> &Rc<Vec<Row>> {
        &self.data
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn status(&self) -> TableStatus {
        self.status
    }

    /// Number of rows after filtering, before paging
    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Rows after filtering and sorting, before paging
    pub fn view_rows(&self) -> impl Iterator<Item = &Row> {
        self.view.iter().map(move |&i| &self.data[i])
    }

    /// The current page window over the view
    pub fn page_slice(&self) -> PageSlice {
        let pagination = self.options.pagination.as_ref();
        paginate(
            self.view.len(),
            self.page,
            self.options.size_per_page(),
            pagination.and_then(|p| p.total_size),
            self.options.remote,
        )
    }

    /// Rows visible on the current page
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.view[self.page_slice().range]
            .iter()
            .map(|&i| &self.data[i])
            .collect()
    }

    pub fn visible_keys(&self) -> Vec<RowKey> {
        self.visible_rows()
            .into_iter()
            .map(|row| RowKey::of(row, &self.options.key_field))
            .collect()
    }

    fn column(&self, field: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.data_field == field)
            .ok_or_else(|| TableError::unknown_column(field))
    }

    // === View derivation ===

    /// Re-derive the view from the original rows with the current state.
    fn rebuild_view(&mut self) {
        if self.options.remote {
            self.view = (0..self.data.len()).collect();
            return;
        }

        self.view = filter_rows(&self.data, &self.filters);

        if !self.has_run_default_sort {
            self.has_run_default_sort = true;
            for directive in &self.options.default_sorted {
                sort_indices(&mut self.view, &self.data, &directive.data_field, directive.effective_order());
            }
        } else if let Some((field, order)) = self.sort.active() {
            sort_indices(&mut self.view, &self.data, field, order);
        }

        trace!(
            "view rebuilt: {} of {} rows pass {} active filters",
            self.view.len(),
            self.data.len(),
            self.filters.active_count()
        );
    }

    // === Reconciliation with caller props ===

    /// Adopt a new dataset. Returns `false` when `data` is the dataset already
    /// held (same allocation), in which case nothing changes.
    pub fn set_data(&mut self, data: Rc<Vec<Row>>) -> bool {
        if Rc::ptr_eq(&self.data, &data) {
            return false;
        }
        debug!("new dataset with {} rows", data.len());
        self.data = data;
        self.status = TableStatus::Idle;
        self.prune_expansions();
        self.rebuild_view();
        true
    }

    /// Adopt the response to a remote fetch. Responses to anything but the
    /// latest request are stale and discarded.
    pub fn deliver(&mut self, token: RequestToken, data: Rc<Vec<Row>>) -> bool {
        if token.0 != self.last_token {
            warn!(
                "discarding stale response for request {} (latest is {})",
                token.0, self.last_token
            );
            return false;
        }
        self.set_data(data)
    }

    /// Adopt a new column set, re-deriving filter and sort state from it.
    pub fn set_columns(&mut self, columns: Rc<Vec<Column>>) -> Result<bool> {
        if Rc::ptr_eq(&self.columns, &columns) {
            return Ok(false);
        }
        validate_columns(&columns)?;
        debug!("new column set with {} columns", columns.len());
        self.sort = SortState::from_columns(&columns, &self.options.default_sorted);
        self.filters = FilterState::from_columns(&columns);
        self.columns = columns;
        self.rebuild_view();
        Ok(true)
    }

    /// Follow a caller-controlled page number.
    pub fn set_page_prop(&mut self, page: Option<usize>) {
        if let Some(page) = page.filter(|&p| p > 0 && p != self.page) {
            debug!("page prop moved to {}", page);
            self.page = page;
        }
    }

    // === Transitions ===

    /// Header click on `field`: toggle its direction and clear all others.
    /// Clicks on non-sortable columns are ignored.
    pub fn sort_click(&mut self, field: &str) -> Result<()> {
        if !self.column(field)?.sortable {
            debug!("ignoring sort click on non-sortable column '{}'", field);
            return Ok(());
        }

        let order = self.sort.toggle(field);
        debug!("sort '{}' {}", field, order.as_str());

        if self.options.remote {
            self.request_remote();
        } else {
            sort_indices(&mut self.view, &self.data, field, order);
        }
        Ok(())
    }

    /// Change the value of the filter on `field`.
    pub fn filter_change(&mut self, field: &str, value: FilterValue) -> Result<()> {
        self.column(field)?;
        self.filters.set_value(field, value)?;
        debug!("filter '{}' changed, {} active", field, self.filters.active_count());

        if self.options.remote {
            self.request_remote();
        } else {
            self.rebuild_view();
        }
        Ok(())
    }

    /// Move to `page`. Pages past the end are allowed and render empty.
    pub fn page_change(&mut self, page: usize) -> Result<()> {
        if page == 0 {
            return Err(TableError::InvalidPage { page });
        }
        debug!("page {} -> {}", self.page, page);
        self.page = page;

        let size = self.options.size_per_page();
        if let Some(hook) = self.on_page_change.as_mut() {
            hook(page, size);
        }

        if self.options.remote {
            self.request_remote();
        }

        let clear = self
            .options
            .select_row
            .as_ref()
            .is_some_and(|s| s.clear_on_page_change);
        if clear {
            self.clear_selection();
        }
        Ok(())
    }

    /// Toggle one row's selection. Returns `false` when selection is disabled.
    pub fn select_one(&mut self, key: RowKey) -> bool {
        match self.selection.as_mut() {
            Some(selection) => selection.toggle_one(key),
            None => return false,
        }
        self.notify_selection();
        true
    }

    /// Select-all checkbox: clear a non-empty selection, otherwise select
    /// every row on the current page.
    pub fn select_all(&mut self) -> bool {
        let visible = self.visible_keys();
        match self.selection.as_mut() {
            Some(selection) => selection.toggle_all(visible),
            None => return false,
        }
        self.notify_selection();
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        match self.selection.as_mut() {
            Some(selection) => selection.clear(),
            None => return false,
        }
        self.notify_selection();
        true
    }

    /// Replace the selection from outside without notifying the hook.
    pub fn set_selected<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = RowKey>,
    {
        if let Some(selection) = self.selection.as_mut() {
            selection.replace(keys);
        }
    }

    /// Click on a row body: select it when click-to-select is on, and toggle
    /// its expansion when rows expand.
    pub fn row_click(&mut self, key: RowKey) {
        let click_to_select = self
            .options
            .select_row
            .as_ref()
            .is_some_and(|s| s.click_to_select);
        if click_to_select {
            self.select_one(key.clone());
        }
        if self.expand_renderer.is_some() {
            let open = self.expanded.toggle(key);
            trace!("row expansion now {}", if open { "open" } else { "closed" });
        }
    }

    /// Open or close the expansion of every visible row.
    pub fn expand_all(&mut self, open: bool) {
        let keys = self.visible_keys();
        self.expanded.set(&keys, open);
    }

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.expanded.is_open(key)
    }

    /// Number of rows currently expanded
    pub fn expanded_count(&self) -> usize {
        self.expanded.open_count()
    }

    /// Forget expansions of rows that left the dataset.
    fn prune_expansions(&mut self) {
        if self.expanded.open_count() == 0 {
            return;
        }
        let present: HashSet<RowKey> = self
            .data
            .iter()
            .map(|row| RowKey::of(row, &self.options.key_field))
            .collect();
        self.expanded.retain_present(&present);
        trace!("{} expanded rows kept after reload", self.expanded.open_count());
    }

    /// Apply a user action coming from the renderer.
    pub fn dispatch(&mut self, event: TableEvent) -> Result<()> {
        match event {
            TableEvent::SortClick { field } => self.sort_click(&field)?,
            TableEvent::FilterChange { field, value } => self.filter_change(&field, value)?,
            TableEvent::PageChange { page } => self.page_change(page)?,
            TableEvent::SelectOne { key } => {
                self.select_one(key);
            }
            TableEvent::SelectAll => {
                self.select_all();
            }
            TableEvent::ClearSelection => {
                self.clear_selection();
            }
            TableEvent::RowClick { key } => self.row_click(key),
            TableEvent::ExpandAll { open } => self.expand_all(open),
        }
        Ok(())
    }

    fn notify_selection(&mut self) {
        if let (Some(selection), Some(hook)) = (self.selection.as_ref(), self.on_select_change.as_mut()) {
            hook(selection);
        }
    }

    /// Parameters a remote fetch would use for the current state
    pub fn fetch_request(&self) -> FetchRequest {
        let limit = self.options.size_per_page();
        FetchRequest {
            limit,
            skip: skip_for(self.page, limit),
            sort: self.sort.clone(),
            filter: wire_filters(&self.filters),
            token: RequestToken(self.last_token),
        }
    }

    fn request_remote(&mut self) {
        self.last_token += 1;
        let request = self.fetch_request();

        match self.remote_source.as_mut() {
            Some(source) => {
                debug!(
                    "remote fetch #{}: limit {} skip {}",
                    request.token.0, request.limit, request.skip
                );
                self.status = TableStatus::Mutating;
                source.fetch(&request);
            }
            None => warn!("remote table has no data source; fetch #{} dropped", request.token.0),
        }
    }

    // === Output ===

    /// Everything the renderer needs for the current state.
    pub fn snapshot(&self) -> TableSnapshot<'_> {
        let slice = self.page_slice();
        let has_selection_column = self.selection.is_some();
        let offset = skip_for(self.page, self.options.size_per_page());

        let rows: Vec<RowView<'_>> = self.view[slice.range.clone()]
            .iter()
            .enumerate()
            .map(|(position, &data_index)| {
                // Absolute index across pages
                let row_index = offset + position;
                let row = &self.data[data_index];
                let key = RowKey::of(row, &self.options.key_field);
                let expanded = self.expanded.is_open(&key);
                let cells = self
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| {
                        let col_index = if has_selection_column { i + 1 } else { i };
                        column.render_cell(row, row_index, col_index, expanded)
                    })
                    .collect();

                RowView {
                    selected: self.selection.as_ref().is_some_and(|s| s.contains(&key)),
                    number: self.options.show_index.then_some(row_index + 1),
                    expansion: self.expand_renderer.as_ref().and_then(|r| r(row, row_index)),
                    key,
                    index: position,
                    row,
                    expanded,
                    cells,
                }
            })
            .collect();

        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let (classes, style) = column.render_header(i);
                ColumnHeader {
                    field: column.data_field.clone(),
                    text: column.text.clone(),
                    sortable: column.sortable,
                    sort: self.sort.get(&column.data_field),
                    filter: self.filters.get(&column.data_field).cloned(),
                    classes,
                    style,
                }
            })
            .collect();

        let pagination = self.options.pagination.as_ref().filter(|p| p.size_per_page > 0);
        let page_links = pagination.and_then(|p| {
            if p.hide_page_list_only_one_page && slice.page_count == 1 {
                None
            } else {
                Some(PageLinks::compute(self.page, slice.page_count))
            }
        });
        let summary = pagination.filter(|p| p.show_total).map(|p| {
            PageSummary::compute(
                self.page,
                rows.len(),
                p.size_per_page,
                p.total_size.unwrap_or(self.view.len()),
            )
        });

        TableSnapshot {
            header_check: self.selection.as_ref().and_then(|s| s.header_check(rows.len())),
            selected_count: self.selection.as_ref().map_or(0, Selection::len),
            rows,
            columns,
            page: self.page,
            page_count: slice.page_count,
            page_links,
            summary,
            total_rows: self.view.len(),
            status: self.status,
        }
    }
}

/// One visible row, ready to render
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView<'a> {
    pub key: RowKey,
    /// Position within the page
    pub index: usize,
    /// 1-based row number across pages, when the index column is shown
    pub number: Option<usize>,
    pub row: &'a Row,
    pub selected: bool,
    pub expanded: bool,
    pub cells: Vec<RenderedCell>,
    /// Expansion content, when the row expands
    pub expansion: Option<String>,
}

/// Header state of one column
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    pub field: String,
    pub text: String,
    pub sortable: bool,
    pub sort: SortOrder,
    /// Filter definition with its current value
    pub filter: Option<ColumnFilter>,
    pub classes: String,
    pub style: Style,
}

/// Output of one render cycle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot<'a> {
    pub rows: Vec<RowView<'a>>,
    pub columns: Vec<ColumnHeader>,
    /// `None` without checkbox selection
    pub header_check: Option<HeaderCheck>,
    pub selected_count: usize,
    pub page: usize,
    pub page_count: usize,
    /// `None` when pagination is off or the list is hidden
    pub page_links: Option<PageLinks>,
    pub summary: Option<PageSummary>,
    /// Rows in the view before paging
    pub total_rows: usize,
    pub status: TableStatus,
}

impl TableSnapshot<'_> {
    /// True when the renderer should show its "no data" state
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.key.as_str()).collect()
    }
}
