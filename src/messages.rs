//! Message types exchanged with the outside world: user actions coming in
//! from the renderer and fetch requests going out to a remote data source.

use crate::filter::FilterValue;
use crate::sort::SortState;
use crate::value::RowKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User actions forwarded by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TableEvent {
    /// Header of a sortable column clicked
    SortClick { field: String },

    /// Filter input of a column changed
    FilterChange { field: String, value: FilterValue },

    /// Page link clicked
    PageChange { page: usize },

    /// Row checkbox or radio clicked
    SelectOne { key: RowKey },

    /// Select-all header checkbox clicked
    SelectAll,

    /// Selection reset requested
    ClearSelection,

    /// Row body clicked
    RowClick { key: RowKey },

    /// Open or close every visible row expansion
    ExpandAll { open: bool },
}

/// Identifies one remote fetch; later requests carry larger tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(pub u64);

/// Parameters handed to a remote data source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchRequest {
    /// Page size; 0 when pagination is disabled
    pub limit: usize,
    pub skip: usize,
    pub sort: SortState,
    /// Raw filter value per field, `null` when empty
    pub filter: BTreeMap<String, Option<FilterValue>>,
    pub token: RequestToken,
}

/// Receiver of fetch requests in remote mode.
///
/// Invocation is fire-and-forget; results come back through
/// `TableController::deliver` or `TableController::set_data`.
pub trait RemoteSource {
    fn fetch(&mut self, request: &FetchRequest);
}

impl<F> RemoteSource for F
where
    F: FnMut(&FetchRequest),
{
    fn fetch(&mut self, request: &FetchRequest) {
        self(request)
    }
}
