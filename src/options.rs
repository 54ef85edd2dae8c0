//! Table configuration.
//!
//! Options deserialize from the same JSON shape a front end would pass as
//! props, for example:
//!
//! ```
//! use livegrid::TableOptions;
//!
//! let options = TableOptions::from_json(r#"{
//!     "keyField": "id",
//!     "pagination": {"sizePerPage": 25, "showTotal": true},
//!     "selectRow": {"mode": "radio"},
//!     "defaultSorted": [{"dataField": "name", "order": "desc"}]
//! }"#).unwrap();
//!
//! assert_eq!(options.key_field, "id");
//! assert_eq!(options.pagination.unwrap().size_per_page, 25);
//! ```

use crate::error::Result;
use crate::pagination::PaginationOptions;
use crate::selection::SelectRowOptions;
use crate::sort::SortDirective;
use serde::{Deserialize, Deserializer, Serialize};

/// Options of one table instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableOptions {
    /// Field holding each row's unique identity
    pub key_field: String,
    /// Delegate filtering, sorting and paging to a remote source
    pub remote: bool,
    /// `None` (or `false` in JSON) renders every row on one page
    #[serde(deserialize_with = "deserialize_pagination")]
    pub pagination: Option<PaginationOptions>,
    pub select_row: Option<SelectRowOptions>,
    /// Sorts applied in order at first data load
    pub default_sorted: Vec<SortDirective>,
    /// Expose a 1-based row number per page
    pub show_index: bool,
}

impl TableOptions {
    pub fn new(key_field: impl Into<String>) -> Self {
        TableOptions {
            key_field: key_field.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn remote(mut self) -> Self {
        self.remote = true;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationOptions) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_select_row(mut self, select_row: SelectRowOptions) -> Self {
        self.select_row = Some(select_row);
        self
    }

    pub fn with_default_sorted(mut self, default_sorted: Vec<SortDirective>) -> Self {
        self.default_sorted = default_sorted;
        self
    }

    pub fn with_index(mut self) -> Self {
        self.show_index = true;
        self
    }

    /// Rows per page, 0 when pagination is off
    pub fn size_per_page(&self) -> usize {
        self.pagination.as_ref().map_or(0, |p| p.size_per_page)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaginationSetting {
    Toggle(bool),
    Options(PaginationOptions),
}

fn deserialize_pagination<'de, D>(deserializer: D) -> std::result::Result<Option<PaginationOptions>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<PaginationSetting>::deserialize(deserializer)? {
        None | Some(PaginationSetting::Toggle(false)) => None,
        Some(PaginationSetting::Toggle(true)) => Some(PaginationOptions::default()),
        Some(PaginationSetting::Options(options)) => Some(options),
    })
}
