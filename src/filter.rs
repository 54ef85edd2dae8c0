//! Per-column filters and the row filter evaluator.
//!
//! Filters are keyed by column `data_field`. A row is included iff it passes
//! every active filter; a filter whose value is absent or empty is a no-op.

use crate::column::Column;
use crate::error::{Result, TableError};
use crate::value::{CellValue, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a column filter compares its value against a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    /// Case-sensitive substring match
    #[default]
    Text,
    /// Exact match on the stringified cell, or on any element of a list cell
    Select,
    /// Exact match against any of several selected values
    MultiSelect,
    /// Unrecognised kind from configuration; always passes
    #[serde(other)]
    Unknown,
}

/// Filter input: a single string for text/select, a list for multiSelect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Many(Vec<String>),
}

impl FilterValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::Many(v) => v.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            FilterValue::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            FilterValue::Many(v) => Some(v),
            FilterValue::Text(_) => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(v: Vec<&str>) -> Self {
        FilterValue::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(v: Vec<String>) -> Self {
        FilterValue::Many(v)
    }
}

/// One choice of a select or multiSelect filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        FilterOption {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Filter declared on a column, together with its current value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnFilter {
    #[serde(rename = "type")]
    pub kind: FilterKind,
    pub placeholder: Option<String>,
    pub options: Vec<FilterOption>,
    pub default_value: Option<FilterValue>,
    pub value: Option<FilterValue>,
}

impl ColumnFilter {
    pub fn new(kind: FilterKind) -> Self {
        ColumnFilter {
            kind,
            ..Default::default()
        }
    }

    pub fn text() -> Self {
        Self::new(FilterKind::Text)
    }

    pub fn select(options: Vec<FilterOption>) -> Self {
        ColumnFilter {
            options,
            ..Self::new(FilterKind::Select)
        }
    }

    pub fn multi_select(options: Vec<FilterOption>) -> Self {
        ColumnFilter {
            options,
            ..Self::new(FilterKind::MultiSelect)
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<FilterValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// The empty value for this filter's kind
    pub fn empty_value(&self) -> FilterValue {
        match self.kind {
            FilterKind::MultiSelect => FilterValue::Many(Vec::new()),
            _ => FilterValue::Text(String::new()),
        }
    }

    /// A copy of this filter with its value reset to the declared default
    pub fn initial(&self) -> ColumnFilter {
        let value = match &self.default_value {
            Some(v) if !v.is_empty() => v.clone(),
            _ => self.empty_value(),
        };
        ColumnFilter {
            value: Some(value),
            ..self.clone()
        }
    }

    pub fn is_active(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Check that `value` has the shape this filter kind expects.
    pub fn check_value(&self, field: &str, value: &FilterValue) -> Result<()> {
        let ok = match (self.kind, value) {
            (FilterKind::MultiSelect, FilterValue::Many(_)) => true,
            (FilterKind::Text | FilterKind::Select, FilterValue::Text(_)) => true,
            (FilterKind::Unknown, _) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(TableError::FilterKindMismatch {
                field: field.to_string(),
                expected: if self.kind == FilterKind::MultiSelect { "list" } else { "string" },
            })
        }
    }

    /// Decide whether a cell passes this filter.
    ///
    /// Inactive filters and values of the wrong shape pass everything.
    pub fn matches(&self, cell: Option<&CellValue>) -> bool {
        let value = match &self.value {
            Some(v) if !v.is_empty() => v,
            _ => return true,
        };

        match self.kind {
            FilterKind::Text => match value.as_text() {
                Some(needle) => cell
                    .and_then(CellValue::display_string)
                    .is_some_and(|s| s.contains(needle)),
                None => true,
            },
            FilterKind::Select => match value.as_text() {
                Some(wanted) => match cell {
                    Some(CellValue::List(items)) => items
                        .iter()
                        .any(|item| item.display_string().as_deref() == Some(wanted)),
                    Some(other) => other.display_string().as_deref() == Some(wanted),
                    None => false,
                },
                None => true,
            },
            FilterKind::MultiSelect => match value.as_many() {
                Some(wanted) => match cell {
                    Some(CellValue::List(items)) => items.iter().any(|item| {
                        item.display_string()
                            .is_some_and(|s| wanted.iter().any(|w| *w == s))
                    }),
                    Some(other) => other
                        .display_string()
                        .is_some_and(|s| wanted.iter().any(|w| *w == s)),
                    None => false,
                },
                None => true,
            },
            FilterKind::Unknown => true,
        }
    }
}

/// The filters of one table, keyed by column data field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterState {
    filters: BTreeMap<String, ColumnFilter>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial filter state: every filtered column at its default value
    pub fn from_columns(columns: &[Column]) -> Self {
        let filters = columns
            .iter()
            .filter_map(|c| c.filter.as_ref().map(|f| (c.data_field.clone(), f.initial())))
            .collect();
        FilterState { filters }
    }

    pub fn insert(&mut self, field: impl Into<String>, filter: ColumnFilter) {
        self.filters.insert(field.into(), filter);
    }

    pub fn get(&self, field: &str) -> Option<&ColumnFilter> {
        self.filters.get(field)
    }

    /// Current value of the filter on `field`
    pub fn value(&self, field: &str) -> Option<&FilterValue> {
        self.filters.get(field).and_then(|f| f.value.as_ref())
    }

    /// Replace the value of an existing filter.
    pub fn set_value(&mut self, field: &str, value: FilterValue) -> Result<()> {
        let filter = self
            .filters
            .get_mut(field)
            .ok_or_else(|| TableError::NoFilter { field: field.to_string() })?;
        filter.check_value(field, &value)?;
        filter.value = Some(value);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnFilter)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Number of filters currently narrowing the data
    pub fn active_count(&self) -> usize {
        self.filters.values().filter(|f| f.is_active()).count()
    }
}

/// True iff `row` passes every active filter.
pub fn matches(row: &Row, filters: &FilterState) -> bool {
    filters
        .filters
        .iter()
        .all(|(field, filter)| filter.matches(row.get(field)))
}

/// Indices of the rows that pass `filters`, in their original order.
pub fn filter_rows(rows: &[Row], filters: &FilterState) -> Vec<usize> {
    if filters.active_count() == 0 {
        return (0..rows.len()).collect();
    }
    rows.iter()
        .enumerate()
        .filter(|(_, row)| matches(row, filters))
        .map(|(i, _)| i)
        .collect()
}

/// Project filters to the shape handed to a remote data source: the raw
/// value per field, or `None` when the filter is empty.
pub fn wire_filters(filters: &FilterState) -> BTreeMap<String, Option<FilterValue>> {
    filters
        .filters
        .iter()
        .map(|(field, filter)| {
            let value = filter.value.clone().filter(|v| !v.is_empty());
            (field.clone(), value)
        })
        .collect()
}
