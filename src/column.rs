//! Column definitions.
//!
//! A [`Column`] declares how one field is displayed, sorted and filtered.
//! Static parts deserialize from JSON; formatters, styles and classes may be
//! computed per cell through [`CellProp`].

use crate::error::{Result, TableError};
use crate::filter::ColumnFilter;
use crate::value::{CellValue, Row};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;

/// Inline style declarations, property name to value
pub type Style = BTreeMap<String, String>;

/// Everything a computed cell property can look at
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    /// Value of the column's field in this row (`Null` when absent)
    pub value: &'a CellValue,
    pub row: &'a Row,
    /// Position of the row within the rendered page
    pub row_index: usize,
    /// Position of the cell, counting the selection column when present
    pub col_index: usize,
    /// Whether the row's expansion is open
    pub expanded: bool,
}

/// A cell property that is either fixed or computed per cell
pub enum CellProp<T> {
    Static(T),
    Computed(Rc<dyn Fn(&CellContext<'_>) -> T>),
}

impl<T: Clone> CellProp<T> {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&CellContext<'_>) -> T + 'static,
    {
        CellProp::Computed(Rc::new(f))
    }

    pub fn resolve(&self, ctx: &CellContext<'_>) -> T {
        match self {
            CellProp::Static(v) => v.clone(),
            CellProp::Computed(f) => f(ctx),
        }
    }
}

impl<T: Clone> Clone for CellProp<T> {
    fn clone(&self) -> Self {
        match self {
            CellProp::Static(v) => CellProp::Static(v.clone()),
            CellProp::Computed(f) => CellProp::Computed(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CellProp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellProp::Static(v) => f.debug_tuple("Static").field(v).finish(),
            CellProp::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

/// A header property that is either fixed or computed from the column and its index
pub enum HeaderProp<T> {
    Static(T),
    Computed(Rc<dyn Fn(&Column, usize) -> T>),
}

impl<T: Clone> HeaderProp<T> {
    pub fn resolve(&self, column: &Column, index: usize) -> T {
        match self {
            HeaderProp::Static(v) => v.clone(),
            HeaderProp::Computed(f) => f(column, index),
        }
    }
}

impl<T: Clone> Clone for HeaderProp<T> {
    fn clone(&self) -> Self {
        match self {
            HeaderProp::Static(v) => HeaderProp::Static(v.clone()),
            HeaderProp::Computed(f) => HeaderProp::Computed(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HeaderProp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderProp::Static(v) => f.debug_tuple("Static").field(v).finish(),
            HeaderProp::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

/// Column definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Column {
    /// Row field this column shows; empty for a computed or action column
    pub data_field: String,
    /// Header label
    pub text: String,
    #[serde(alias = "sort")]
    pub sortable: bool,
    pub filter: Option<ColumnFilter>,
    #[serde(skip)]
    pub formatter: Option<CellProp<String>>,
    #[serde(skip)]
    pub style: Option<CellProp<Style>>,
    #[serde(skip)]
    pub classes: Option<CellProp<String>>,
    #[serde(skip)]
    pub header_style: Option<HeaderProp<Style>>,
    #[serde(skip)]
    pub header_classes: Option<HeaderProp<String>>,
}

impl Column {
    pub fn new(data_field: impl Into<String>, text: impl Into<String>) -> Self {
        Column {
            data_field: data_field.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn with_filter(mut self, filter: ColumnFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_formatter<F>(mut self, f: F) -> Self
    where
        F: Fn(&CellContext<'_>) -> String + 'static,
    {
        self.formatter = Some(CellProp::computed(f));
        self
    }

    pub fn with_style(mut self, style: CellProp<Style>) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_classes(mut self, classes: CellProp<String>) -> Self {
        self.classes = Some(classes);
        self
    }

    pub fn with_header_style(mut self, style: HeaderProp<Style>) -> Self {
        self.header_style = Some(style);
        self
    }

    pub fn with_header_classes(mut self, classes: HeaderProp<String>) -> Self {
        self.header_classes = Some(classes);
        self
    }

    /// Resolve the cell for `row`: formatted text plus classes and style.
    pub fn render_cell(&self, row: &Row, row_index: usize, col_index: usize, expanded: bool) -> RenderedCell {
        let value = row.get(&self.data_field).unwrap_or(&CellValue::Null);
        let ctx = CellContext {
            value,
            row,
            row_index,
            col_index,
            expanded,
        };

        let text = match &self.formatter {
            Some(formatter) => formatter.resolve(&ctx),
            None => value.display_string().unwrap_or_default(),
        };

        RenderedCell {
            field: self.data_field.clone(),
            text,
            classes: self.classes.as_ref().map(|c| c.resolve(&ctx)).unwrap_or_default(),
            style: self.style.as_ref().map(|s| s.resolve(&ctx)).unwrap_or_default(),
        }
    }

    /// Resolve header classes and style for this column at `index`.
    pub fn render_header(&self, index: usize) -> (String, Style) {
        let classes = self
            .header_classes
            .as_ref()
            .map(|c| c.resolve(self, index))
            .unwrap_or_default();
        let style = self
            .header_style
            .as_ref()
            .map(|s| s.resolve(self, index))
            .unwrap_or_default();
        (classes, style)
    }
}

/// A cell ready for the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCell {
    pub field: String,
    pub text: String,
    pub classes: String,
    pub style: Style,
}

/// Parse static column definitions from a JSON array.
pub fn columns_from_json(json: &str) -> Result<Vec<Column>> {
    Ok(serde_json::from_str(json)?)
}

/// Check that column definitions are usable: data fields unique, and present
/// wherever the column sorts or filters.
pub fn validate_columns(columns: &[Column]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if column.data_field.is_empty() {
            if column.sortable {
                return Err(TableError::MissingDataField {
                    text: column.text.clone(),
                    role: "sortable",
                });
            }
            if column.filter.is_some() {
                return Err(TableError::MissingDataField {
                    text: column.text.clone(),
                    role: "filtered",
                });
            }
        }
        if !seen.insert(column.data_field.as_str()) {
            return Err(TableError::DuplicateColumn {
                field: column.data_field.clone(),
            });
        }
    }
    Ok(())
}
