//! Row selection under checkbox or radio semantics.
//!
//! Rows are identified by their [`RowKey`], never by structural equality, so
//! two rows with identical contents but distinct keys select independently.

use crate::value::RowKey;
use serde::{Deserialize, Serialize};

/// Selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Any number of rows, with a select-all header checkbox
    #[default]
    Checkbox,
    /// At most one row
    Radio,
}

/// Row selection settings supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectRowOptions {
    pub mode: SelectionMode,
    /// Clicking anywhere on a row selects it
    pub click_to_select: bool,
    /// Moving to another page empties the selection
    pub clear_on_page_change: bool,
}

impl Default for SelectRowOptions {
    fn default() -> Self {
        SelectRowOptions {
            mode: SelectionMode::Checkbox,
            click_to_select: true,
            clear_on_page_change: true,
        }
    }
}

impl SelectRowOptions {
    pub fn checkbox() -> Self {
        Self::default()
    }

    pub fn radio() -> Self {
        SelectRowOptions {
            mode: SelectionMode::Radio,
            ..Self::default()
        }
    }
}

/// State of the select-all header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderCheck {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Currently selected rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "selected", rename_all = "lowercase")]
pub enum Selection {
    /// Selected keys in the order they were selected
    Checkbox(Vec<RowKey>),
    Radio(Option<RowKey>),
}

impl Selection {
    pub fn new(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Checkbox => Selection::Checkbox(Vec::new()),
            SelectionMode::Radio => Selection::Radio(None),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            Selection::Checkbox(_) => SelectionMode::Checkbox,
            Selection::Radio(_) => SelectionMode::Radio,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Checkbox(keys) => keys.len(),
            Selection::Radio(key) => usize::from(key.is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &RowKey) -> bool {
        match self {
            Selection::Checkbox(keys) => keys.contains(key),
            Selection::Radio(selected) => selected.as_ref() == Some(key),
        }
    }

    pub fn keys(&self) -> Vec<RowKey> {
        match self {
            Selection::Checkbox(keys) => keys.clone(),
            Selection::Radio(key) => key.iter().cloned().collect(),
        }
    }

    /// Checkbox: remove `key` if selected, otherwise append it.
    /// Radio: select `key` unconditionally.
    pub fn toggle_one(&mut self, key: RowKey) {
        match self {
            Selection::Checkbox(keys) => {
                if let Some(pos) = keys.iter().position(|k| *k == key) {
                    keys.remove(pos);
                } else {
                    keys.push(key);
                }
            }
            Selection::Radio(selected) => *selected = Some(key),
        }
    }

    /// Clear everything when anything is selected, otherwise select exactly
    /// `visible`. Radio selections have no select-all and are left alone.
    pub fn toggle_all<I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = RowKey>,
    {
        if let Selection::Checkbox(keys) = self {
            if keys.is_empty() {
                keys.extend(visible);
            } else {
                keys.clear();
            }
        }
    }

    pub fn clear(&mut self) {
        match self {
            Selection::Checkbox(keys) => keys.clear(),
            Selection::Radio(selected) => *selected = None,
        }
    }

    /// Replace the selection wholesale; radio mode keeps the last key.
    pub fn replace<I>(&mut self, selected: I)
    where
        I: IntoIterator<Item = RowKey>,
    {
        match self {
            Selection::Checkbox(keys) => {
                keys.clear();
                for key in selected {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
            Selection::Radio(current) => *current = selected.into_iter().last(),
        }
    }

    /// Derived header checkbox state for a page showing `visible` rows.
    /// `None` in radio mode, which has no header checkbox.
    pub fn header_check(&self, visible: usize) -> Option<HeaderCheck> {
        match self {
            Selection::Radio(_) => None,
            Selection::Checkbox(keys) => Some(if visible > 0 && keys.len() == visible {
                HeaderCheck::Checked
            } else if !keys.is_empty() {
                HeaderCheck::Indeterminate
            } else {
                HeaderCheck::Unchecked
            }),
        }
    }
}
