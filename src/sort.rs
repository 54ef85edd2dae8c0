//! Single-column sorting.
//!
//! At most one column carries a direction at a time. Numbers and booleans
//! compare numerically; everything else compares as case-insensitive text.
//! Nulls and empty strings sort first, and a column mixing numbers with text
//! puts every number before any text.

use crate::column::Column;
use crate::value::{CellValue, Row};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sort direction of one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Not sorted
    #[default]
    #[serde(rename = "")]
    None,
    /// Smallest first
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn is_none(self) -> bool {
        self == SortOrder::None
    }

    /// Direction after a header click: unsorted and ascending go to
    /// descending, descending goes to ascending.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::None | SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::None => "",
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// A sort applied at first data load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDirective {
    pub data_field: String,
    /// Missing order means ascending
    #[serde(default)]
    pub order: Option<SortOrder>,
}

impl SortDirective {
    pub fn ascending(data_field: impl Into<String>) -> Self {
        SortDirective {
            data_field: data_field.into(),
            order: Some(SortOrder::Ascending),
        }
    }

    pub fn descending(data_field: impl Into<String>) -> Self {
        SortDirective {
            data_field: data_field.into(),
            order: Some(SortOrder::Descending),
        }
    }

    /// The effective order; unset and `None` both mean ascending
    pub fn effective_order(&self) -> SortOrder {
        match self.order {
            Some(SortOrder::Descending) => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

/// Sort direction per sortable column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SortState {
    orders: BTreeMap<String, SortOrder>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every sortable column unsorted, then the last default directive applied
    pub fn from_columns(columns: &[Column], defaults: &[SortDirective]) -> Self {
        let mut state = SortState {
            orders: columns
                .iter()
                .filter(|c| c.sortable)
                .map(|c| (c.data_field.clone(), SortOrder::None))
                .collect(),
        };
        if let Some(last) = defaults.last() {
            state
                .orders
                .insert(last.data_field.clone(), last.effective_order());
        }
        state
    }

    pub fn get(&self, field: &str) -> SortOrder {
        self.orders.get(field).copied().unwrap_or_default()
    }

    /// The column currently sorted, if any
    pub fn active(&self) -> Option<(&str, SortOrder)> {
        self.orders
            .iter()
            .find(|(_, order)| !order.is_none())
            .map(|(field, order)| (field.as_str(), *order))
    }

    /// Set `field` to `order`, clearing every other column.
    pub fn set(&mut self, field: &str, order: SortOrder) {
        for o in self.orders.values_mut() {
            *o = SortOrder::None;
        }
        self.orders.insert(field.to_string(), order);
    }

    /// Apply the click toggle to `field` and return its new direction.
    pub fn toggle(&mut self, field: &str) -> SortOrder {
        let next = self.get(field).toggled();
        self.set(field, next);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortOrder)> {
        self.orders.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Ordering key of one cell.
///
/// Keys of different kinds order by kind: empty cells, then numbers, then
/// text. Within a kind numbers use `f64::total_cmp` and text compares
/// lowercased, so mixed columns still sort under a total order.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Empty,
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(cell: Option<&CellValue>) -> Self {
        let Some(cell) = cell else {
            return SortKey::Empty;
        };
        if let Some(n) = cell.as_number() {
            return SortKey::Number(n);
        }
        match cell.display_string() {
            Some(text) if !text.is_empty() => SortKey::Text(text.to_lowercase()),
            _ => SortKey::Empty,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Empty => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }

    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
            (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    SortKey::of(a).compare(&SortKey::of(b))
}

/// Compare two rows on `field` in the given direction.
///
/// `SortOrder::None` treats every pair as equal.
pub fn compare(a: &Row, b: &Row, field: &str, order: SortOrder) -> Ordering {
    let base = compare_cells(a.get(field), b.get(field));
    match order {
        SortOrder::Ascending => base,
        SortOrder::Descending => base.reverse(),
        SortOrder::None => Ordering::Equal,
    }
}

/// Stable-sort a list of row indices by `field`.
pub fn sort_indices(indices: &mut [usize], rows: &[Row], field: &str, order: SortOrder) {
    if order.is_none() || field.is_empty() {
        return;
    }
    indices.sort_by(|&a, &b| compare(&rows[a], &rows[b], field, order));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::make_row;

    fn rows() -> Vec<Row> {
        vec![
            make_row([("id", CellValue::Int(1)), ("name", "b".into()), ("price", CellValue::Int(10))]),
            make_row([("id", CellValue::Int(2)), ("name", "a".into()), ("price", CellValue::Int(20))]),
            make_row([("id", CellValue::Int(3)), ("name", "C".into()), ("price", CellValue::Float(2.5))]),
        ]
    }

    fn ids(indices: &[usize], rows: &[Row]) -> Vec<i64> {
        indices.iter().map(|&i| rows[i]["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_sort_text_case_insensitive() {
        let rows = rows();
        let mut idx: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&mut idx, &rows, "name", SortOrder::Ascending);
        assert_eq!(ids(&idx, &rows), vec![2, 1, 3]);
        sort_indices(&mut idx, &rows, "name", SortOrder::Descending);
        assert_eq!(ids(&idx, &rows), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_numeric() {
        let rows = rows();
        let mut idx: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&mut idx, &rows, "price", SortOrder::Ascending);
        // Numeric, not lexicographic: 2.5 < 10 < 20
        assert_eq!(ids(&idx, &rows), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_booleans_as_numbers() {
        let rows = vec![
            make_row([("id", CellValue::Int(1)), ("done", CellValue::Bool(true))]),
            make_row([("id", CellValue::Int(2)), ("done", CellValue::Bool(false))]),
        ];
        let mut idx = vec![0, 1];
        sort_indices(&mut idx, &rows, "done", SortOrder::Ascending);
        assert_eq!(ids(&idx, &rows), vec![2, 1]);
    }

    #[test]
    fn test_sort_nulls_as_empty_text() {
        let rows = vec![
            make_row([("id", CellValue::Int(1)), ("name", "x".into())]),
            make_row([("id", CellValue::Int(2)), ("name", CellValue::Null)]),
            make_row([("id", CellValue::Int(3))]),
        ];
        let mut idx = vec![0, 1, 2];
        sort_indices(&mut idx, &rows, "name", SortOrder::Ascending);
        assert_eq!(ids(&idx, &rows), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_mixed_column_orders_by_kind() {
        let values = [
            CellValue::Int(10),
            "1a".into(),
            CellValue::Null,
            CellValue::Float(2.5),
            CellValue::Int(9),
            "Beta".into(),
        ];
        let rows: Vec<Row> = values
            .iter()
            .enumerate()
            .map(|(i, v)| make_row([("id", CellValue::Int(i as i64 + 1)), ("v", v.clone())]))
            .collect();

        let mut idx: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&mut idx, &rows, "v", SortOrder::Ascending);
        // Empty, then numbers, then text
        assert_eq!(ids(&idx, &rows), vec![3, 4, 5, 1, 2, 6]);

        sort_indices(&mut idx, &rows, "v", SortOrder::Descending);
        assert_eq!(ids(&idx, &rows), vec![6, 2, 1, 5, 4, 3]);
    }

    #[test]
    fn test_sort_mixed_column_is_transitive() {
        let nine = make_row([("v", CellValue::Int(9))]);
        let ten = make_row([("v", CellValue::Int(10))]);
        let text = make_row([("v", CellValue::from("1a"))]);

        assert_eq!(compare(&nine, &ten, "v", SortOrder::Ascending), Ordering::Less);
        assert_eq!(compare(&ten, &text, "v", SortOrder::Ascending), Ordering::Less);
        assert_eq!(compare(&nine, &text, "v", SortOrder::Ascending), Ordering::Less);
    }

    #[test]
    fn test_sort_mixed_column_many_rows() {
        let rows: Vec<Row> = (0..200i64)
            .map(|i| {
                let v = match i % 3 {
                    0 => CellValue::Int(i),
                    1 => CellValue::String(format!("{}a", i)),
                    _ => CellValue::Float(i as f64 / 3.0),
                };
                make_row([("id", CellValue::Int(i)), ("v", v)])
            })
            .collect();
        let mut idx: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&mut idx, &rows, "v", SortOrder::Ascending);

        for pair in idx.windows(2) {
            assert_ne!(compare(&rows[pair[0]], &rows[pair[1]], "v", SortOrder::Ascending), Ordering::Greater);
        }
    }

    #[test]
    fn test_sort_nan_does_not_tie_with_numbers() {
        let nan = make_row([("v", CellValue::Float(f64::NAN))]);
        let one = make_row([("v", CellValue::Int(1))]);
        assert_ne!(compare(&nan, &one, "v", SortOrder::Ascending), Ordering::Equal);
        assert_eq!(compare(&nan, &nan, "v", SortOrder::Ascending), Ordering::Equal);
    }

    #[test]
    fn test_sort_is_stable() {
        let rows = vec![
            make_row([("id", CellValue::Int(1)), ("g", "x".into())]),
            make_row([("id", CellValue::Int(2)), ("g", "y".into())]),
            make_row([("id", CellValue::Int(3)), ("g", "X".into())]),
        ];
        let mut idx = vec![0, 1, 2];
        sort_indices(&mut idx, &rows, "g", SortOrder::Ascending);
        assert_eq!(ids(&idx, &rows), vec![1, 3, 2]);
    }

    #[test]
    fn test_toggle_cycle() {
        assert_eq!(SortOrder::None.toggled(), SortOrder::Descending);
        assert_eq!(SortOrder::Descending.toggled(), SortOrder::Ascending);
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
    }

    #[test]
    fn test_state_single_active_column() {
        let columns = vec![Column::new("a", "A").sortable(), Column::new("b", "B").sortable()];
        let mut state = SortState::from_columns(&columns, &[]);
        assert_eq!(state.active(), None);

        assert_eq!(state.toggle("a"), SortOrder::Descending);
        assert_eq!(state.toggle("b"), SortOrder::Descending);
        assert_eq!(state.get("a"), SortOrder::None);
        assert_eq!(state.active(), Some(("b", SortOrder::Descending)));

        assert_eq!(state.toggle("b"), SortOrder::Ascending);
        assert_eq!(state.toggle("b"), SortOrder::Descending);
    }

    #[test]
    fn test_state_last_default_wins() {
        let columns = vec![Column::new("a", "A").sortable(), Column::new("b", "B").sortable()];
        let defaults = vec![
            SortDirective::descending("a"),
            SortDirective {
                data_field: "b".to_string(),
                order: None,
            },
        ];
        let state = SortState::from_columns(&columns, &defaults);
        assert_eq!(state.get("a"), SortOrder::None);
        assert_eq!(state.get("b"), SortOrder::Ascending);
    }

    #[test]
    fn test_state_serializes_as_wire_map() {
        let columns = vec![Column::new("a", "A").sortable(), Column::new("b", "B").sortable()];
        let mut state = SortState::from_columns(&columns, &[]);
        state.toggle("b");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({"a": "", "b": "desc"}));
    }

    #[test]
    fn test_directive_from_json() {
        let d: Vec<SortDirective> =
            serde_json::from_str(r#"[{"dataField": "name"}, {"dataField": "id", "order": "desc"}]"#).unwrap();
        assert_eq!(d[0].effective_order(), SortOrder::Ascending);
        assert_eq!(d[1].effective_order(), SortOrder::Descending);
    }
}
