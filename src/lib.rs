//! LiveGrid - Data Table State Engine
//!
//! The client-side engine behind a data-table widget: per-column filtering,
//! single-column sorting, pagination, row selection and row expansion.
//! Given caller-owned rows and column definitions it derives, on every user
//! action, exactly what a renderer needs to draw the current page. Rendering
//! itself lives elsewhere and consumes [`TableSnapshot`].

pub mod value;
pub mod error;
pub mod column;
pub mod filter;
pub mod sort;
pub mod pagination;
pub mod selection;
pub mod expansion;
pub mod messages;
pub mod options;
pub mod controller;

pub use value::{make_row, rows_from_json, CellValue, Row, RowKey};
pub use error::{Result, TableError};
pub use column::{columns_from_json, validate_columns, CellContext, CellProp, Column, HeaderProp, RenderedCell, Style};
pub use filter::{filter_rows, matches, wire_filters, ColumnFilter, FilterKind, FilterOption, FilterState, FilterValue};
pub use sort::{compare, sort_indices, SortDirective, SortOrder, SortState};
pub use pagination::{paginate, PageLinks, PageSlice, PageSummary, PaginationOptions, MAX_PAGE_LINKS};
pub use selection::{HeaderCheck, SelectRowOptions, Selection, SelectionMode};
pub use expansion::ExpansionState;
pub use messages::{FetchRequest, RemoteSource, RequestToken, TableEvent};
pub use options::TableOptions;
pub use controller::{ColumnHeader, RowView, TableController, TableSnapshot, TableStatus};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn example_rows() -> Rc<Vec<Row>> {
        Rc::new(vec![
            make_row([("id", CellValue::Int(1)), ("name", "b".into()), ("price", CellValue::Int(10))]),
            make_row([("id", CellValue::Int(2)), ("name", "a".into()), ("price", CellValue::Int(20))]),
        ])
    }

    fn example_columns() -> Rc<Vec<Column>> {
        Rc::new(vec![
            Column::new("id", "ID"),
            Column::new("name", "Name").sortable(),
            Column::new("price", "Price").sortable().with_filter(ColumnFilter::text()),
        ])
    }

    #[test]
    fn test_reference_example() {
        // Sort by name ascending
        let mut table = TableController::new(TableOptions::new("id"), example_columns(), example_rows()).unwrap();
        table.sort_click("name").unwrap();
        table.sort_click("name").unwrap();
        assert_eq!(table.sort_state().get("name"), SortOrder::Ascending);
        assert_eq!(table.snapshot().keys(), vec!["2", "1"]);

        // Text filter on price
        let mut table = TableController::new(TableOptions::new("id"), example_columns(), example_rows()).unwrap();
        table.filter_change("price", "10".into()).unwrap();
        assert_eq!(table.snapshot().keys(), vec!["1"]);

        // One row per page, second page
        let options = TableOptions::new("id").with_pagination(PaginationOptions::with_size(1));
        let mut table = TableController::new(options, example_columns(), example_rows()).unwrap();
        table.page_change(2).unwrap();
        let snap = table.snapshot();
        assert_eq!(snap.keys(), vec!["2"]);
        assert_eq!(snap.page_count, 2);
    }

    #[test]
    fn test_complete_workflow_from_json() {
        let rows = Rc::new(
            rows_from_json(
                r#"[
                    {"id": 1, "product": "Widget", "category": "tools", "price": 9.99, "stock": true},
                    {"id": 2, "product": "Gadget", "category": "toys", "price": 19.99, "stock": false},
                    {"id": 3, "product": "Doohickey", "category": "tools", "price": 4.99, "stock": true},
                    {"id": 4, "product": "Gizmo", "category": ["toys", "tools"], "price": 14.5, "stock": true}
                ]"#,
            )
            .unwrap(),
        );
        let columns = Rc::new(
            columns_from_json(
                r##"[
                    {"dataField": "id", "text": "#"},
                    {"dataField": "product", "text": "Product", "sort": true,
                     "filter": {"type": "text", "placeholder": "Search"}},
                    {"dataField": "category", "text": "Category",
                     "filter": {"type": "select",
                                "options": [{"value": "tools", "label": "Tools"},
                                            {"value": "toys", "label": "Toys"}]}},
                    {"dataField": "price", "text": "Price", "sort": true},
                    {"dataField": "stock", "text": "In stock", "sort": true}
                ]"##,
            )
            .unwrap(),
        );
        let options = TableOptions::from_json(
            r#"{
                "keyField": "id",
                "pagination": {"sizePerPage": 2, "showTotal": true},
                "selectRow": {"mode": "checkbox"},
                "defaultSorted": [{"dataField": "price"}]
            }"#,
        )
        .unwrap();

        let selected = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&selected);
        let mut table = TableController::new(options, columns, rows)
            .unwrap()
            .on_select_change(move |s| *sink.borrow_mut() = s.keys());

        // Default sort by price ascending
        assert_eq!(table.snapshot().keys(), vec!["3", "1"]);
        assert_eq!(table.sort_state().get("price"), SortOrder::Ascending);

        // Select a category; the list-valued Gizmo matches too
        table.filter_change("category", "toys".into()).unwrap();
        let snap = table.snapshot();
        assert_eq!(snap.keys(), vec!["4", "2"]);
        assert_eq!(snap.page_count, 1);
        assert_eq!(snap.summary, Some(PageSummary { from: 1, to: 2, total: 2 }));

        // Select everything on the page
        table.select_all();
        assert_eq!(*selected.borrow(), vec![RowKey::from(4), RowKey::from(2)]);
        assert_eq!(table.snapshot().header_check, Some(HeaderCheck::Checked));

        // Sorting booleans: out-of-stock first when ascending
        table.filter_change("category", "".into()).unwrap();
        table.sort_click("stock").unwrap();
        table.sort_click("stock").unwrap();
        assert_eq!(table.snapshot().keys()[0], "2");

        let json = serde_json::to_string(&table.snapshot()).unwrap();
        assert!(json.contains("\"headerCheck\""));
    }

    #[test]
    fn test_remote_round_trip() {
        let server_rows: Vec<Row> = (1..=7)
            .map(|i| make_row([("id", CellValue::Int(i)), ("n", CellValue::Int(100 - i))]))
            .collect();

        let pending = Rc::new(RefCell::new(None));
        let outbox = Rc::clone(&pending);
        let options = TableOptions::new("id")
            .remote()
            .with_pagination(PaginationOptions {
                total_size: Some(server_rows.len()),
                ..PaginationOptions::with_size(3)
            });
        let columns = Rc::new(vec![Column::new("id", "ID").sortable(), Column::new("n", "N").sortable()]);
        let mut table = TableController::new(options, columns, Rc::new(server_rows[..3].to_vec()))
            .unwrap()
            .with_remote_source(move |req: &FetchRequest| *outbox.borrow_mut() = Some(req.clone()));

        table.page_change(3).unwrap();
        let request = pending.borrow_mut().take().unwrap();
        assert_eq!(table.status(), TableStatus::Mutating);

        // Serve the request the way a backend would
        let page: Vec<Row> = server_rows.iter().skip(request.skip).take(request.limit).cloned().collect();
        assert!(table.deliver(request.token, Rc::new(page)));

        let snap = table.snapshot();
        assert_eq!(snap.keys(), vec!["7"]);
        assert_eq!(snap.page, 3);
        assert_eq!(snap.page_count, 3);
        assert_eq!(snap.status, TableStatus::Idle);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::rc::Rc;

    fn rows_strategy() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(("[a-zA-Z]{0,6}", -1000i64..1000), 0..40).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (name, price))| {
                    make_row([
                        ("id", CellValue::Int(i as i64)),
                        ("name", CellValue::String(name)),
                        ("price", CellValue::Int(price)),
                    ])
                })
                .collect()
        })
    }

    fn mixed_cell() -> impl Strategy<Value = CellValue> {
        prop_oneof![
            Just(CellValue::Null),
            any::<bool>().prop_map(CellValue::Bool),
            (-50i64..50).prop_map(CellValue::Int),
            any::<f64>().prop_map(CellValue::Float),
            "[0-9a-zA-Z]{0,3}".prop_map(CellValue::String),
        ]
    }

    proptest! {
        #[test]
        fn prop_mixed_column_sorts_consistently(cells in prop::collection::vec(mixed_cell(), 0..60)) {
            let rows: Vec<Row> = cells
                .into_iter()
                .enumerate()
                .map(|(i, v)| make_row([("id", CellValue::Int(i as i64)), ("v", v)]))
                .collect();

            for order in [SortOrder::Ascending, SortOrder::Descending] {
                let mut idx: Vec<usize> = (0..rows.len()).collect();
                sort_indices(&mut idx, &rows, "v", order);
                for pair in idx.windows(2) {
                    prop_assert_ne!(compare(&rows[pair[0]], &rows[pair[1]], "v", order), std::cmp::Ordering::Greater);
                }
                let mut seen = idx.clone();
                seen.sort_unstable();
                prop_assert_eq!(seen, (0..rows.len()).collect::<Vec<_>>());
            }
        }

        #[test]
        fn prop_empty_filters_pass_everything(rows in rows_strategy()) {
            let columns = vec![
                Column::new("name", "Name").with_filter(ColumnFilter::text()),
                Column::new("price", "Price").with_filter(ColumnFilter::select(vec![])),
                Column::new("tags", "Tags").with_filter(ColumnFilter::multi_select(vec![])),
            ];
            let filters = FilterState::from_columns(&columns);
            for row in &rows {
                prop_assert!(matches(row, &filters));
            }
        }

        #[test]
        fn prop_asc_desc_desc_asc_restores_order(rows in rows_strategy()) {
            // Unique keys: sort by id
            let mut idx: Vec<usize> = (0..rows.len()).rev().collect();
            sort_indices(&mut idx, &rows, "id", SortOrder::Ascending);
            let first = idx.clone();
            sort_indices(&mut idx, &rows, "id", SortOrder::Descending);
            sort_indices(&mut idx, &rows, "id", SortOrder::Descending);
            sort_indices(&mut idx, &rows, "id", SortOrder::Ascending);
            prop_assert_eq!(idx, first);
        }

        #[test]
        fn prop_pages_cover_filtered_rows(rows in rows_strategy(), size in 1usize..8, needle in "[a-z]?") {
            let columns = Rc::new(vec![
                Column::new("id", "ID"),
                Column::new("name", "Name").with_filter(ColumnFilter::text()),
            ]);
            let options = TableOptions::new("id").with_pagination(PaginationOptions::with_size(size));
            let mut table = TableController::new(options, columns, Rc::new(rows)).unwrap();
            table.filter_change("name", needle.as_str().into()).unwrap();

            let filtered = table.view_len();
            let page_count = table.snapshot().page_count;
            let mut seen = 0;
            for page in 1..=page_count {
                table.page_change(page).unwrap();
                seen += table.snapshot().rows.len();
            }
            prop_assert_eq!(seen, filtered);
        }

        #[test]
        fn prop_toggle_one_twice_is_identity(keys in prop::collection::vec(0i64..20, 0..10), extra in 0i64..20) {
            let mut selection = Selection::new(SelectionMode::Checkbox);
            selection.replace(keys.into_iter().map(RowKey::from));
            let before = selection.clone();
            selection.toggle_one(RowKey::from(extra));
            selection.toggle_one(RowKey::from(extra));
            prop_assert_eq!(selection.keys().len(), before.keys().len());
            for key in before.keys() {
                prop_assert!(selection.contains(&key));
            }
        }

        #[test]
        fn prop_select_all_selects_page_then_clears(rows in rows_strategy(), size in 1usize..8) {
            let columns = Rc::new(vec![Column::new("id", "ID")]);
            let options = TableOptions::new("id")
                .with_pagination(PaginationOptions::with_size(size))
                .with_select_row(SelectRowOptions::checkbox());
            let mut table = TableController::new(options, columns, Rc::new(rows)).unwrap();

            let page_keys = table.visible_keys();
            table.select_all();
            prop_assert_eq!(table.selection().unwrap().keys(), page_keys);
            table.select_all();
            prop_assert!(table.selection().unwrap().is_empty());
        }
    }
}
