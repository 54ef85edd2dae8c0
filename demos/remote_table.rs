/// Remote Table Example
///
/// This example demonstrates:
/// - Delegating filtering, sorting and paging to a data source
/// - Serving fetch requests from a simulated backend
/// - Dropping stale responses by request token

use livegrid::{
    make_row, CellValue, Column, ColumnFilter, FetchRequest, FilterValue, PaginationOptions, Row,
    SortOrder, TableController, TableOptions,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Tiny in-memory backend answering fetch requests
struct Backend {
    rows: Vec<Row>,
}

impl Backend {
    fn new(count: i64) -> Self {
        let rows = (1..=count)
            .map(|i| {
                make_row([
                    ("id", CellValue::Int(i)),
                    ("user", format!("user{:02}", i).into()),
                    ("score", CellValue::Int((i * 37) % 100)),
                ])
            })
            .collect();
        Backend { rows }
    }

    fn serve(&self, request: &FetchRequest) -> Vec<Row> {
        let mut rows: Vec<&Row> = self
            .rows
            .iter()
            .filter(|row| match request.filter.get("user") {
                Some(Some(FilterValue::Text(needle))) => row["user"].to_string().contains(needle.as_str()),
                _ => true,
            })
            .collect();

        if let Some((field, order)) = request.sort.active() {
            rows.sort_by(|a, b| livegrid::compare(a, b, field, order));
        }

        rows.into_iter()
            .skip(request.skip)
            .take(if request.limit == 0 { usize::MAX } else { request.limit })
            .cloned()
            .collect()
    }
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));

    println!("=== LiveGrid Remote Table Example ===\n");

    let backend = Backend::new(23);
    let outbox: Rc<RefCell<Vec<FetchRequest>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&outbox);

    let columns = Rc::new(vec![
        Column::new("id", "ID"),
        Column::new("user", "User").with_filter(ColumnFilter::text()),
        Column::new("score", "Score").sortable(),
    ]);
    let options = TableOptions::new("id").remote().with_pagination(PaginationOptions {
        total_size: Some(backend.rows.len()),
        ..PaginationOptions::with_size(5)
    });

    let first_page = backend.serve(&FetchRequest {
        limit: 5,
        skip: 0,
        sort: Default::default(),
        filter: Default::default(),
        token: livegrid::RequestToken(0),
    });
    let mut table = TableController::new(options, columns, Rc::new(first_page))
        .expect("valid table configuration")
        .with_remote_source(move |request: &FetchRequest| sink.borrow_mut().push(request.clone()));

    println!("1. First page: {:?}\n", table.snapshot().keys());

    // Two requests in flight; only the newest may land
    println!("2. Sorting by score, then jumping to page 2...");
    table.sort_click("score").expect("score is a column");
    table.page_change(2).expect("pages start at 1");
    assert_eq!(table.sort_state().get("score"), SortOrder::Descending);

    let requests: Vec<FetchRequest> = outbox.borrow_mut().drain(..).collect();
    for request in requests.iter().rev() {
        let accepted = table.deliver(request.token, Rc::new(backend.serve(request)));
        println!(
            "   response #{} ({})",
            request.token.0,
            if accepted { "accepted" } else { "stale, dropped" }
        );
    }
    let snapshot = table.snapshot();
    println!("   page {}/{}: {:?}\n", snapshot.page, snapshot.page_count, snapshot.keys());

    println!("3. Filtering users containing '1'...");
    table.filter_change("user", "1".into()).expect("user has a text filter");
    let request = outbox.borrow_mut().pop().expect("filter change issues a fetch");
    println!("   wire request: {}", serde_json::to_string(&request).unwrap_or_default());
    table.deliver(request.token, Rc::new(backend.serve(&request)));
    println!("   rows: {:?}\n", table.snapshot().keys());

    println!("=== Example Complete ===");
}
