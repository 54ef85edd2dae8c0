/// Basic Table Example
///
/// This example demonstrates:
/// - Declaring columns with filters and sorting
/// - Sorting, filtering and paging a local dataset
/// - Checkbox selection with the select-all header
/// - Reading the snapshot a renderer would draw

use livegrid::{
    make_row, CellProp, CellValue, Column, ColumnFilter, FilterOption, PaginationOptions,
    SelectRowOptions, TableController, TableOptions, TableSnapshot,
};
use std::rc::Rc;

fn print_snapshot(snapshot: &TableSnapshot<'_>) {
    for row in &snapshot.rows {
        let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
        let mark = if row.selected { "[x]" } else { "[ ]" };
        println!("   {} {}", mark, cells.join(" | "));
    }
    if snapshot.is_empty() {
        println!("   (no data)");
    }
    println!(
        "   page {}/{} ({} rows after filtering)\n",
        snapshot.page, snapshot.page_count, snapshot.total_rows
    );
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    println!("=== LiveGrid Basic Table Example ===\n");

    // 1. Rows are owned by the caller
    println!("1. Creating rows...");
    let items = vec![
        (1, "Laptop", "Electronics", 999.99, true),
        (2, "Mouse", "Electronics", 29.99, true),
        (3, "Desk", "Furniture", 299.99, false),
        (4, "Chair", "Furniture", 199.99, true),
        (5, "Monitor", "Electronics", 399.99, false),
        (6, "Lamp", "Lighting", 49.99, true),
    ];
    let rows: Vec<_> = items
        .into_iter()
        .map(|(id, product, category, price, stock)| {
            make_row([
                ("id", CellValue::Int(id)),
                ("product", product.into()),
                ("category", category.into()),
                ("price", CellValue::Float(price)),
                ("in_stock", CellValue::Bool(stock)),
            ])
        })
        .collect();
    let rows = Rc::new(rows);
    println!("   {} rows\n", rows.len());

    // 2. Columns
    println!("2. Declaring columns...");
    let columns = Rc::new(vec![
        Column::new("id", "#"),
        Column::new("product", "Product")
            .sortable()
            .with_filter(ColumnFilter::text().with_placeholder("Search products")),
        Column::new("category", "Category").with_filter(ColumnFilter::multi_select(vec![
            FilterOption::new("Electronics", "Electronics"),
            FilterOption::new("Furniture", "Furniture"),
            FilterOption::new("Lighting", "Lighting"),
        ])),
        Column::new("price", "Price")
            .sortable()
            .with_formatter(|ctx| format!("${:.2}", ctx.value.as_f64().unwrap_or(0.0))),
        Column::new("in_stock", "Stock")
            .sortable()
            .with_classes(CellProp::computed(|ctx| {
                let class = if ctx.value.as_bool() == Some(true) { "ok" } else { "warn" };
                class.to_string()
            })),
    ]);
    println!("   {} columns\n", columns.len());

    // 3. Controller
    let options = TableOptions::new("id")
        .with_pagination(PaginationOptions::with_size(4))
        .with_select_row(SelectRowOptions::checkbox());
    let mut table = TableController::new(options, columns, rows)
        .expect("valid table configuration")
        .on_page_change(|page, size| println!("   -> page {} ({} per page)", page, size))
        .on_select_change(|selection| println!("   -> {} selected", selection.len()));

    println!("3. Initial page:");
    print_snapshot(&table.snapshot());

    // 4. Sort by price (first click sorts descending)
    println!("4. Sorting by price, descending:");
    table.sort_click("price").expect("price is a column");
    print_snapshot(&table.snapshot());

    // 5. Filter categories
    println!("5. Only electronics and lighting:");
    table
        .filter_change("category", vec!["Electronics", "Lighting"].into())
        .expect("category has a multi-select filter");
    print_snapshot(&table.snapshot());

    // 6. Select the page, then move on
    println!("6. Selecting the whole page:");
    table.select_all();
    let snapshot = table.snapshot();
    println!("   header checkbox: {:?}", snapshot.header_check);
    print_snapshot(&snapshot);

    println!("7. Next page (selection resets):");
    table.page_change(2).expect("pages start at 1");
    print_snapshot(&table.snapshot());

    println!("=== Example Complete ===");
}
