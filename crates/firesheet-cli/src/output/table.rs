use firesheet_core::model::{LineItem, ParsedDocument, ParsedRecords, SpecRecord};
use firesheet_core::report::reader::PricedBoq;

pub fn print_parsed(parsed: &ParsedDocument) {
    println!("=== {} ({}) ===\n", parsed.source, parsed.doc_type());
    match &parsed.records {
        ParsedRecords::Boq { items } => print_line_items(items),
        ParsedRecords::Spec { records } => print_spec_records(records),
    }
}

fn print_line_items(items: &[LineItem]) {
    let desc_width = items
        .iter()
        .map(|i| i.description.chars().count())
        .max()
        .unwrap_or(11)
        .clamp(11, 60);

    println!(
        "  {:<6}  {:<desc_width$}  {:>10}  {:<6}  Category",
        "Item", "Description", "Quantity", "Unit"
    );
    println!("  {}", "-".repeat(6 + desc_width + 10 + 6 + 8 + 8));

    for item in items {
        let quantity = item
            .quantity
            .map(|q| q.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<6}  {:<desc_width$}  {:>10}  {:<6}  {}",
            item.item_no,
            truncate(&item.description, desc_width),
            quantity,
            item.unit,
            item.category
        );
    }
    println!("\n  {} line item(s)", items.len());
}

fn print_spec_records(records: &[SpecRecord]) {
    let spec_width = records
        .iter()
        .map(|r| r.specification.len())
        .max()
        .unwrap_or(13);

    let mut current = None;
    for record in records {
        if current != Some(record.category) {
            if current.is_some() {
                println!();
            }
            println!("  {}", record.category);
            current = Some(record.category);
        }
        println!(
            "    {:<spec_width$}  {}",
            record.specification, record.value
        );
    }
}

pub fn print_totals(boq: &PricedBoq) {
    let desc_width = boq
        .lines
        .iter()
        .map(|l| l.description.chars().count())
        .max()
        .unwrap_or(11)
        .clamp(11, 50);

    println!(
        "  {:<6}  {:<desc_width$}  {:>10}  {:>12}  {:>12}",
        "Item", "Description", "Quantity", "Unit Price", "Total"
    );
    println!("  {}", "-".repeat(6 + desc_width + 10 + 12 + 12 + 8));

    for line in &boq.lines {
        let quantity = line
            .quantity
            .map(|q| q.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<6}  {:<desc_width$}  {:>10}  {:>12}  {:>12}",
            line.item_no,
            truncate(&line.description, desc_width),
            quantity,
            line.unit_price.round_dp(2),
            line.total.round_dp(2)
        );
    }

    println!(
        "\n  {:>width$}  {:>12}",
        "TOTAL:",
        boq.grand_total.round_dp(2),
        width = 6 + desc_width + 10 + 12 + 6
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}
