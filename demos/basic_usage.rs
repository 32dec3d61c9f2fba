// ============================================================================
// Basic Usage Example
// ============================================================================

use price_anomaly::api::{response_headers, API_METHOD_IS_ANOMALY};
use price_anomaly::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

const PRICE_TABLE: &str = "ITEM_ID,PRICE,ORD_CLOSED_DT
MLA-100,116,2023-10-01
MLA-100,116,2023-10-02
MLA-100,109,2023-10-03
MLA-100,200,2023-10-04
MLA-100,110,2023-10-05
MLA-100,115,2023-10-06
MLA-100,110,2023-10-07
MLA-100,1100,2023-10-08
MLA-100,115,2023-10-09
MLA-100,110,2023-10-10
MLA-100,115,2023-10-11
MLA-100,110,2023-10-12
MLA-100,116,2023-10-13
MLA-100,20,2023-10-14
MLA-100,130,2023-10-15
";

#[cfg(feature = "logging")]
fn init_logging() {
    if let Err(err) = price_anomaly::utils::init_logging() {
        eprintln!("{}", err);
    }
}

#[cfg(not(feature = "logging"))]
fn init_logging() {}

fn main() {
    init_logging();

    println!("=== Price Anomaly Example ===\n");

    let detector = match DetectorBuilder::new()
        .window_size(10)
        .k_factor(Decimal::TWO)
        .build(Arc::new(LoggingEventHandler))
    {
        Ok(detector) => detector,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            return;
        },
    };

    println!("Created detector with {} judge\n", detector.judge_name());

    // Bulk upload
    println!("Uploading price history...");
    match detector.ingest_table(PRICE_TABLE.as_bytes()) {
        Ok(report) => println!(
            "  batch {}: {} item(s), {} non-outliers, {} outliers",
            report.batch_id, report.items, report.non_outliers, report.outliers
        ),
        Err(err) => {
            eprintln!("  upload failed: {}", err);
            return;
        },
    }

    if let Ok(item) = detector.find_item("MLA-100") {
        println!("\n=== Classified History ===");
        println!("Non-outliers: {:?}", item.non_outliers.prices());
        println!("Outliers:     {:?}", item.outliers.prices());
    }

    // Single-price checks
    println!("\n=== Price Checks ===");
    for price in [113, 125, 5000] {
        let request = ItemPriceRequest::new("MLA-100", Decimal::from(price));
        let response = detector.handle_check(&request);
        println!(
            "  {} -> anomaly={} status={}",
            price,
            response.anomaly.as_deref().unwrap_or("-"),
            response.status_code
        );
    }

    println!("\nResponse headers:");
    for (name, value) in response_headers(API_METHOD_IS_ANOMALY) {
        println!("  {}: {}", name, value);
    }

    // Unknown item
    let missing = detector.handle_check(&ItemPriceRequest::new("MLA-404", Decimal::from(10)));
    println!("\nUnknown item -> status={} ({})", missing.status_code, missing.metadata.message);

    if let Some(stats) = detector.cache_stats() {
        println!(
            "\nCache: {} hit(s), {} miss(es), {} entr(ies)",
            stats.hits, stats.misses, stats.entries
        );
    }
}
