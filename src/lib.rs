// ============================================================================
// Price Anomaly Library
// Decimal-exact price anomaly detection with pluggable judges
// ============================================================================

//! # Price Anomaly
//!
//! Flags whether a newly observed price for a tracked item is statistically
//! anomalous relative to its history, and classifies bulk-imported histories
//! into normal and outlier observations.
//!
//! ## Features
//!
//! - **Fixed-precision statistics**: quartiles, IQR fences, mean and
//!   population standard deviation at 10 significant digits, round-half-up
//! - **Pluggable judges**: moving-window SMA ± k·σ, or Tukey fences
//! - **Bulk classification** of ingested price tables
//! - **Per-item atomic updates** over a lock-free item store
//! - **Judgment memoization** that never skips recording an observation
//! - **Event hooks** for auditing and logging
//!
//! ## Example
//!
//! ```rust
//! use price_anomaly::prelude::*;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let detector = DetectorBuilder::new()
//!     .window_size(10)
//!     .build(Arc::new(NoOpEventHandler))
//!     .unwrap();
//!
//! let table = "ITEM_ID,PRICE,ORD_CLOSED_DT\n\
//!              MLA-1,116,2023-10-01\n\
//!              MLA-1,116,2023-10-02\n\
//!              MLA-1,109,2023-10-03\n\
//!              MLA-1,110,2023-10-04\n\
//!              MLA-1,115,2023-10-05\n";
//! let report = detector.ingest_table(table.as_bytes()).unwrap();
//! println!("{} outliers in {} items", report.outliers, report.items);
//!
//! let judgment = detector.check_price("MLA-1", Decimal::from(900)).unwrap();
//! println!("anomaly: {}", judgment.anomaly);
//! ```

pub mod api;
pub mod domain;
pub mod engine;
pub mod ingest;
pub mod interfaces;
pub mod numeric;
pub mod storage;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::api::{ItemPriceRequest, ItemPriceResponse};
    pub use crate::domain::{
        AlgorithmConfig, ClassifiedHistory, DetectorConfig, JudgeType, PriceObservation,
        PriceSeries, TrackedItem,
    };
    pub use crate::engine::{
        create_from_config, AnomalyError, DetectorBuilder, HistoryClassifier, IngestionReport,
        IqrJudge, PriceAnomalyDetector, QuartileMethod, WindowJudge,
    };
    pub use crate::ingest::{parse_price_table, IngestionError, PriceBatch};
    pub use crate::interfaces::{
        AcceptanceBand, AnomalyEvent, AnomalyJudge, EventHandler, ItemRepository, Judgment,
        LoggingEventHandler, NoOpEventHandler, RecordingEventHandler,
    };
    pub use crate::storage::InMemoryItemRepository;
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    const REGRESSION_TABLE: &str = "ITEM_ID,PRICE,ORD_CLOSED_DT\n\
        test-product,116,2023-10-01\n\
        test-product,116,2023-10-02\n\
        test-product,109,2023-10-03\n\
        test-product,200,2023-10-04\n\
        test-product,110,2023-10-05\n\
        test-product,115,2023-10-06\n\
        test-product,110,2023-10-07\n\
        test-product,1100,2023-10-08\n\
        test-product,115,2023-10-09\n\
        test-product,110,2023-10-10\n\
        test-product,115,2023-10-11\n\
        test-product,110,2023-10-12\n\
        test-product,116,2023-10-13\n\
        test-product,20,2023-10-14\n\
        test-product,130,2023-10-15\n";

    #[test]
    fn test_end_to_end_upload_then_check() {
        let events = Arc::new(RecordingEventHandler::new());
        let detector = DetectorBuilder::new().build(events.clone()).unwrap();

        let report = detector.ingest_table(REGRESSION_TABLE.as_bytes()).unwrap();
        assert_eq!(report.items, 1);
        assert_eq!(report.non_outliers, 11);
        assert_eq!(report.outliers, 4);

        let item = detector.find_item("test-product").unwrap();
        let accepted = item.non_outliers.prices();
        assert!(!accepted.contains(&dec!(1100)));
        assert!(!accepted.contains(&dec!(20)));

        // Accepted history hovers around 109..116
        assert!(detector.check_price("test-product", dec!(5000)).unwrap().anomaly);
        assert!(!detector.check_price("test-product", dec!(113)).unwrap().anomaly);

        let item = detector.find_item("test-product").unwrap();
        assert_eq!(item.outliers.len(), 5);
        assert_eq!(item.non_outliers.len(), 12);

        let judged = events
            .drain()
            .into_iter()
            .filter(|event| matches!(event, AnomalyEvent::PriceJudged { .. }))
            .count();
        assert_eq!(judged, 2);
    }

    #[test]
    fn test_seeded_history_through_repository() {
        let repository = Arc::new(InMemoryItemRepository::new());
        let mut item = TrackedItem::new("MLA-1");
        for (day, price) in [(1, 100), (2, 105), (3, 110)] {
            let timestamp = Utc.with_ymd_and_hms(2023, 10, day, 0, 0, 0).unwrap();
            item.record(PriceObservation::new(timestamp, Decimal::from(price)).unwrap(), false);
        }
        repository.save(item);

        let detector = DetectorBuilder::new()
            .window_size(3)
            .k_factor(dec!(2))
            .with_repository(repository)
            .build(Arc::new(NoOpEventHandler))
            .unwrap();

        let anomalous = detector.handle_check(&ItemPriceRequest::new("MLA-1", dec!(150)));
        assert_eq!(anomalous.anomaly.as_deref(), Some("true"));

        let normal = detector.handle_check(&ItemPriceRequest::new("MLA-1", dec!(106)));
        assert_eq!(normal.anomaly.as_deref(), Some("false"));
    }

    #[test]
    fn test_lookup_unknown_item() {
        let detector = DetectorBuilder::new()
            .build(Arc::new(NoOpEventHandler))
            .unwrap();

        assert!(matches!(
            detector.find_item("ghost"),
            Err(AnomalyError::NotFound { .. })
        ));
        assert_eq!(detector.handle_lookup("ghost").unwrap_err().status_code, "404");
    }

    #[test]
    fn test_quartile_judge_end_to_end() {
        let detector = DetectorBuilder::new()
            .quartile_judge()
            .build(Arc::new(NoOpEventHandler))
            .unwrap();
        detector.ingest_table(REGRESSION_TABLE.as_bytes()).unwrap();

        assert!(detector.check_price("test-product", dec!(500)).unwrap().anomaly);
        assert!(!detector.check_price("test-product", dec!(112)).unwrap().anomaly);
    }
}
