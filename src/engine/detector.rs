// ============================================================================
// Price Anomaly Detector
// Service layer: judging single prices and ingesting bulk histories
// ============================================================================

use super::classifier::HistoryClassifier;
use super::errors::AnomalyError;
use crate::api::{ItemPriceRequest, ItemPriceResponse};
use crate::domain::{DetectorConfig, PriceObservation, PriceSeries, TrackedItem};
use crate::ingest::{parse_price_table, PriceBatch};
use crate::interfaces::{AnomalyEvent, AnomalyJudge, EventHandler, ItemRepository, Judgment};
use crate::numeric::NumericResult;
use crate::storage::{CacheStats, JudgmentCache, JudgmentKey};
use chrono::Utc;
use rust_decimal::Decimal;
use std::io::BufRead;
use std::sync::Arc;
use uuid::Uuid;

/// Summary of one committed bulk ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    pub batch_id: Uuid,
    pub items: usize,
    pub outliers: usize,
    pub non_outliers: usize,
}

/// Price anomaly detector with a pluggable judge
pub struct PriceAnomalyDetector {
    /// Configuration the detector was built from
    config: DetectorConfig,

    /// Judge for single-price checks
    judge: Box<dyn AnomalyJudge>,

    /// Bulk classifier used on ingestion
    classifier: HistoryClassifier,

    /// Item store; must make `modify` atomic per item id
    repository: Arc<dyn ItemRepository>,

    /// Optional memo of pure judgments
    cache: Option<JudgmentCache>,

    /// Event handler for processing events
    event_handler: Arc<dyn EventHandler>,
}

impl PriceAnomalyDetector {
    /// Create a new detector
    pub fn new(
        config: DetectorConfig,
        judge: Box<dyn AnomalyJudge>,
        repository: Arc<dyn ItemRepository>,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        let cache = config.cache_ttl.map(JudgmentCache::new);
        Self {
            classifier: HistoryClassifier::new(config.algorithm),
            config,
            judge,
            repository,
            cache,
            event_handler,
        }
    }

    // ========================================================================
    // Single-price check
    // ========================================================================

    /// Judge `price` against the item's accepted history, then record it.
    ///
    /// Judging, appending and persisting happen as one `modify` on the
    /// repository, so concurrent checks on the same item never lose an
    /// append. A cached judgment only skips the arithmetic; the observation
    /// is always recorded.
    pub fn check_price(&self, item_id: &str, price: Decimal) -> Result<Judgment, AnomalyError> {
        let observation = PriceObservation::now(price)?;

        let mut outcome: Option<NumericResult<(Judgment, bool)>> = None;
        let updated = self.repository.modify(item_id, &mut |item| {
            let result = self.judge_item(item, price);
            if let Ok((judgment, _)) = &result {
                item.record(observation, judgment.anomaly);
            }
            outcome = Some(result);
        });

        if updated.is_none() {
            return Err(self.not_found(item_id));
        }

        let (judgment, cached) = outcome.ok_or_else(|| self.not_found(item_id))??;

        tracing::debug!(
            item_id,
            %price,
            anomaly = judgment.anomaly,
            cached,
            judge = self.judge.name(),
            "price judged"
        );

        self.event_handler.on_event(AnomalyEvent::PriceJudged {
            item_id: item_id.to_string(),
            price,
            anomaly: judgment.anomaly,
            cached,
            timestamp: Utc::now(),
        });

        Ok(judgment)
    }

    fn judge_item(&self, item: &TrackedItem, price: Decimal) -> NumericResult<(Judgment, bool)> {
        let Some(cache) = &self.cache else {
            return Ok((self.judge.judge(item.non_outliers.as_slice(), price)?, false));
        };

        let key = JudgmentKey::new(item.id.as_str(), item.generation(), price);
        if let Some(judgment) = cache.get(&key) {
            return Ok((judgment, true));
        }

        let judgment = self.judge.judge(item.non_outliers.as_slice(), price)?;
        cache.insert(key, judgment);
        Ok((judgment, false))
    }

    // ========================================================================
    // Bulk ingestion
    // ========================================================================

    /// Classify every item of `batch` and store the results, replacing any
    /// previous history of those items.
    ///
    /// All items are classified before the first save, so a failure leaves
    /// the repository untouched.
    pub fn ingest(&self, batch: PriceBatch) -> Result<IngestionReport, AnomalyError> {
        let mut histories = Vec::with_capacity(batch.len());
        for (item_id, observations) in batch {
            let series = PriceSeries::from_unsorted(observations);
            histories.push(self.classifier.classify(item_id, series)?);
        }

        let batch_id = Uuid::new_v4();
        let mut report = IngestionReport {
            batch_id,
            items: histories.len(),
            outliers: 0,
            non_outliers: 0,
        };
        let mut events = Vec::with_capacity(histories.len());

        for history in histories {
            report.outliers += history.outliers.len();
            report.non_outliers += history.non_outliers.len();
            events.push(AnomalyEvent::HistoryClassified {
                batch_id,
                item_id: history.item_id.clone(),
                outliers: history.outliers.len(),
                non_outliers: history.non_outliers.len(),
                timestamp: Utc::now(),
            });

            let saved = self.repository.save(history.into_tracked_item());
            // Older generations can no longer be hit; free their entries early
            if let Some(cache) = &self.cache {
                cache.invalidate(&saved.id);
            }
        }

        tracing::info!(
            %batch_id,
            items = report.items,
            outliers = report.outliers,
            non_outliers = report.non_outliers,
            "price history ingested"
        );

        self.event_handler.on_events(events);
        Ok(report)
    }

    /// Parse a price table and ingest it. A malformed table is rejected as a
    /// whole, naming the failing line.
    pub fn ingest_table<R: BufRead>(&self, reader: R) -> Result<IngestionReport, AnomalyError> {
        let batch = match parse_price_table(reader) {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!(line = err.line, reason = %err.kind, "price table rejected");
                self.event_handler.on_event(AnomalyEvent::IngestionRejected {
                    line: err.line,
                    reason: err.kind.to_string(),
                    timestamp: Utc::now(),
                });
                return Err(err.into());
            },
        };

        self.ingest(batch)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn find_item(&self, item_id: &str) -> Result<TrackedItem, AnomalyError> {
        self.repository
            .load(item_id)
            .ok_or_else(|| self.not_found(item_id))
    }

    fn not_found(&self, item_id: &str) -> AnomalyError {
        tracing::debug!(item_id, "item not found");
        self.event_handler.on_event(AnomalyEvent::ItemNotFound {
            item_id: item_id.to_string(),
            timestamp: Utc::now(),
        });
        AnomalyError::not_found(item_id)
    }

    // ========================================================================
    // Public surface
    // ========================================================================

    /// Check a request and answer with a status-coded response
    pub fn handle_check(&self, request: &ItemPriceRequest) -> ItemPriceResponse {
        let result = request
            .validate()
            .and_then(|price| self.check_price(&request.item_id, price));

        match result {
            Ok(judgment) => ItemPriceResponse::judged(request.item_id.as_str(), request.price, judgment.anomaly),
            Err(err) => {
                tracing::warn!(item_id = %request.item_id, error = %err, "price check failed");
                ItemPriceResponse::from_error(&err)
            },
        }
    }

    /// Ingest an uploaded price table
    pub fn handle_upload<R: BufRead>(&self, reader: R) -> ItemPriceResponse {
        match self.ingest_table(reader) {
            Ok(_) => ItemPriceResponse::uploaded(),
            Err(err) => ItemPriceResponse::from_error(&err),
        }
    }

    /// Fetch an item, or the not-found response
    pub fn handle_lookup(&self, item_id: &str) -> Result<TrackedItem, ItemPriceResponse> {
        self.find_item(item_id)
            .map_err(|err| ItemPriceResponse::from_error(&err))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn judge_name(&self) -> &str {
        self.judge.name()
    }

    /// Counters of the judgment cache, if enabled
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(JudgmentCache::stats)
    }
}
