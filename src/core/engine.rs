use crate::core::{CardLayout, Catalog, Pipeline, RunSummary};
use crate::domain::model::{CardFailure, ENTRIES_PER_CARD};
use crate::utils::error::{BingoError, Result};
use crate::utils::monitor::SystemMonitor;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs the card batch: load once, then shuffle → layout → render → save per
/// card. A failing card is logged and recorded; the next card still runs.
pub struct BingoEngine<P: Pipeline> {
    pipeline: Arc<P>,
    monitor: SystemMonitor,
    concurrency: usize,
}

impl<P: Pipeline + 'static> BingoEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, enable_monitoring: bool) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            monitor: SystemMonitor::new(enable_monitoring),
            concurrency: 1,
        }
    }

    /// Cards produced at the same time. 1 keeps strict card order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn load_catalog(&self) -> Result<Arc<Catalog>> {
        let catalog = self.pipeline.load_catalog().await?;
        tracing::info!("📋 Loaded {} distinct entries", catalog.len());
        self.monitor.log_stats("Catalog loaded");
        Ok(Arc::new(catalog))
    }

    pub async fn run(&self, num_cards: u32) -> Result<RunSummary> {
        let catalog = self.load_catalog().await?;
        self.run_with_catalog(catalog, num_cards).await
    }

    /// Layout of a single card, nothing rendered or written.
    pub fn preview(&self, catalog: &Catalog, card_number: u32) -> Result<CardLayout> {
        ensure_capacity(catalog)?;
        self.pipeline.layout_card(catalog, card_number)
    }

    pub async fn run_with_catalog(
        &self,
        catalog: Arc<Catalog>,
        num_cards: u32,
    ) -> Result<RunSummary> {
        if num_cards == 0 {
            tracing::info!("No cards requested, nothing to do");
            return Ok(RunSummary::default());
        }

        // 先檢查條目數量，任何卡片開始前就失敗
        ensure_capacity(&catalog)?;

        tracing::info!(
            "🎲 Generating {} cards ({} at a time)",
            num_cards,
            self.concurrency
        );

        let outcomes = if self.concurrency <= 1 {
            self.run_sequential(catalog, num_cards).await
        } else {
            self.run_concurrent(catalog, num_cards).await
        };

        let mut summary = RunSummary {
            requested: num_cards,
            ..RunSummary::default()
        };

        for (card_number, outcome) in outcomes {
            match outcome {
                Ok(location) => {
                    tracing::info!("✅ Card #{} saved to {}", card_number, location);
                    summary.written.push(location);
                }
                Err(e) => {
                    if e.is_fatal() {
                        tracing::error!("❌ Card #{} skipped: {}", card_number, e);
                    } else {
                        tracing::warn!("⚠️ Card #{} skipped: {}", card_number, e);
                    }
                    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                    summary.failures.push(CardFailure {
                        card_number,
                        message: e.user_friendly_message(),
                    });
                }
            }
        }

        self.monitor.log_stats("Cards generated");
        self.monitor
            .log_final_stats(summary.written.len(), summary.failures.len());

        Ok(summary)
    }

    async fn run_sequential(
        &self,
        catalog: Arc<Catalog>,
        num_cards: u32,
    ) -> Vec<(u32, Result<String>)> {
        let mut outcomes = Vec::with_capacity(num_cards as usize);
        for card_number in 1..=num_cards {
            let pipeline = Arc::clone(&self.pipeline);
            let outcome = produce_and_save(pipeline, Arc::clone(&catalog), card_number).await;
            outcomes.push((card_number, outcome));
        }
        outcomes
    }

    async fn run_concurrent(
        &self,
        catalog: Arc<Catalog>,
        num_cards: u32,
    ) -> Vec<(u32, Result<String>)> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let handles: Vec<_> = (1..=num_cards)
            .map(|card_number| {
                let semaphore = Arc::clone(&semaphore);
                let pipeline = Arc::clone(&self.pipeline);
                let catalog = Arc::clone(&catalog);
                let handle = tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| BingoError::TaskError(e.to_string()))?;
                    produce_and_save(pipeline, catalog, card_number).await
                });
                (card_number, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (card_number, handle) in handles {
            // a panicking card only loses itself
            let outcome = handle
                .await
                .unwrap_or_else(|e| Err(BingoError::TaskError(e.to_string())));
            outcomes.push((card_number, outcome));
        }
        outcomes
    }
}

async fn produce_and_save<P: Pipeline>(
    pipeline: Arc<P>,
    catalog: Arc<Catalog>,
    card_number: u32,
) -> Result<String> {
    let card = pipeline.produce_card(catalog, card_number).await?;
    pipeline.save_card(card).await
}

fn ensure_capacity(catalog: &Catalog) -> Result<()> {
    if catalog.can_fill_card() {
        Ok(())
    } else {
        Err(BingoError::InsufficientEntries {
            available: catalog.len(),
            required: ENTRIES_PER_CARD,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RenderedCard, WordEntry};
    use crate::domain::model::card_file_name;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records which cards were produced; fails saving for `fail_on`.
    struct RecordingPipeline {
        catalog_size: usize,
        fail_on: Option<u32>,
        produced: Mutex<Vec<u32>>,
        saved: AtomicUsize,
    }

    impl RecordingPipeline {
        fn new(catalog_size: usize, fail_on: Option<u32>) -> Self {
            Self {
                catalog_size,
                fail_on,
                produced: Mutex::new(Vec::new()),
                saved: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn load_catalog(&self) -> Result<Catalog> {
            Ok(Catalog::new(
                (0..self.catalog_size)
                    .map(|i| WordEntry::new(format!("Artist {}", i), format!("Song {}", i)))
                    .collect(),
            ))
        }

        fn layout_card(&self, catalog: &Catalog, card_number: u32) -> Result<CardLayout> {
            let card = crate::core::shuffle::Shuffler::default().shuffle_card(
                catalog,
                card_number,
                "Test",
            );
            crate::core::layout::GridLayoutEngine::default().layout(&card)
        }

        async fn produce_card(
            &self,
            _catalog: Arc<Catalog>,
            card_number: u32,
        ) -> Result<RenderedCard> {
            self.produced.lock().unwrap().push(card_number);
            Ok(RenderedCard {
                card_number,
                file_name: card_file_name(card_number),
                bytes: b"%PDF-fake".to_vec(),
            })
        }

        async fn save_card(&self, card: RenderedCard) -> Result<String> {
            if Some(card.card_number) == self.fail_on {
                return Err(BingoError::SaveFailure {
                    path: card.file_name,
                    message: "disk full".to_string(),
                });
            }
            self.saved.fetch_add(1, Ordering::SeqCst);
            Ok(card.file_name)
        }
    }

    #[tokio::test]
    async fn test_sequential_run_in_card_order() {
        let engine = BingoEngine::new(RecordingPipeline::new(30, None));
        let summary = engine.run(3).await.unwrap();

        assert_eq!(summary.requested, 3);
        assert_eq!(summary.written, vec!["bingo_1.pdf", "bingo_2.pdf", "bingo_3.pdf"]);
        assert!(summary.all_succeeded());
        assert_eq!(*engine.pipeline().produced.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_zero_cards() {
        let engine = BingoEngine::new(RecordingPipeline::new(30, None));
        let summary = engine.run(0).await.unwrap();

        assert!(summary.written.is_empty());
        assert!(summary.all_succeeded());
        assert!(engine.pipeline().produced.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_cards_with_short_catalog_succeeds() {
        let engine = BingoEngine::new(RecordingPipeline::new(23, None));
        let summary = engine.run(0).await.unwrap();

        assert_eq!(summary.requested, 0);
        assert!(summary.written.is_empty());
        assert!(summary.all_succeeded());
    }

    #[tokio::test]
    async fn test_insufficient_entries_before_any_card() {
        let engine = BingoEngine::new(RecordingPipeline::new(23, None));
        let err = engine.run(5).await.unwrap_err();

        assert!(matches!(
            err,
            BingoError::InsufficientEntries {
                available: 23,
                required: 24
            }
        ));
        assert!(engine.pipeline().produced.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_does_not_stop_batch() {
        let engine = BingoEngine::new(RecordingPipeline::new(24, Some(2)));
        let summary = engine.run(4).await.unwrap();

        assert_eq!(summary.written, vec!["bingo_1.pdf", "bingo_3.pdf", "bingo_4.pdf"]);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].card_number, 2);
        assert_eq!(engine.pipeline().saved.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_concurrent_run_isolates_failures() {
        let engine =
            BingoEngine::new(RecordingPipeline::new(30, Some(5))).with_concurrency(4);
        let summary = engine.run(8).await.unwrap();

        assert_eq!(summary.written.len(), 7);
        assert_eq!(summary.failures[0].card_number, 5);
        // 結果依卡號排序
        assert_eq!(summary.written[0], "bingo_1.pdf");
        assert_eq!(summary.written[6], "bingo_8.pdf");

        let mut produced = engine.pipeline().produced.lock().unwrap().clone();
        produced.sort();
        assert_eq!(produced, (1..=8).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn test_preview_checks_capacity() {
        let engine = BingoEngine::new(RecordingPipeline::new(23, None));
        let catalog = engine.load_catalog().await.unwrap();
        assert!(engine.preview(&catalog, 1).is_err());

        let engine = BingoEngine::new(RecordingPipeline::new(24, None));
        let catalog = engine.load_catalog().await.unwrap();
        let layout = engine.preview(&catalog, 1).unwrap();
        assert_eq!(layout.entries().len(), 24);
    }
}
