use crate::core::fonts::FontResolver;
use crate::core::layout::GridLayoutEngine;
use crate::core::loader::load_catalog_async;
use crate::core::render::DocumentRenderer;
use crate::core::shuffle::Shuffler;
use crate::core::{CardLayout, Catalog, ConfigProvider, Pipeline, RenderedCard, Storage};
use crate::utils::error::{BingoError, Result};
use std::sync::Arc;

pub struct CardPipeline<S: Storage, C: ConfigProvider, F: FontResolver> {
    storage: S,
    config: C,
    shuffler: Shuffler,
    layout: GridLayoutEngine,
    renderer: Arc<DocumentRenderer<F>>,
}

impl<S: Storage, C: ConfigProvider, F: FontResolver> CardPipeline<S, C, F> {
    pub fn new(storage: S, config: C, fonts: F) -> Self {
        let settings = config.layout_settings();
        Self {
            shuffler: Shuffler::new(config.seed()),
            layout: GridLayoutEngine::new(settings.clone()),
            renderer: Arc::new(DocumentRenderer::new(fonts, settings)),
            storage,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<S, C, F> Pipeline for CardPipeline<S, C, F>
where
    S: Storage,
    C: ConfigProvider,
    F: FontResolver + 'static,
{
    async fn load_catalog(&self) -> Result<Catalog> {
        tracing::debug!("Reading word list from: {}", self.config.input_file());
        load_catalog_async(self.config.input_file().to_string()).await
    }

    fn layout_card(&self, catalog: &Catalog, card_number: u32) -> Result<CardLayout> {
        let card = self
            .shuffler
            .shuffle_card(catalog, card_number, self.config.title());
        self.layout.layout(&card)
    }

    async fn produce_card(&self, catalog: Arc<Catalog>, card_number: u32) -> Result<RenderedCard> {
        let layout = self.layout_card(&catalog, card_number)?;

        // PDF 產生是純 CPU 工作，放到 blocking pool
        let renderer = Arc::clone(&self.renderer);
        tokio::task::spawn_blocking(move || renderer.render(&layout))
            .await
            .map_err(|e| BingoError::TaskError(e.to_string()))?
    }

    async fn save_card(&self, card: RenderedCard) -> Result<String> {
        let location = self.storage.describe(&card.file_name);
        self.storage
            .write_file(&card.file_name, &card.bytes)
            .await
            .map_err(|e| BingoError::SaveFailure {
                path: location.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!("Saved card #{} to {}", card.card_number, location);
        Ok(location)
    }
}
