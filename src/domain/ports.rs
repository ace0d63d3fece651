use crate::domain::model::{CardLayout, Catalog, LayoutSettings, RenderedCard};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Human-readable location of `path`, used in logs and the run summary.
    fn describe(&self, path: &str) -> String {
        path.to_string()
    }
}

pub trait ConfigProvider: Send + Sync {
    fn input_file(&self) -> &str;
    fn num_cards(&self) -> u32;
    fn title(&self) -> &str;
    fn output_path(&self) -> &str;
    fn concurrent_cards(&self) -> usize;
    fn seed(&self) -> Option<u64>;
    fn fonts_dir(&self) -> Option<&str>;
    fn font_family(&self) -> &str;
    fn layout_settings(&self) -> LayoutSettings;
}

/// Card production stages. `produce_card` covers shuffle, layout and render;
/// only `save_card` touches the outside world.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn load_catalog(&self) -> Result<Catalog>;
    /// Shuffle and layout only, no rendering.
    fn layout_card(&self, catalog: &Catalog, card_number: u32) -> Result<CardLayout>;
    async fn produce_card(&self, catalog: Arc<Catalog>, card_number: u32) -> Result<RenderedCard>;
    async fn save_card(&self, card: RenderedCard) -> Result<String>;
}
