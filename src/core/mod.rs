pub mod engine;
pub mod fonts;
pub mod layout;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod shuffle;

pub use crate::domain::model::{
    BingoCard, CardLayout, Catalog, GridCell, RenderedCard, RunSummary, WordEntry,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
