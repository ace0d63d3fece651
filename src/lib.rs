pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use core::{
    engine::BingoEngine,
    fonts::{BuiltinFontResolver, DirectoryFontResolver, FontResolver},
    pipeline::CardPipeline,
};
pub use utils::error::{BingoError, Result};
