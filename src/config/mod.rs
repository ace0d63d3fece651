pub mod cli;
pub mod toml_config;

pub const DEFAULT_INPUT_FILE: &str = "words.txt";
pub const DEFAULT_NUM_CARDS: u32 = 10;
pub const DEFAULT_TITLE: &str = "Hemit Musikkbingo";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_FONT_FAMILY: &str = "OpenSans";
pub const MAX_CONCURRENT_CARDS: usize = 64;

/// `words.txt` in the directory of the running executable, falling back to
/// the working directory.
pub fn default_input_file() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_INPUT_FILE)))
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| DEFAULT_INPUT_FILE.to_string())
}

#[cfg(feature = "cli")]
pub use self::cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::*;
    use crate::core::ConfigProvider;
    use crate::domain::model::LayoutSettings;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_existing_dir, validate_non_empty_string, validate_path, validate_range,
        Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
    #[command(name = "music-bingo")]
    #[command(about = "Generate printable music bingo cards as PDF files")]
    pub struct CliConfig {
        /// Word list, one "Song-Artist" per line [default: words.txt next to the executable]
        pub input_file: Option<String>,

        /// Number of cards to generate [default: 10]
        pub num_cards: Option<u32>,

        /// Accepted but unused: cards are always saved as bingo_<N>.pdf
        pub output_file: Option<String>,

        /// TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Directory the card PDFs are written to [default: .]
        #[arg(long)]
        pub output_dir: Option<String>,

        /// Title printed at the top of every card
        #[arg(long)]
        pub title: Option<String>,

        /// Cards generated in parallel [default: 1]
        #[arg(long)]
        pub concurrent_cards: Option<usize>,

        /// Seed for reproducible shuffles
        #[arg(long)]
        pub seed: Option<u64>,

        /// Directory with <Family>-{Regular,Bold,Italic,BoldItalic}.ttf
        #[arg(long)]
        pub fonts_dir: Option<String>,

        /// Font family looked up in --fonts-dir [default: OpenSans]
        #[arg(long)]
        pub font_family: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage")]
        pub monitor: bool,

        #[arg(long, help = "Print the layout of card 1 as JSON and exit")]
        pub dry_run: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// Fills in the executable-relative default for the input file.
        pub fn with_default_input(mut self) -> Self {
            if self.input_file.is_none() {
                self.input_file = Some(default_input_file());
            }
            self
        }
    }

    impl ConfigProvider for CliConfig {
        fn input_file(&self) -> &str {
            self.input_file.as_deref().unwrap_or(DEFAULT_INPUT_FILE)
        }

        fn num_cards(&self) -> u32 {
            self.num_cards.unwrap_or(DEFAULT_NUM_CARDS)
        }

        fn title(&self) -> &str {
            self.title.as_deref().unwrap_or(DEFAULT_TITLE)
        }

        fn output_path(&self) -> &str {
            self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)
        }

        fn concurrent_cards(&self) -> usize {
            self.concurrent_cards.unwrap_or(1)
        }

        fn seed(&self) -> Option<u64> {
            self.seed
        }

        fn fonts_dir(&self) -> Option<&str> {
            self.fonts_dir.as_deref()
        }

        fn font_family(&self) -> &str {
            self.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
        }

        fn layout_settings(&self) -> LayoutSettings {
            LayoutSettings::default()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("input_file", self.input_file())?;
            validate_path("output_dir", self.output_path())?;
            validate_non_empty_string("title", self.title())?;
            validate_range(
                "concurrent_cards",
                self.concurrent_cards(),
                1,
                MAX_CONCURRENT_CARDS,
            )?;
            if let Some(dir) = self.fonts_dir() {
                validate_existing_dir("fonts_dir", dir)?;
            }
            Ok(())
        }
    }

}
