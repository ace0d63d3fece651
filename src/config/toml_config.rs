use crate::config::{
    default_input_file, DEFAULT_FONT_FAMILY, DEFAULT_NUM_CARDS, DEFAULT_OUTPUT_DIR,
    DEFAULT_TITLE, MAX_CONCURRENT_CARDS,
};
use crate::core::ConfigProvider;
use crate::domain::model::{LayoutSettings, PageGeometry};
use crate::utils::error::{BingoError, Result};
use crate::utils::validation::{
    validate_existing_dir, validate_non_empty_string, validate_path, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File-based configuration. Every section and field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub card: CardConfig,
    pub layout: LayoutConfig,
    pub fonts: FontsConfig,
    pub output: OutputConfig,
    pub generation: GenerationConfig,
    pub monitoring: MonitoringConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file: default_input_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub title: String,
    pub count: u32,
    pub free_word: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            count: DEFAULT_NUM_CARDS,
            free_word: LayoutSettings::default().free_word,
        }
    }
}

/// Page and text geometry. Lengths in millimetres, font sizes in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub entry_font_size: f32,
    pub title_font_size: f32,
    pub line_height: f32,
    pub border_thickness: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let defaults = LayoutSettings::default();
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 20.0,
            entry_font_size: defaults.entry_font_size,
            title_font_size: defaults.title_font_size,
            line_height: defaults.line_height,
            border_thickness: defaults.border_thickness,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    pub directory: Option<String>,
    pub family: String,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            directory: None,
            family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub concurrent_cards: usize,
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            concurrent_cards: 1,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
    pub verbose: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BingoError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BingoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BingoError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command-line values win over the file.
    #[cfg(feature = "cli")]
    pub fn with_cli_overrides(mut self, cli: &crate::config::CliConfig) -> Self {
        if let Some(input_file) = &cli.input_file {
            self.input.file = input_file.clone();
        }
        if let Some(num_cards) = cli.num_cards {
            self.card.count = num_cards;
        }
        if let Some(title) = &cli.title {
            self.card.title = title.clone();
        }
        if let Some(output_dir) = &cli.output_dir {
            self.output.directory = output_dir.clone();
        }
        if let Some(concurrent) = cli.concurrent_cards {
            self.generation.concurrent_cards = concurrent;
        }
        if cli.seed.is_some() {
            self.generation.seed = cli.seed;
        }
        if cli.fonts_dir.is_some() {
            self.fonts.directory = cli.fonts_dir.clone();
        }
        if let Some(family) = &cli.font_family {
            self.fonts.family = family.clone();
        }
        self.monitoring.enabled |= cli.monitor;
        self.logging.json |= cli.json_logs;
        self.logging.verbose |= cli.verbose;
        self
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("input.file", &self.input.file)?;
        validate_path("output.directory", &self.output.directory)?;
        validate_non_empty_string("card.title", &self.card.title)?;
        validate_non_empty_string("card.free_word", &self.card.free_word)?;

        validate_range(
            "generation.concurrent_cards",
            self.generation.concurrent_cards,
            1,
            MAX_CONCURRENT_CARDS,
        )?;

        let layout = &self.layout;
        validate_range("layout.page_width_mm", layout.page_width_mm, 50.0, 2000.0)?;
        validate_range("layout.page_height_mm", layout.page_height_mm, 50.0, 2000.0)?;
        let max_margin = layout.page_width_mm.min(layout.page_height_mm) / 4.0;
        validate_range("layout.margin_mm", layout.margin_mm, 0.0, max_margin)?;
        validate_range("layout.entry_font_size", layout.entry_font_size, 1.0, 72.0)?;
        validate_range("layout.title_font_size", layout.title_font_size, 1.0, 144.0)?;
        validate_range("layout.line_height", layout.line_height, 0.5, 5.0)?;
        validate_range("layout.border_thickness", layout.border_thickness, 0.0, 10.0)?;

        if let Some(dir) = &self.fonts.directory {
            validate_existing_dir("fonts.directory", dir)?;
            validate_non_empty_string("fonts.family", &self.fonts.family)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl ConfigProvider for TomlConfig {
    fn input_file(&self) -> &str {
        &self.input.file
    }

    fn num_cards(&self) -> u32 {
        self.card.count
    }

    fn title(&self) -> &str {
        &self.card.title
    }

    fn output_path(&self) -> &str {
        &self.output.directory
    }

    fn concurrent_cards(&self) -> usize {
        self.generation.concurrent_cards
    }

    fn seed(&self) -> Option<u64> {
        self.generation.seed
    }

    fn fonts_dir(&self) -> Option<&str> {
        self.fonts.directory.as_deref()
    }

    fn font_family(&self) -> &str {
        &self.fonts.family
    }

    fn layout_settings(&self) -> LayoutSettings {
        let layout = &self.layout;
        LayoutSettings {
            page: PageGeometry::from_mm(
                layout.page_width_mm,
                layout.page_height_mm,
                layout.margin_mm,
            ),
            entry_font_size: layout.entry_font_size,
            title_font_size: layout.title_font_size,
            line_height: layout.line_height,
            border_thickness: layout.border_thickness,
            free_word: self.card.free_word.clone(),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
