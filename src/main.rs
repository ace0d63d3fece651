use anyhow::Context;
use clap::Parser;
use music_bingo::core::ConfigProvider;
use music_bingo::utils::{logger, validation::Validate};
use music_bingo::{
    BingoEngine, BingoError, BuiltinFontResolver, CardPipeline, CliConfig, DirectoryFontResolver,
    FontResolver, LocalStorage, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            // 載入 TOML 配置，命令列參數優先
            let config = match TomlConfig::from_file(&path) {
                Ok(config) => config.with_cli_overrides(&cli),
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            init_logging(config.logging.json, config.logging.verbose);
            tracing::info!("📁 Configuration loaded from: {}", path);
            let monitor = config.monitoring_enabled();
            generate(config, &cli, monitor).await
        }
        None => {
            init_logging(cli.json_logs, cli.verbose);
            let monitor = cli.monitor;
            generate(cli.clone().with_default_input(), &cli, monitor).await
        }
    }
}

fn init_logging(json: bool, verbose: bool) {
    // 初始化日誌
    if json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
}

async fn generate<C>(config: C, cli: &CliConfig, monitor_enabled: bool) -> anyhow::Result<()>
where
    C: ConfigProvider + Validate + std::fmt::Debug + 'static,
{
    tracing::info!("🚀 Starting music-bingo");
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if let Some(output_file) = &cli.output_file {
        tracing::warn!(
            "OUTPUT_FILE {:?} is ignored; cards are saved as bingo_<N>.pdf",
            output_file
        );
    }

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let fonts = match select_fonts(&config) {
        Ok(fonts) => fonts,
        Err(e) => fail(e),
    };

    let num_cards = config.num_cards();
    let concurrency = config.concurrent_cards();
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = CardPipeline::new(storage, config, fonts);
    let engine =
        BingoEngine::new_with_monitoring(pipeline, monitor_enabled).with_concurrency(concurrency);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no files will be written");
        let preview = engine
            .load_catalog()
            .await
            .and_then(|catalog| engine.preview(&catalog, 1));
        let layout = match preview {
            Ok(layout) => layout,
            Err(e) => fail(e),
        };
        let json =
            serde_json::to_string_pretty(&layout).context("serializing the card layout")?;
        println!("{}", json);
        return Ok(());
    }

    match engine.run(num_cards).await {
        Ok(summary) => {
            for failure in &summary.failures {
                eprintln!("{}", failure.message);
            }
            println!(
                "✅ {} of {} cards written",
                summary.written.len(),
                summary.requested
            );
            if !summary.all_succeeded() {
                tracing::warn!("⚠️ {} cards could not be saved", summary.failures.len());
            }
            Ok(())
        }
        Err(e) => fail(e),
    }
}

fn select_fonts<C: ConfigProvider>(config: &C) -> music_bingo::Result<Box<dyn FontResolver>> {
    match config.fonts_dir() {
        Some(dir) => {
            let fonts = DirectoryFontResolver::load(dir, config.font_family())?;
            tracing::info!("🔤 Using font family {} from {}", fonts.family(), dir);
            Ok(Box::new(fonts))
        }
        None => Ok(Box::new(BuiltinFontResolver)),
    }
}

fn fail(e: BingoError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Card generation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("{}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}
