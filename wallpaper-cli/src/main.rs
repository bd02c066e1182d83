//! # Wallpaper Studio
//!
//! Command-line entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wallpaper_cli::{CliArgs, Studio, StudioConfig};

/// Initialize tracing on stderr, leaving stdout for command output.
///
/// Set `RUST_LOG` to control log levels.
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "wallpaper_cli=info,wallpaper_export=info,wallpaper_renderer=info,wallpaper_core=info",
        )
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let command = args.command.clone();
    let config = StudioConfig::from(args);

    tracing::debug!(
        "Data in {}, downloads to {}",
        config.data_dir.display(),
        config.out_dir.display()
    );
    if config.generator.offline {
        tracing::info!("Offline mode: remote generation disabled");
    }

    let studio = Studio::open(&config)?;
    let stdout = std::io::stdout();
    studio.run(command, &mut stdout.lock()).await
}
