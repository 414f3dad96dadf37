mod app;
mod layout;
mod settings;
mod text;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use settings::{Args, Settings};

/// `RUST_LOG`-style directives, falling back to `info` when absent or malformed.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_tracing() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let settings = Settings::resolve(&args)?;
    info!(
        file = ?args.file,
        word_limit = settings.params.word_limit,
        related_words_limit = settings.params.related_words_limit,
        scale = settings.params.scale,
        "starting word-bubbles"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    let start_file = args.file;
    eframe::run_native(
        "word-bubbles",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::WordBubblesApp::new(
                cc,
                settings,
                start_file,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run the viewer: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
    }

    #[test]
    fn log_filter_uses_given_directives() {
        let filter = log_filter(Some("word_bubbles=debug"));
        assert!(filter.to_string().contains("word_bubbles=debug"));
    }
}
