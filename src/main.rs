use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, Level};

use template_compositor::{compose::CompositionEngine, config::Config};

#[derive(Parser)]
#[command(
    name = "template-compositor",
    version,
    about = "Replace a template's placeholder region with an image and overlay text",
    long_about = "Template-Compositor finds the dominant solid color in a template image, \
                  swaps that region for a cover-fitted source image, and draws centered \
                  text on top. Use a literal \\n in the text argument for line breaks."
)]
struct Cli {
    /// Template image containing a solid-color placeholder region
    template: PathBuf,

    /// Source image to fit into the placeholder region
    source: PathBuf,

    /// Output image path (format inferred from the extension)
    output: PathBuf,

    /// Text to overlay; literal \n sequences become line breaks
    text: String,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Font file to use, overriding the configured font path
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Template-Compositor v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(output) => {
            println!("Output saved to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Diagnostics go to stdout so scripting callers see them; the
            // exit code distinguishes the failure taxonomy entries.
            println!("{}", err.user_message());
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> template_compositor::Result<PathBuf> {
    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };

    if let Some(font) = cli.font {
        config.text.font_path = font;
    }
    config.validate()?;

    let engine = CompositionEngine::new(config);
    engine.compose(&cli.template, &cli.source, &cli.output, &cli.text)?;

    Ok(cli.output)
}
