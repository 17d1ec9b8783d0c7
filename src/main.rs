use clap::{Parser, Subcommand};
use snapcourier::address::Scheme;
use snapcourier::config::{self, CourierConfig};
use snapcourier::coordinator::{CaptureSource, TransferCoordinator};
use snapcourier::imaging::{ImageProcessor, ProcessConfig, read_capture};
use snapcourier::output;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snapcourier")]
#[command(about = "Send photos to a receiver on the local network")]
#[command(long_about = "\
Send photos to a receiver on the local network

The photo is downscaled to at most 1280 px wide, re-encoded as JPEG, and sent
over one of two transports:

  raw    TCP: 4-byte big-endian length, then the JPEG bytes
  http   POST /upload, multipart field \"file\" (foto.jpg, image/jpeg)

Addresses are host:port. An unparsable port falls back to 5000 unless
network.strict_port is set. For http, the port may be left out (80).

Run 'snapcourier gen-config' to generate a documented snapcourier.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = "snapcourier.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process an image and send it to a receiver
    Send {
        /// Image file to send
        image: PathBuf,
        /// Receiver address, host:port
        #[arg(long)]
        to: String,
        /// Transport: raw or http
        #[arg(long, default_value = "raw")]
        via: Scheme,
    },
    /// Process an image locally and write the JPEG that would be sent
    Prepare {
        /// Image file to process
        image: PathBuf,
        /// Where to write the processed JPEG
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a stock snapcourier.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Send { image, to, via } => {
            let config = load_and_init(&cli.config)?;
            let coordinator = Arc::new(TransferCoordinator::new(&config));
            let handle = coordinator.spawn_delivery(CaptureSource::Path(image), to, via);
            let mut printer = output::EventPrinter::default();
            for event in handle.events() {
                printer.print(&event);
            }
            let result = handle.wait();
            output::print_result(&result);
            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Command::Prepare { image, out } => {
            let config = load_and_init(&cli.config)?;
            let bytes = read_capture(&image)?;
            let processor = ImageProcessor::new(ProcessConfig::from_image_config(&config.image));
            let asset = processor.process(&bytes)?;
            std::fs::write(&out, asset.bytes())?;
            output::print_prepare_output(&asset, &out);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config and start logging. `RUST_LOG` wins over `logging.level`;
/// logs go to stderr so they don't interleave with progress lines on stdout.
fn load_and_init(path: &Path) -> Result<CourierConfig, config::ConfigError> {
    let config = config::load_config(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(config)
}
