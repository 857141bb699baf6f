use checkout_promo::application::evaluator::{
    generate_cart_discounts, generate_delivery_discounts,
};
use checkout_promo::interfaces::json::{InputReader, ResultWriter};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Pretty-print the result document.
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the cart-lines discount evaluator.
    CartLines {
        /// Input JSON document (stdin when omitted).
        input: Option<PathBuf>,
    },
    /// Run the delivery discount evaluator.
    Delivery {
        /// Input JSON document (stdin when omitted).
        input: Option<PathBuf>,
    },
}

/// Initialize tracing from the PROMO_LOG environment variable, defaulting
/// to "info".
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("PROMO_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<checkout_promo::domain::cart::FunctionInput> {
    let source: Box<dyn Read> = match path {
        Some(path) => Box::new(File::open(path).into_diagnostic()?),
        None => Box::new(io::stdin().lock()),
    };
    InputReader::new(source).read().into_diagnostic()
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::CartLines { input } => generate_cart_discounts(&read_input(input.as_ref())?),
        Command::Delivery { input } => {
            generate_delivery_discounts(&read_input(input.as_ref())?).into_diagnostic()?
        }
    };

    let stdout = io::stdout();
    let mut writer = ResultWriter::new(stdout.lock()).pretty(cli.pretty);
    writer.write(&result).into_diagnostic()?;

    Ok(())
}
