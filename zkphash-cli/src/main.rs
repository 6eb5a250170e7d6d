//! zkphash CLI - circuit inputs for zero-knowledge perceptual-hash matching.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod exit_codes;
mod utils;

use exit_codes::{ExitCode, EXIT_CODES_HELP};

#[derive(Parser)]
#[command(name = "zkphash")]
#[command(author, version, about = "Circuit inputs for zero-knowledge perceptual-hash matching", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress human-readable output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute dbHash and imgCommitment and write the circuit input bundle
    Commit {
        /// pHash database ({"dbPhashs": [...]})
        #[arg(value_name = "DB_JSON")]
        db: PathBuf,

        /// Query image: JSON grid ({"image": [...]} or bare 32x32 array) or an image file
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Blinding scalar as a decimal integer (falls back to ZKPHASH_R2)
        #[arg(long)]
        r2: Option<String>,

        /// Similarity threshold written into the bundle (falls back to ZKPHASH_THRESHOLD, then 10)
        #[arg(short, long)]
        threshold: Option<u32>,

        /// Output path (defaults to <N>_circom_input.json next to DB_JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the mock hash instead of Poseidon (for testing)
        #[arg(long)]
        mock_hash: bool,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },

    /// Compute the circuit pHash of an image
    Phash {
        /// Image file or JSON grid
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Also write the pHash as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Convert an image into the circuit's {image, dct_coefficients} input
    Prepare {
        /// Image file to convert
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Output path (defaults to <stem>.json next to the image)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Hash every image under a directory into a padded pHash database
    BuildDb {
        /// Directory scanned recursively for images
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Number of database slots (falls back to ZKPHASH_DB_SIZE, then 512)
        #[arg(short, long)]
        size: Option<usize>,

        /// Output path (defaults to dbphashs_<SIZE>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "zkphash_core=debug,zkphash_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Commit {
            db,
            image,
            r2,
            threshold,
            output,
            mock_hash,
            json,
        } => commands::commit::execute(
            db,
            image,
            commands::commit::CommitOptions {
                r2,
                threshold,
                output,
                mock_hash,
                json,
            },
            cli.quiet,
        ),
        Commands::Phash {
            image,
            output,
            json,
        } => commands::phash::execute(image, output, json, cli.quiet),
        Commands::Prepare { image, output } => {
            commands::prepare::execute(image, output, cli.quiet)
        }
        Commands::BuildDb { dir, size, output } => {
            commands::build_db::execute(dir, size, output, cli.quiet)
        }
    };

    if let Err(err) = result {
        let exit = ExitCode::from_anyhow(&err);
        eprintln!("{} {}", "Error:".red().bold(), exit.message);
        std::process::exit(exit.code);
    }
}
