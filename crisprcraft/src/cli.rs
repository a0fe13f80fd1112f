use std::path::PathBuf;

use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Args, Parser, Subcommand};

use crate::models::PamPreset;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightBlue.on_default().bold())
    .literal(AnsiColor::BrightBlue.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    name = "crisprcraft",
    version = VERSION,
    about = "Find and score CRISPR guide RNA sites next to a PAM motif",
    arg_required_else_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a sequence for gRNA candidates and export tables, plots and a PDF summary
    Design(DesignArgs),

    /// List the built-in PAM presets
    Pams,
}

#[derive(Args, Debug)]
pub struct DesignArgs {
    /// sequence file: .txt holds raw sequence, .fa/.fasta/.fna is FASTA (first record used)
    #[arg(short, long, conflicts_with = "sequence")]
    pub input: Option<PathBuf>,

    /// DNA sequence pasted directly on the command line
    #[arg(short, long)]
    pub sequence: Option<String>,

    #[arg(long, value_enum, default_value = "ngg")]
    pub pam: PamPreset,

    /// pattern used when --pam other; N matches any base
    #[arg(long, required_if_eq("pam", "other"))]
    pub custom_pam: Option<String>,

    /// directory for the CSV tables, histograms and PDF
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// keep at most this many candidates, in scan order
    #[arg(long)]
    pub max_guides: Option<usize>,

    /// seed for the random efficiency fallback
    #[arg(long)]
    pub seed: Option<u64>,

    /// skip the histogram PNGs
    #[arg(long)]
    pub no_plots: bool,

    /// skip the PDF summary
    #[arg(long)]
    pub no_pdf: bool,
}
