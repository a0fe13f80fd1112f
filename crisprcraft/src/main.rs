use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, DesignArgs};
use crate::config::DesignerConfig;
use crate::data_handling::sequence_source::SequenceSource;
use crate::models::PamPreset;
use crate::pipeline::{run_design, DesignOutcome, DesignRequest};

mod analysis;
mod cli;
mod config;
mod data_handling;
mod guide_design;
mod helper_functions;
mod models;
mod pipeline;
mod prediction_tools;
mod reporting;

fn design(args: DesignArgs) -> Result<()> {
    let mut config = DesignerConfig::load_or_default(args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if args.max_guides.is_some() {
        config.max_guides = args.max_guides;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }

    let source = SequenceSource::from_args(args.input, args.sequence)?;
    let pam = args.pam.pattern(args.custom_pam.as_deref());
    info!("Designing guides with PAM {}", pam);

    let request = DesignRequest {
        source,
        pam,
        config,
        render_plots: !args.no_plots,
        write_pdf: !args.no_pdf,
    };

    match run_design(request)? {
        DesignOutcome::NoCandidates { sequence_id, pam } => {
            println!("No gRNAs found with the given PAM sequence ({pam}) in `{sequence_id}`.");
        }
        DesignOutcome::Completed { summary, files } => {
            if summary.efficiency_source.is_fallback() {
                warn!("Efficiency column holds random placeholder values");
            }
            println!("--- CRISPRCraft gRNA summary ---");
            for line in summary.lines() {
                println!("{line}");
            }
            println!();
            for file in files {
                println!("Wrote {}", file.display());
            }
        }
    }
    Ok(())
}

fn list_pams() {
    for preset in PamPreset::value_variants() {
        let name = preset
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        let pattern = match preset {
            PamPreset::Other => "-".to_string(),
            other => other.pattern(None),
        };
        println!("{:<6} {:<4} {}", name, pattern, preset.description());
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Design(args) => design(args)?,
        Commands::Pams => list_pams(),
    }
    Ok(())
}

fn main() {
    // Setup logging; stdout is reserved for the run summary
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = try_main() {
        error!("{}", err);
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));
        std::process::exit(1);
    }
}
