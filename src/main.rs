use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use paratext_features::features::{volume_features, PageFeatures, VolumeSkip};
use paratext_features::lexicon::Lexicons;
use paratext_features::{meta, output};

/// Volumes handed to the worker pool per batch.
const CHUNK_SIZE: usize = 64;

#[derive(Parser)]
#[command(
    name = "paratext_features",
    about = "Turn page-segmented volume text into a paratext/body-text feature matrix"
)]
struct Cli {
    /// Path to the metadata table (TSV with htid, title, inferred_date)
    #[arg(short = 'm', long)]
    meta: PathBuf,
    /// Folder containing the normalized per-volume text files
    #[arg(short = 'f', long)]
    folder: PathBuf,
    /// Path for the per-page feature matrix (the volume table lands beside it)
    #[arg(short = 'o', long)]
    output: PathBuf,
}

#[derive(Default)]
struct BatchCounts {
    processed: usize,
    pages: usize,
    missing: usize,
    failed: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let lexicons = Lexicons::load();
    let metadata = meta::load(&cli.meta)?;
    info!("{} unique volumes in metadata", metadata.order.len());

    let pb = ProgressBar::new(metadata.order.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut counts = BatchCounts::default();
    let mut allpages: Vec<PageFeatures> = Vec::new();

    for chunk in metadata.order.chunks(CHUNK_SIZE) {
        let results: Vec<(&String, Result<Vec<PageFeatures>, VolumeSkip>)> = chunk
            .par_iter()
            .map(|htid| (htid, volume_features(htid, &cli.folder, &lexicons)))
            .collect();

        for (htid, result) in results {
            match result {
                Ok(pages) => {
                    counts.processed += 1;
                    counts.pages += pages.len();
                    allpages.extend(pages);
                }
                Err(skip @ VolumeSkip::MissingSource(_)) => {
                    warn!("skipping {}: {}", htid, skip);
                    counts.missing += 1;
                }
                Err(skip) => {
                    warn!("skipping {}: {}", htid, skip);
                    counts.failed += 1;
                }
            }
            pb.inc(1);
        }
    }

    pb.finish_and_clear();

    println!("Total volumes: {}", counts.processed);
    println!("Total pages:   {}", counts.pages);
    if counts.missing + counts.failed > 0 {
        println!(
            "Skipped:       {} ({} missing text, {} failed)",
            counts.missing + counts.failed,
            counts.missing,
            counts.failed
        );
    }

    output::write_page_matrix(&cli.output, &allpages)?;
    info!("wrote page matrix to {}", cli.output.display());

    let volume_path = output::volume_output_path(&cli.output);
    let merged = output::write_volume_matrix(&volume_path, &allpages, &metadata)?;
    println!("Total volumes after metadata merge: {}", merged);
    info!("wrote volume table to {}", volume_path.display());

    println!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}
