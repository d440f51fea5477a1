// ==============================================================================
// main.rs - Pharmacogenomic Risk Processor Entry Point
// ==============================================================================
// Description: CLI entry point running the analysis pipeline on a VCF file
// Author: Matt Barham
// Created: 2025-11-18
// Modified: 2025-11-24
// Version: 1.1.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pgx_processor::processor::PgxProcessor;
use pgx_processor::validator::{validate_file_extension, validate_file_size};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the patient VCF file (.vcf)
    #[arg(short, long)]
    vcf: PathBuf,

    /// Comma-separated drug selection (e.g., "Warfarin,Codeine")
    #[arg(short, long)]
    drugs: String,

    /// Patient identifier
    #[arg(short, long, env = "PGX_PATIENT_ID")]
    patient_id: String,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pgx_processor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Pharmacogenomic risk processor starting...");

    let args = Args::parse();

    let file_name = args
        .vcf
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    validate_file_extension(&file_name)?;

    let raw_vcf = std::fs::read_to_string(&args.vcf)
        .with_context(|| format!("Failed to read VCF file {:?}", args.vcf))?;
    validate_file_size(raw_vcf.len())?;

    let processor = PgxProcessor::default();
    let report = processor
        .analyze(&args.patient_id, &args.drugs, &raw_vcf)
        .await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
