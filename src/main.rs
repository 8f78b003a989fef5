// Earnings Reconciliation - CLI
// Compares an ASCAP statement against a BMI statement and writes the report

use anyhow::{bail, Result};
use chrono::Local;
use earnings_recon::{
    pipeline, render, AscapParser, BmiParser, MatchEngine, RoyaltyParser,
};
use std::env;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: earnings-recon <ascap.csv> <bmi.csv> [output_dir]");
        std::process::exit(2);
    }

    let ascap_path = Path::new(&args[1]);
    let bmi_path = Path::new(&args[2]);
    let out_dir = match args.get(3) {
        Some(dir) => PathBuf::from(dir),
        None => {
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(format!("earnings_comparison_report_{}", timestamp))
        }
    };

    if !ascap_path.exists() || !bmi_path.exists() {
        bail!("One or both CSV files not found");
    }

    println!("⚖️  Earnings Reconciliation");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Ingest both statements
    println!("\n📂 Loading statements...");
    let records_a = AscapParser.parse(ascap_path)?;
    println!("✓ ASCAP: {} records from {}", records_a.len(), ascap_path.display());
    let records_b = BmiParser.parse(bmi_path)?;
    println!("✓ BMI:   {} records from {}", records_b.len(), bmi_path.display());

    // 2. Run the engine
    println!("\n🔍 Reconciling...");
    let outcome = pipeline::run(&MatchEngine::new(), &records_a, &records_b);
    for warning in &outcome.warnings {
        println!("⚠️  {}", warning);
    }

    // 3. Write the report sheets
    println!("\n🖨️  Writing report...");
    render::write_report(&outcome.report, &out_dir)?;
    println!("✓ Report written to {}/", out_dir.display());

    // 4. Run statistics
    let report = &outcome.report;
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total shows analyzed: {}", report.summary.len());
    println!("Episode rows:         {}", report.episode_breakdown.len());
    println!("Rows only in ASCAP:   {}", report.unmatched_a_detail.len());
    println!("Rows only in BMI:     {}", report.unmatched_b_detail.len());

    Ok(())
}
