//! Coordinator-side run summaries and result files.

use crate::pam::PamResult;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Summary of one sequence-comparison run.
#[derive(Debug, Serialize)]
pub struct BuildSummary {
    pub started: DateTime<Utc>,
    pub sequences: usize,
    pub sequence_length: usize,
    pub epsilon: i32,
    pub edges: usize,
    pub participants: usize,
    pub elapsed_ms: f64,
    pub output: String,
}

/// Summary of one APSP run.
#[derive(Debug, Serialize)]
pub struct ApspSummary {
    pub started: DateTime<Utc>,
    pub n: usize,
    pub block: usize,
    pub blocks_per_dim: usize,
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub participants: usize,
    pub fallback_layout: bool,
    pub elapsed_ms: f64,
    pub output: String,
}

/// Summary of one clustering run.
#[derive(Debug, Serialize)]
pub struct PamSummary {
    pub started: DateTime<Utc>,
    pub n: usize,
    pub k: usize,
    pub medoids: Vec<usize>,
    pub total_cost: i64,
    pub participants: usize,
    pub elapsed_ms: f64,
    pub output: String,
}

/// Print human-readable build summary.
pub fn print_build_summary(summary: &BuildSummary) {
    println!(
        "\n{} sequences of length {}, epsilon {}: {} edges",
        summary.sequences, summary.sequence_length, summary.epsilon, summary.edges
    );
    println!("Elapsed:  {:.1} ms on {} participants", summary.elapsed_ms, summary.participants);
    println!("DOT graph written to: {}", summary.output);
}

/// Print human-readable APSP summary.
pub fn print_apsp_summary(summary: &ApspSummary) {
    println!(
        "\nDistances: {0} x {0} matrix, {1} x {1} blocks of {2} x {2}, grid {3} x {4}",
        summary.n, summary.blocks_per_dim, summary.block, summary.grid_rows, summary.grid_cols
    );
    println!("Elapsed:   {:.1} ms on {} participants", summary.elapsed_ms, summary.participants);
    println!("Distance matrix written to: {}", summary.output);
}

/// Print human-readable clustering summary.
pub fn print_pam_summary(summary: &PamSummary) {
    let medoids: Vec<String> = summary.medoids.iter().map(|m| m.to_string()).collect();
    println!("\nClusters:   k = {} over {} vertices", summary.k, summary.n);
    println!("Medoids:    {}", medoids.join(" "));
    println!("Total cost: {}", summary.total_cost);
    println!("Elapsed:    {:.1} ms on {} participants", summary.elapsed_ms, summary.participants);
    println!("Partition written to: {}", summary.output);
}

/// Print a summary as pretty JSON.
pub fn print_json<T: Serialize>(summary: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{}", json);
    Ok(())
}

/// Write the detailed partition file of a clustering run.
pub fn write_pam_result(path: &Path, result: &PamResult) -> Result<()> {
    let mut file = File::create(path)
        .context(format!("Failed to create result file {}", path.display()))?;

    let n = result.cluster_of.len();
    let k = result.medoids.len();

    writeln!(file, "# PAM results")?;
    writeln!(file, "# n = {}", n)?;
    writeln!(file, "# k = {}", k)?;
    writeln!(file, "# total_cost = {}", result.total_cost)?;
    writeln!(file)?;

    writeln!(file, "# medoids:")?;
    let medoids: Vec<String> = result.medoids.iter().map(|m| m.to_string()).collect();
    writeln!(file, "{}", medoids.join(" "))?;
    writeln!(file)?;

    writeln!(file, "# columns: vertex cluster medoid dist")?;
    for i in 0..n {
        let cluster = result.cluster_of[i];
        writeln!(
            file,
            "{} {} {} {}",
            i, cluster, result.medoids[cluster], result.dist_to_medoid[i]
        )?;
    }

    Ok(())
}
