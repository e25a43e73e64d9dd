use clap::Parser;
use std::path::PathBuf;

/// Arguments of the sequence-comparison stage.
#[derive(Parser)]
#[command(name = "pipeline_build_matrix")]
#[command(about = "Compute pairwise Hamming distances between sequences and emit a weighted DOT graph", long_about = None)]
#[command(version)]
pub struct BuildMatrixArgs {
    /// FASTA file with equal-length sequences
    pub fasta: PathBuf,

    /// Distance threshold: an edge is emitted only if the Hamming distance is strictly below it
    #[arg(short, long, default_value = "70")]
    pub epsilon: i32,

    /// Output DOT file
    #[arg(short, long, default_value = "sequences.dot")]
    pub output: PathBuf,

    /// Output JSON summary instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Suppress human-readable output (useful with --json)
    #[arg(long)]
    pub quiet: bool,
}

/// Arguments of the shortest-path stage.
#[derive(Parser)]
#[command(name = "pipeline_apsp")]
#[command(about = "Compute all-pairs shortest paths of a weighted DOT graph with blocked parallel Floyd-Warshall", long_about = None)]
#[command(version)]
pub struct ApspArgs {
    /// Weighted undirected graph in DOT format
    pub dot: PathBuf,

    /// Output distance-matrix text file
    #[arg(short, long, default_value = "distances.txt")]
    pub output: PathBuf,

    /// Output JSON summary instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Suppress human-readable output (useful with --json)
    #[arg(long)]
    pub quiet: bool,
}

/// Arguments of the clustering stage.
#[derive(Parser)]
#[command(name = "pipeline_pam")]
#[command(about = "Partition a distance matrix around k medoids (PAM)", long_about = None)]
#[command(version)]
pub struct PamArgs {
    /// Distance-matrix text file ("n m" header, then n rows of m integers)
    pub distances: PathBuf,

    /// Number of clusters
    #[arg(short, long, default_value = "4")]
    pub k: usize,

    /// Seed for medoid initialization (defaults to wall clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output partition text file
    #[arg(short, long, default_value = "clusters.txt")]
    pub output: PathBuf,

    /// Output JSON summary instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Suppress human-readable output (useful with --json)
    #[arg(long)]
    pub quiet: bool,
}
