use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use seqclust::cli::PamArgs;
use seqclust::comm::{Comm, MpiComm};
use seqclust::matio;
use seqclust::pam::{self, PamOptions};
use seqclust::report::{self, PamSummary};
use std::process;
use std::time::Instant;

fn main() {
    let comm = match MpiComm::init() {
        Ok(comm) => comm,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let args = PamArgs::parse();
    if let Err(e) = run(&comm, &args) {
        eprintln!("Error: {:#}", e);
        comm.abort(1);
    }
}

fn run(comm: &MpiComm, args: &PamArgs) -> Result<()> {
    let started = Utc::now();
    let coordinator = comm.rank() == 0;

    // The coordinator reads the matrix and checks the preconditions; any
    // error aborts the group before the engine starts.
    let mut n = 0usize;
    let mut distances = Vec::new();
    if coordinator {
        let (nodes, matrix) = matio::read_matrix(&args.distances)?;
        anyhow::ensure!(
            args.k >= 1 && args.k <= nodes,
            "k must be between 1 and {}, got {}",
            nodes,
            args.k
        );
        n = nodes;
        distances = matrix;
        if !args.quiet && !args.json {
            println!("[INFO] {0} x {0} distance matrix, k = {1}", n, args.k);
        }
    }

    // Replicate the distance matrix.
    n = comm.broadcast_scalar(n as i32, 0) as usize;
    if !coordinator {
        distances = vec![0i32; n * n];
    }
    comm.broadcast_i32s(&mut distances, 0);

    let options = PamOptions {
        k: args.k,
        seed: args.seed,
    };

    comm.barrier();
    let timer = Instant::now();
    let result = pam::run(comm, n, &distances, &options);
    comm.barrier();
    let elapsed_ms = timer.elapsed().as_secs_f64() * 1000.0;

    if let Some(clustering) = result {
        report::write_pam_result(&args.output, &clustering)?;

        let summary = PamSummary {
            started,
            n,
            k: args.k,
            medoids: clustering.medoids.clone(),
            total_cost: clustering.total_cost,
            participants: comm.size(),
            elapsed_ms,
            output: args.output.display().to_string(),
        };
        if args.json {
            report::print_json(&summary)?;
        } else if !args.quiet {
            report::print_pam_summary(&summary);
        }
    }

    Ok(())
}
