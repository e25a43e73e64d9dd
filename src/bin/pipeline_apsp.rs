use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use seqclust::cli::ApspArgs;
use seqclust::comm::{Comm, MpiComm};
use seqclust::dist::Layout;
use seqclust::report::{self, ApspSummary};
use seqclust::{apsp, dot, matio};
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

    let args = ApspArgs::parse();
    if let Err(e) = run(&comm, &args) {
        eprintln!("Error: {:#}", e);
        comm.abort(1);
    }
}

fn run(comm: &MpiComm, args: &ApspArgs) -> Result<()> {
    let started = Utc::now();
    let coordinator = comm.rank() == 0;

    // The coordinator reads the graph; any input error aborts the group
    // before the engine starts.
    let mut n = 0usize;
    let mut adjacency = Vec::new();
    if coordinator {
        let (nodes, adj) = dot::read_dot(&args.dot)?;
        n = nodes;
        adjacency = adj;
    }

    // Replicate the adjacency matrix to every participant.
    n = comm.broadcast_scalar(n as i32, 0) as usize;
    if !coordinator {
        adjacency = vec![0i32; n * n];
    }
    comm.broadcast_i32s(&mut adjacency, 0);

    let layout = Layout::choose(n, comm.size());
    if coordinator && !args.quiet && !args.json {
        println!(
            "[INFO] matrix {0} x {0}, blocks {1} x {1} of {2} x {2}, grid {3} x {4}, {5} participants",
            n, layout.nb, layout.block, layout.rows, layout.cols, comm.size()
        );
    }
    if coordinator && layout.fallback {
        eprintln!(
            "[WARN] {1} participants do not tile {0} x {0} as a square grid; adaptive block size {2} in use",
            n,
            comm.size(),
            layout.block
        );
    }

    comm.barrier();
    let timer = Instant::now();
    let result = apsp::run_on(comm, n, &adjacency, layout);
    comm.barrier();
    let elapsed_ms = timer.elapsed().as_secs_f64() * 1000.0;

    if let Some(distances) = result {
        matio::write_matrix(&args.output, &distances, n, n)?;

        let summary = ApspSummary {
            started,
            n,
            block: layout.block,
            blocks_per_dim: layout.nb,
            grid_rows: layout.rows,
            grid_cols: layout.cols,
            participants: comm.size(),
            fallback_layout: layout.fallback,
            elapsed_ms,
            output: args.output.display().to_string(),
        };
        if args.json {
            report::print_json(&summary)?;
        } else if !args.quiet {
            report::print_apsp_summary(&summary);
        }
    }

    Ok(())
}
