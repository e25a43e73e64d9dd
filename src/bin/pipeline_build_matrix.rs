use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use seqclust::cli::BuildMatrixArgs;
use seqclust::comm::{Comm, MpiComm};
use seqclust::report::{self, BuildSummary};
use seqclust::{dot, fasta, hamming};
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

    let args = BuildMatrixArgs::parse();
    if let Err(e) = run(&comm, &args) {
        eprintln!("Error: {:#}", e);
        comm.abort(1);
    }
}

fn run(comm: &MpiComm, args: &BuildMatrixArgs) -> Result<()> {
    let started = Utc::now();
    let coordinator = comm.rank() == 0;

    // The coordinator reads and validates the corpus; any error aborts the
    // group before the parallel section.
    let mut count = 0usize;
    let mut length = 0usize;
    let mut sequences = Vec::new();
    if coordinator {
        let records = fasta::read_fasta(&args.fasta)?;
        let pack = fasta::pack_sequences(&records)?;
        count = pack.count;
        length = pack.length;
        sequences = pack.bytes;
        if !args.quiet && !args.json {
            println!("[INFO] {} sequences of length {}", count, length);
        }
    }

    // Replicate the packed corpus.
    count = comm.broadcast_scalar(count as i32, 0) as usize;
    length = comm.broadcast_scalar(length as i32, 0) as usize;
    if !coordinator {
        sequences = vec![0u8; count * length];
    }
    comm.broadcast_bytes(&mut sequences, 0);

    comm.barrier();
    let timer = Instant::now();
    let result = hamming::build_distance_matrix(comm, count, length, &sequences);
    comm.barrier();
    let elapsed_ms = timer.elapsed().as_secs_f64() * 1000.0;

    if let Some(distances) = result {
        let edges = dot::write_dot(&args.output, &distances, count, args.epsilon)?;

        let summary = BuildSummary {
            started,
            sequences: count,
            sequence_length: length,
            epsilon: args.epsilon,
            edges,
            participants: comm.size(),
            elapsed_ms,
            output: args.output.display().to_string(),
        };
        if args.json {
            report::print_json(&summary)?;
        } else if !args.quiet {
            report::print_build_summary(&summary);
        }
    }

    Ok(())
}
