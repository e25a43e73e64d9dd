//! Partitioning around medoids with a distributed cost evaluator.
//!
//! The distance matrix is replicated on every participant. The coordinator
//! owns the medoid set and the swap decisions; cost evaluation is the only
//! distributed step, and it is a collective: every rank evaluates every
//! candidate, or the next all-reduce deadlocks. The search commits the best
//! improving swap of each pass and stops at a local optimum.

use crate::comm::Comm;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unreachable sentinel inside the cost computation. A vertex with no
/// reachable medoid contributes exactly this much, keeping the i64 total
/// far from overflow.
pub const INF: i32 = 100_000;

/// Engine configuration.
pub struct PamOptions {
    /// Number of clusters, 1 <= k <= n.
    pub k: usize,
    /// Seed for the medoid initialization; wall clock when absent.
    pub seed: Option<u64>,
}

/// Clustering produced on the coordinator.
#[derive(Debug, Clone)]
pub struct PamResult {
    /// The k selected medoid vertices.
    pub medoids: Vec<usize>,
    /// For each vertex, the index into `medoids` of its cluster.
    pub cluster_of: Vec<usize>,
    /// For each vertex, the distance to its medoid.
    pub dist_to_medoid: Vec<i32>,
    /// Sum of `dist_to_medoid` over all vertices.
    pub total_cost: i64,
}

/// Run the medoid search. Returns the clustering on rank 0, `None` elsewhere.
pub fn run(comm: &impl Comm, n: usize, dist: &[i32], options: &PamOptions) -> Option<PamResult> {
    let k = options.k;
    debug_assert!(k >= 1 && k <= n);
    debug_assert_eq!(dist.len(), n * n);

    // The coordinator draws k distinct vertices; everyone else receives them.
    let mut medoids = vec![0i32; k];
    if comm.rank() == 0 {
        let seed = options.seed.unwrap_or_else(wall_clock_seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices: Vec<i32> = (0..n as i32).collect();
        indices.shuffle(&mut rng);
        medoids.copy_from_slice(&indices[..k]);
    }
    comm.broadcast_i32s(&mut medoids, 0);

    let mut best_cost = cost_distributed(comm, n, dist, &medoids);

    loop {
        let mut improved = false;
        let mut best_cost_this_pass = best_cost;
        let mut best_medoids_this_pass = medoids.clone();

        // Every (medoid slot, non-medoid vertex) swap is a candidate. The
        // enumeration order is identical on all ranks because the current
        // medoid set is.
        for m_idx in 0..k {
            for h in 0..n as i32 {
                if medoids.contains(&h) {
                    continue;
                }
                let mut candidate = medoids.clone();
                candidate[m_idx] = h;

                let cost = cost_distributed(comm, n, dist, &candidate);
                if comm.rank() == 0 && cost < best_cost_this_pass {
                    best_cost_this_pass = cost;
                    best_medoids_this_pass = candidate;
                    improved = true;
                }
            }
        }

        // The coordinator alone knows whether the pass improved anything.
        let flag = comm.broadcast_scalar(improved as i32, 0);
        if flag == 0 {
            break;
        }

        if comm.rank() == 0 {
            medoids = best_medoids_this_pass;
            best_cost = best_cost_this_pass;
        }
        comm.broadcast_i32s(&mut medoids, 0);
    }

    if comm.rank() != 0 {
        return None;
    }

    Some(assign(n, dist, &medoids))
}

/// Total cost of a candidate medoid set, split over contiguous row ranges.
///
/// Collective: every participant must call this with the same candidate.
fn cost_distributed(comm: &impl Comm, n: usize, dist: &[i32], medoids: &[i32]) -> i64 {
    let chunk = (n + comm.size() - 1) / comm.size();
    let start = (comm.rank() * chunk).min(n);
    let end = n.min(start + chunk);

    let mut local: i64 = 0;
    for i in start..end {
        local += nearest(dist, n, medoids, i).1 as i64;
    }

    comm.all_reduce_sum(local)
}

/// Closest medoid slot and distance for vertex `i`; ties keep the smallest
/// slot index.
fn nearest(dist: &[i32], n: usize, medoids: &[i32], i: usize) -> (usize, i32) {
    let mut best_slot = 0;
    let mut best_dist = INF;
    for (slot, &m) in medoids.iter().enumerate() {
        let d = dist[i * n + m as usize];
        if d < best_dist {
            best_dist = d;
            best_slot = slot;
        }
    }
    (best_slot, best_dist)
}

/// Coordinator-only final pass: per-vertex cluster, distance and total cost.
fn assign(n: usize, dist: &[i32], medoids: &[i32]) -> PamResult {
    let mut cluster_of = vec![0usize; n];
    let mut dist_to_medoid = vec![0i32; n];
    let mut total_cost: i64 = 0;

    for i in 0..n {
        let (slot, d) = nearest(dist, n, medoids, i);
        cluster_of[i] = slot;
        dist_to_medoid[i] = d;
        total_cost += d as i64;
    }

    PamResult {
        medoids: medoids.iter().map(|&m| m as usize).collect(),
        cluster_of,
        dist_to_medoid,
        total_cost,
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
