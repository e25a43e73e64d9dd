//! Pairwise Hamming distances over a replicated sequence corpus.
//!
//! The parallel structure is a plain row partition: rank r computes the
//! contiguous rows [r * chunk, min(n, (r+1) * chunk)) of the n x n distance
//! matrix, and the coordinator stitches the row bands back together in rank
//! order.

use crate::comm::Comm;

/// Number of positions at which two equal-length strings differ.
pub fn hamming(a: &[u8], b: &[u8]) -> i32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).filter(|(x, y)| x != y).count() as i32
}

/// Compute the full Hamming distance matrix of `n` sequences of `length`
/// bytes packed contiguously in `sequences` (replicated on every rank).
///
/// Returns the dense matrix on rank 0, `None` elsewhere.
pub fn build_distance_matrix(
    comm: &impl Comm,
    n: usize,
    length: usize,
    sequences: &[u8],
) -> Option<Vec<i32>> {
    debug_assert_eq!(sequences.len(), n * length);

    let chunk = (n + comm.size() - 1) / comm.size();
    let start = (comm.rank() * chunk).min(n);
    let end = n.min(start + chunk);

    let mut local = vec![0i32; (end - start) * n];
    for i in start..end {
        let seq_i = &sequences[i * length..(i + 1) * length];
        let row = &mut local[(i - start) * n..(i - start + 1) * n];
        for (j, cell) in row.iter_mut().enumerate() {
            let seq_j = &sequences[j * length..(j + 1) * length];
            *cell = if i == j { 0 } else { hamming(seq_i, seq_j) };
        }
    }

    // Row bands come home in rank order, so sends and receives pair up
    // without tags.
    let mut full = if comm.rank() == 0 {
        Some(vec![0i32; n * n])
    } else {
        None
    };

    for r in 0..comm.size() {
        let r_start = (r * chunk).min(n);
        let r_end = n.min(r_start + chunk);
        if r_start == r_end {
            continue;
        }

        if let Some(full) = full.as_mut() {
            let dest = &mut full[r_start * n..r_end * n];
            if r == 0 {
                dest.copy_from_slice(&local);
            } else {
                comm.recv_i32s(dest, r);
            }
        } else if comm.rank() == r {
            comm.send_i32s(&local, 0);
        }
    }

    full
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::SoloComm;

    #[test]
    fn hamming_counts_mismatches() {
        assert_eq!(hamming(b"ACGT", b"ACGT"), 0);
        assert_eq!(hamming(b"ACGT", b"ACGA"), 1);
        assert_eq!(hamming(b"AAAA", b"TTTT"), 4);
    }

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let seqs = b"ACGTACGAACTTTTTT";
        let n = 4;
        let dist = build_distance_matrix(&SoloComm, n, 4, seqs).unwrap();
        for i in 0..n {
            assert_eq!(dist[i * n + i], 0);
            for j in 0..n {
                assert_eq!(dist[i * n + j], dist[j * n + i]);
            }
        }
        assert_eq!(dist[1], 1); // ACGT vs ACGA
        assert_eq!(dist[3], 3); // ACGT vs TTTT
    }
}
