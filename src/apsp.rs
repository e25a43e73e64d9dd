//! Blocked 2-D parallel Floyd-Warshall.
//!
//! The adjacency matrix is assumed identical on every participant. Each
//! participant materializes only its own blocks; per pivot-block index the
//! engine runs four phases: the pivot owner relaxes and broadcasts the
//! pivot block (blocking), the row- and column-strip owners relax their
//! blocks and broadcast them (non-blocking, joined before use), and every
//! participant relaxes its inner blocks against the received strips. The
//! coordinator finally gathers all blocks into the dense result; other
//! ranks return no result.

use crate::comm::Comm;
use crate::dist::Layout;
use crate::kernels::{fw_block, fw_col, fw_inner, fw_row, INF};

/// Run APSP with the layout chosen for this participant count.
///
/// Returns the dense n x n distance matrix on rank 0, `None` elsewhere.
pub fn run(comm: &impl Comm, n: usize, adjacency: &[i32]) -> Option<Vec<i32>> {
    run_on(comm, n, adjacency, Layout::choose(n, comm.size()))
}

/// Run APSP with an explicit layout. Any layout with a positive block size
/// and rows * cols == size yields the same result as [`sequential`].
pub fn run_on(comm: &impl Comm, n: usize, adjacency: &[i32], layout: Layout) -> Option<Vec<i32>> {
    debug_assert_eq!(adjacency.len(), n * n);
    debug_assert_eq!(layout.rows * layout.cols, comm.size());

    let mut state = State::init(&layout, comm.rank(), adjacency);
    state.pivot_loop(comm);
    state.gather(comm)
}

/// Per-participant APSP state, created at engine entry and dropped at exit.
struct State {
    layout: Layout,
    /// Owned blocks, b*b cells each, contiguous.
    data: Vec<i32>,
    /// (bi, bj) -> slot into `data`, None when the block lives elsewhere.
    index: Vec<Option<usize>>,
}

impl State {
    /// Carve this rank's blocks out of the replicated adjacency matrix.
    ///
    /// Cell encoding: INF outside the live n x n region (padding), 0 on the
    /// diagonal, INF where the adjacency holds 0 (absent edge), the edge
    /// weight otherwise.
    fn init(layout: &Layout, rank: usize, adjacency: &[i32]) -> State {
        let n = layout.n;
        let b = layout.block;
        let area = b * b;
        let blocks = layout.local_blocks(rank);

        let mut index = vec![None; layout.nb * layout.nb];
        for (slot, info) in blocks.iter().enumerate() {
            index[info.bi * layout.nb + info.bj] = Some(slot);
        }

        let mut data = vec![INF; blocks.len() * area];
        for (slot, info) in blocks.iter().enumerate() {
            let block = &mut data[slot * area..(slot + 1) * area];
            for ii in 0..b {
                let gi = info.offset_i + ii;
                for jj in 0..b {
                    let gj = info.offset_j + jj;
                    block[ii * b + jj] = if gi >= n || gj >= n {
                        INF
                    } else if gi == gj {
                        0
                    } else if adjacency[gi * n + gj] == 0 {
                        INF
                    } else {
                        adjacency[gi * n + gj]
                    };
                }
            }
        }

        State {
            layout: *layout,
            data,
            index,
        }
    }

    fn slot(&self, bi: usize, bj: usize) -> Option<usize> {
        self.index[bi * self.layout.nb + bj]
    }

    /// Main loop over pivot-block indices.
    fn pivot_loop(&mut self, comm: &impl Comm) {
        let layout = self.layout;
        let nb = layout.nb;
        let b = layout.block;
        let area = b * b;
        let rank = comm.rank();

        // Scratch for the current pivot's strips, indexed by block column
        // (row strip) and block row (column strip).
        let mut row_blocks: Vec<Vec<i32>> = vec![vec![INF; area]; nb];
        let mut col_blocks: Vec<Vec<i32>> = vec![vec![INF; area]; nb];
        let mut pivot = vec![INF; area];

        for kk in 0..nb {
            let pivot_owner = layout.owner(kk, kk);
            let bs = layout.live(kk);

            // Phase A: the pivot owner relaxes the pivot block, then every
            // participant joins the blocking broadcast.
            pivot.fill(INF);
            if pivot_owner == rank {
                if let Some(slot) = self.slot(kk, kk) {
                    let block = &mut self.data[slot * area..(slot + 1) * area];
                    fw_block(block, bs, b);
                    pivot.copy_from_slice(block);
                }
            }
            comm.broadcast_i32s(&mut pivot, pivot_owner);
            row_blocks[kk].copy_from_slice(&pivot);
            col_blocks[kk].copy_from_slice(&pivot);

            // Phase B1: owners relax the pivot's row strip, then all strip
            // blocks are broadcast non-blocking and joined together.
            let row_owners: Vec<usize> = (0..nb).map(|jb| layout.owner(kk, jb)).collect();
            for jb in 0..nb {
                if jb == kk || row_owners[jb] != rank {
                    continue;
                }
                if let Some(slot) = self.slot(kk, jb) {
                    let w_j = layout.live(jb);
                    let block = &mut self.data[slot * area..(slot + 1) * area];
                    fw_row(&pivot, block, bs, w_j, b);
                    row_blocks[jb].copy_from_slice(block);
                }
            }
            comm.broadcast_blocks(&mut row_blocks, &row_owners, kk);

            // Phase B2: same for the pivot's column strip.
            let col_owners: Vec<usize> = (0..nb).map(|ib| layout.owner(ib, kk)).collect();
            for ib in 0..nb {
                if ib == kk || col_owners[ib] != rank {
                    continue;
                }
                if let Some(slot) = self.slot(ib, kk) {
                    let h_i = layout.live(ib);
                    let block = &mut self.data[slot * area..(slot + 1) * area];
                    fw_col(block, &pivot, h_i, bs, b);
                    col_blocks[ib].copy_from_slice(block);
                }
            }
            comm.broadcast_blocks(&mut col_blocks, &col_owners, kk);

            // Phase C: every received strip is in place; relax the locally
            // owned inner blocks.
            for bi in 0..nb {
                for bj in 0..nb {
                    if bi == kk || bj == kk {
                        continue;
                    }
                    if let Some(slot) = self.index[bi * nb + bj] {
                        let h_i = layout.live(bi);
                        let w_j = layout.live(bj);
                        let block = &mut self.data[slot * area..(slot + 1) * area];
                        fw_inner(&col_blocks[bi], &row_blocks[bj], block, h_i, w_j, bs, b);
                    }
                }
            }
        }
    }

    /// Collect every block onto rank 0 and assemble the dense result.
    ///
    /// The (rank, block) iteration order is identical on all participants,
    /// so sends and receives pair up with a single fixed tag.
    fn gather(self, comm: &impl Comm) -> Option<Vec<i32>> {
        let layout = self.layout;
        let n = layout.n;
        let b = layout.block;
        let area = b * b;
        let rank = comm.rank();

        let mut dense = if rank == 0 {
            Some(vec![INF; n * n])
        } else {
            None
        };

        for r in 0..comm.size() {
            for info in layout.local_blocks(r) {
                let mut buf = vec![INF; area];
                if rank == r {
                    if let Some(slot) = self.slot(info.bi, info.bj) {
                        buf.copy_from_slice(&self.data[slot * area..(slot + 1) * area]);
                    }
                }
                if r != 0 {
                    if rank == r {
                        comm.send_i32s(&buf, 0);
                    } else if rank == 0 {
                        comm.recv_i32s(&mut buf, r);
                    }
                }
                if let Some(dense) = dense.as_mut() {
                    for ii in 0..b {
                        let gi = info.offset_i + ii;
                        if gi >= n {
                            break;
                        }
                        for jj in 0..b {
                            let gj = info.offset_j + jj;
                            if gj >= n {
                                break;
                            }
                            dense[gi * n + gj] = buf[ii * b + jj];
                        }
                    }
                }
            }
        }

        dense
    }
}

/// Reference scalar Floyd-Warshall over the same adjacency encoding.
pub fn sequential(n: usize, adjacency: &[i32]) -> Vec<i32> {
    let mut d = vec![INF; n * n];
    for i in 0..n {
        for j in 0..n {
            d[i * n + j] = if i == j {
                0
            } else if adjacency[i * n + j] == 0 {
                INF
            } else {
                adjacency[i * n + j]
            };
        }
    }

    for k in 0..n {
        for i in 0..n {
            let dik = d[i * n + k];
            if dik == INF {
                continue;
            }
            for j in 0..n {
                let dkj = d[k * n + j];
                if dkj == INF {
                    continue;
                }
                let via = dik + dkj;
                if via < d[i * n + j] {
                    d[i * n + j] = via;
                }
            }
        }
    }

    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::SoloComm;

    #[test]
    fn triangle_matches_hand_result() {
        let adj = vec![0, 1, 4, 1, 0, 2, 4, 2, 0];
        let d = run(&SoloComm, 3, &adj).unwrap();
        assert_eq!(d, vec![0, 1, 3, 1, 0, 2, 3, 2, 0]);
    }

    #[test]
    fn single_vertex() {
        let d = run(&SoloComm, 1, &[0]).unwrap();
        assert_eq!(d, vec![0]);
    }

    #[test]
    fn blocked_matches_sequential_for_odd_block_sizes() {
        // 6 vertices, ring with one chord
        let n = 6;
        let mut adj = vec![0; n * n];
        let edges = [(0, 1, 3), (1, 2, 1), (2, 3, 7), (3, 4, 2), (4, 5, 1), (5, 0, 4), (1, 4, 2)];
        for &(u, v, w) in &edges {
            adj[u * n + v] = w;
            adj[v * n + u] = w;
        }
        let reference = sequential(n, &adj);
        for b in 1..=n {
            let layout = Layout::with_block(n, 1, 1, b, false);
            let d = run_on(&SoloComm, n, &adj, layout).unwrap();
            assert_eq!(d, reference, "block size {}", b);
        }
    }

    #[test]
    fn disconnected_components_stay_inf() {
        let n = 4;
        let mut adj = vec![0; n * n];
        adj[1] = 5;
        adj[n] = 5;
        adj[2 * n + 3] = 7;
        adj[3 * n + 2] = 7;
        let d = run(&SoloComm, n, &adj).unwrap();
        assert_eq!(d[1], 5);
        assert_eq!(d[2 * n + 3], 7);
        for (i, j) in [(0, 2), (0, 3), (1, 2), (1, 3)] {
            assert_eq!(d[i * n + j], INF);
            assert_eq!(d[j * n + i], INF);
        }
    }
}
