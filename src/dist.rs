//! Block distribution over a 2-D process grid.
//!
//! The n x n matrix is cut into nb x nb blocks of edge length b; block
//! (bi, bj) belongs to the participant at grid position
//! (bi mod rows, bj mod cols). Ownership is pure arithmetic, so any rank can
//! recompute any other rank's block list without communication.

/// One b x b block of the global matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Block-row index in the block grid.
    pub bi: usize,
    /// Block-column index in the block grid.
    pub bj: usize,
    /// Rank of the owning participant.
    pub owner: usize,
    /// Global row of the block's top-left cell.
    pub offset_i: usize,
    /// Global column of the block's top-left cell.
    pub offset_j: usize,
}

/// Chosen block size and process grid for one APSP run.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub n: usize,
    /// Block edge length.
    pub block: usize,
    /// Number of blocks per matrix dimension.
    pub nb: usize,
    /// Process-grid rows.
    pub rows: usize,
    /// Process-grid columns.
    pub cols: usize,
    /// True when the clean square-grid choice was not available.
    pub fallback: bool,
}

impl Layout {
    /// Pick the block size and grid for `procs` participants.
    ///
    /// When procs is a perfect square s*s and n is a multiple of s, blocks
    /// tile the matrix exactly with b = n/s on an s x s grid. Otherwise
    /// b = ceil(n / s) clamped to [32, 256] and the grid is the most
    /// balanced factorization of procs. Either choice yields identical
    /// results; only performance differs.
    pub fn choose(n: usize, procs: usize) -> Layout {
        let s = (procs as f64).sqrt().round() as usize;
        let clean = s > 0 && s * s == procs && n % s == 0;

        if clean {
            Layout::with_block(n, s, s, n / s, false)
        } else {
            let denom = s.max(1);
            let b = (n + denom - 1) / denom;
            let b = b.clamp(32, 256);
            let (rows, cols) = balanced_dims(procs);
            Layout::with_block(n, rows, cols, b, true)
        }
    }

    /// Build a layout with an explicit block size and grid.
    pub fn with_block(n: usize, rows: usize, cols: usize, block: usize, fallback: bool) -> Layout {
        let nb = (n + block - 1) / block;
        Layout {
            n,
            block,
            nb,
            rows,
            cols,
            fallback,
        }
    }

    /// Rank owning block (bi, bj).
    pub fn owner(&self, bi: usize, bj: usize) -> usize {
        (bi % self.rows) * self.cols + (bj % self.cols)
    }

    /// Blocks owned by `rank`, in (bi, bj) row-major order.
    pub fn local_blocks(&self, rank: usize) -> Vec<BlockInfo> {
        let mut blocks = Vec::new();
        for bi in 0..self.nb {
            for bj in 0..self.nb {
                let owner = self.owner(bi, bj);
                if owner == rank {
                    blocks.push(BlockInfo {
                        bi,
                        bj,
                        owner,
                        offset_i: bi * self.block,
                        offset_j: bj * self.block,
                    });
                }
            }
        }
        blocks
    }

    /// Live extent of block index `bk` (smaller than `block` at the edge).
    pub fn live(&self, bk: usize) -> usize {
        self.block.min(self.n - bk * self.block)
    }
}

/// Most-square factorization of `procs` into rows x cols with rows <= cols.
pub fn balanced_dims(procs: usize) -> (usize, usize) {
    let mut rows = (procs as f64).sqrt() as usize;
    while rows > 1 && procs % rows != 0 {
        rows -= 1;
    }
    (rows.max(1), procs / rows.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_block_cyclic() {
        let layout = Layout::with_block(8, 2, 2, 2, false);
        assert_eq!(layout.owner(0, 0), 0);
        assert_eq!(layout.owner(0, 1), 1);
        assert_eq!(layout.owner(1, 0), 2);
        assert_eq!(layout.owner(1, 1), 3);
        // wraps around cyclically
        assert_eq!(layout.owner(2, 2), 0);
        assert_eq!(layout.owner(3, 1), 3);
    }

    #[test]
    fn every_block_has_exactly_one_owner() {
        let layout = Layout::with_block(10, 2, 3, 3, true);
        let mut seen = vec![0usize; layout.nb * layout.nb];
        for rank in 0..6 {
            for info in layout.local_blocks(rank) {
                assert_eq!(info.owner, rank);
                seen[info.bi * layout.nb + info.bj] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn clean_square_grid_when_possible() {
        let layout = Layout::choose(12, 4);
        assert!(!layout.fallback);
        assert_eq!((layout.rows, layout.cols), (2, 2));
        assert_eq!(layout.block, 6);
        assert_eq!(layout.nb, 2);
    }

    #[test]
    fn fallback_clamps_block_size() {
        // 3 participants: not a perfect square
        let layout = Layout::choose(10, 3);
        assert!(layout.fallback);
        assert_eq!(layout.block, 32);
        assert_eq!(layout.rows * layout.cols, 3);

        // huge n pushes the adaptive block to the upper clamp
        let layout = Layout::choose(10_000, 3);
        assert_eq!(layout.block, 256);
    }

    #[test]
    fn live_extent_shrinks_at_the_edge() {
        let layout = Layout::with_block(5, 1, 1, 2, false);
        assert_eq!(layout.nb, 3);
        assert_eq!(layout.live(0), 2);
        assert_eq!(layout.live(1), 2);
        assert_eq!(layout.live(2), 1);
    }

    #[test]
    fn balanced_dims_prefers_square() {
        assert_eq!(balanced_dims(1), (1, 1));
        assert_eq!(balanced_dims(4), (2, 2));
        assert_eq!(balanced_dims(6), (2, 3));
        assert_eq!(balanced_dims(7), (1, 7));
        assert_eq!(balanced_dims(12), (3, 4));
    }
}
