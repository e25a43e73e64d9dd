//! In-place block kernels of the blocked Floyd-Warshall.
//!
//! All four kernels operate on b*b physical blocks with leading dimension
//! `b`; `bs`, `h_i` and `w_j` are the live extents of the pivot, column and
//! row operands. INF is absorbing: a sum with an INF operand is skipped
//! outright, never computed, so 2*INF can never be formed. The k' check is
//! hoisted out of the innermost loop, which walks j so that the updated
//! cells stay contiguous.

/// Unreachable sentinel. Strictly below i32::MAX / 2 so that any single
/// finite sum of two distances fits in an i32.
pub const INF: i32 = 1_000_000_000;

/// Scalar Floyd-Warshall restricted to the pivot block Dkk.
pub fn fw_block(dkk: &mut [i32], bs: usize, b: usize) {
    for k in 0..bs {
        for i in 0..bs {
            let dik = dkk[i * b + k];
            if dik == INF {
                continue;
            }
            for j in 0..bs {
                let dkj = dkk[k * b + j];
                if dkj == INF {
                    continue;
                }
                let via = dik + dkj;
                if via < dkk[i * b + j] {
                    dkk[i * b + j] = via;
                }
            }
        }
    }
}

/// Relax a block DkJ of the pivot's row strip against the pivot Dkk.
pub fn fw_row(dkk: &[i32], dkj: &mut [i32], bs: usize, w_j: usize, b: usize) {
    for i in 0..bs {
        for k in 0..bs {
            let dik = dkk[i * b + k];
            if dik == INF {
                continue;
            }
            for j in 0..w_j {
                let dkj_kj = dkj[k * b + j];
                if dkj_kj == INF {
                    continue;
                }
                let via = dik + dkj_kj;
                if via < dkj[i * b + j] {
                    dkj[i * b + j] = via;
                }
            }
        }
    }
}

/// Relax a block Dik of the pivot's column strip against the pivot Dkk.
pub fn fw_col(dik: &mut [i32], dkk: &[i32], h_i: usize, bs: usize, b: usize) {
    for i in 0..h_i {
        for k in 0..bs {
            let ik = dik[i * b + k];
            if ik == INF {
                continue;
            }
            for j in 0..bs {
                let kj = dkk[k * b + j];
                if kj == INF {
                    continue;
                }
                let via = ik + kj;
                if via < dik[i * b + j] {
                    dik[i * b + j] = via;
                }
            }
        }
    }
}

/// Relax an inner block Dij through the strip blocks Dik and DkJ.
pub fn fw_inner(
    dik: &[i32],
    dkj: &[i32],
    dij: &mut [i32],
    h_i: usize,
    w_j: usize,
    bs: usize,
    b: usize,
) {
    for i in 0..h_i {
        for k in 0..bs {
            let ik = dik[i * b + k];
            if ik == INF {
                continue;
            }
            for j in 0..w_j {
                let kj = dkj[k * b + j];
                if kj == INF {
                    continue;
                }
                let via = ik + kj;
                if via < dij[i * b + j] {
                    dij[i * b + j] = via;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fw_block_relaxes_triangle() {
        // 3-cycle with a long direct edge 0-2
        let mut block = vec![0, 1, 4, 1, 0, 2, 4, 2, 0];
        fw_block(&mut block, 3, 3);
        assert_eq!(block, vec![0, 1, 3, 1, 0, 2, 3, 2, 0]);
    }

    #[test]
    fn inf_is_absorbing() {
        // 0 -> 1 reachable, 2 isolated; no INF sums may leak through
        let mut block = vec![0, 5, INF, 5, 0, INF, INF, INF, 0];
        fw_block(&mut block, 3, 3);
        assert_eq!(block[2], INF);
        assert_eq!(block[5], INF);
        assert_eq!(block[1], 5);
    }

    #[test]
    fn fw_row_uses_pivot_rows() {
        // pivot: 0<->1 at cost 1; row block: 1 reaches column 0 at cost 2
        let pivot = vec![0, 1, 1, 0];
        let mut row = vec![INF, INF, 2, INF];
        fw_row(&pivot, &mut row, 2, 2, 2);
        // 0 -> 1 -> col0 = 3
        assert_eq!(row[0], 3);
        assert_eq!(row[2], 2);
    }

    #[test]
    fn fw_col_uses_pivot_columns() {
        let pivot = vec![0, 1, 1, 0];
        let mut col = vec![2, INF, INF, INF];
        fw_col(&mut col, &pivot, 2, 2, 2);
        // row0 -> 0 -> 1 = 3
        assert_eq!(col[1], 3);
        assert_eq!(col[0], 2);
    }

    #[test]
    fn fw_inner_combines_strips() {
        let dik = vec![3, INF, INF, INF];
        let dkj = vec![4, INF, INF, INF];
        let mut dij = vec![INF, INF, INF, INF];
        fw_inner(&dik, &dkj, &mut dij, 2, 2, 2, 2);
        assert_eq!(dij[0], 7);
        assert_eq!(dij[1], INF);
    }

    #[test]
    fn partial_extents_leave_padding_untouched() {
        // live 1x1 region inside a 2x2 physical block
        let pivot = vec![0, INF, INF, INF];
        let mut row = vec![9, INF, INF, INF];
        fw_row(&pivot, &mut row, 1, 1, 2);
        assert_eq!(row, vec![9, INF, INF, INF]);
    }
}
