//! End-to-end scenarios driven through the single-participant substrate.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seqclust::apsp;
use seqclust::comm::SoloComm;
use seqclust::dist::Layout;
use seqclust::dot;
use seqclust::hamming;
use seqclust::kernels::INF;
use seqclust::matio;
use seqclust::pam::{self, PamOptions};

fn adjacency_from_edges(n: usize, edges: &[(usize, usize, i32)]) -> Vec<i32> {
    let mut adj = vec![0i32; n * n];
    for &(u, v, w) in edges {
        adj[u * n + v] = w;
        adj[v * n + u] = w;
    }
    adj
}

/// Path of 5 vertices with edge (i, i+1) weighted i+1.
fn path_of_five() -> Vec<i32> {
    adjacency_from_edges(5, &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 4, 4)])
}

#[test]
fn s1_triangle() {
    let adj = vec![0, 1, 4, 1, 0, 2, 4, 2, 0];
    let d = apsp::run(&SoloComm, 3, &adj).unwrap();
    assert_eq!(d, vec![0, 1, 3, 1, 0, 2, 3, 2, 0]);
}

#[test]
fn s2_disconnected_pair() {
    let adj = adjacency_from_edges(4, &[(0, 1, 5), (2, 3, 7)]);
    let d = apsp::run(&SoloComm, 4, &adj).unwrap();
    assert_eq!(d[1], 5);
    assert_eq!(d[2 * 4 + 3], 7);
    for (i, j) in [(0, 2), (0, 3), (1, 2), (1, 3)] {
        assert_eq!(d[i * 4 + j], INF);
        assert_eq!(d[j * 4 + i], INF);
    }
}

#[test]
fn s3_path_of_five() {
    let d = apsp::run(&SoloComm, 5, &path_of_five()).unwrap();
    assert_eq!(d[4], 10); // 0 -> 4
    assert_eq!(d[5 + 3], 5); // 1 -> 3
}

#[test]
fn s4_padding_does_not_leak() {
    // n = 5 with b = 2 leaves a padded row and column in the edge blocks
    let adj = path_of_five();
    let reference = apsp::run(&SoloComm, 5, &adj).unwrap();
    let layout = Layout::with_block(5, 1, 1, 2, true);
    let d = apsp::run_on(&SoloComm, 5, &adj, layout).unwrap();
    assert_eq!(d, reference);
}

#[test]
fn s5_medoids_on_a_line() {
    let dist = apsp::run(&SoloComm, 5, &path_of_five()).unwrap();
    // cost of the endpoint pick {0, 4}: 0 + 1 + 3 + 4 + 0
    let endpoint_cost = 8;
    for seed in 0..8 {
        let res = pam::run(
            &SoloComm,
            5,
            &dist,
            &PamOptions {
                k: 2,
                seed: Some(seed),
            },
        )
        .unwrap();
        assert!(res.total_cost <= endpoint_cost, "seed {}", seed);
        let sum: i64 = res.dist_to_medoid.iter().map(|&d| d as i64).sum();
        assert_eq!(sum, res.total_cost);
    }
}

#[test]
fn s6_random_symmetric_matrix_invariants() {
    let n = 32;
    let mut rng = StdRng::seed_from_u64(2024);
    let mut adj = vec![0i32; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            // half the pairs get no edge at all
            let w = if rng.gen_bool(0.5) {
                0
            } else {
                rng.gen_range(1..30)
            };
            adj[i * n + j] = w;
            adj[j * n + i] = w;
        }
    }

    let d = apsp::run(&SoloComm, n, &adj).unwrap();

    for i in 0..n {
        assert_eq!(d[i * n + i], 0);
        for j in 0..n {
            assert!(d[i * n + j] >= 0);
            assert_eq!(d[i * n + j], d[j * n + i], "symmetry at ({}, {})", i, j);
        }
    }
    for i in 0..n {
        for j in 0..n {
            for m in 0..n {
                let im = d[i * n + m];
                let mj = d[m * n + j];
                if im != INF && mj != INF {
                    assert!(
                        d[i * n + j] <= im + mj,
                        "triangle inequality at ({}, {}, {})",
                        i,
                        j,
                        m
                    );
                }
            }
        }
    }

    assert_eq!(d, apsp::sequential(n, &adj));
}

#[test]
fn apsp_output_is_a_fixed_point() {
    let adj = adjacency_from_edges(4, &[(0, 1, 5), (2, 3, 7)]);
    let d = apsp::run(&SoloComm, 4, &adj).unwrap();
    let again = apsp::run(&SoloComm, 4, &d).unwrap();
    assert_eq!(d, again);
}

#[test]
fn apsp_commutes_with_vertex_relabeling() {
    let n = 6;
    let adj = adjacency_from_edges(
        n,
        &[(0, 1, 3), (1, 2, 1), (2, 3, 7), (3, 4, 2), (4, 5, 1), (1, 4, 2)],
    );
    let d = apsp::run(&SoloComm, n, &adj).unwrap();

    let perm = [2, 0, 5, 1, 4, 3];
    let mut permuted = vec![0i32; n * n];
    for i in 0..n {
        for j in 0..n {
            permuted[perm[i] * n + perm[j]] = adj[i * n + j];
        }
    }
    let d_perm = apsp::run(&SoloComm, n, &permuted).unwrap();

    for i in 0..n {
        for j in 0..n {
            assert_eq!(d_perm[perm[i] * n + perm[j]], d[i * n + j]);
        }
    }
}

#[test]
fn block_choices_agree_bit_for_bit() {
    let n = 9;
    let adj = adjacency_from_edges(
        n,
        &[
            (0, 1, 2),
            (1, 2, 2),
            (2, 3, 1),
            (3, 4, 9),
            (4, 5, 1),
            (5, 6, 4),
            (6, 7, 1),
            (7, 8, 3),
            (0, 8, 20),
        ],
    );
    let reference = apsp::sequential(n, &adj);
    for b in [1, 2, 3, 4, 5, 9, 16] {
        let layout = Layout::with_block(n, 1, 1, b, true);
        let d = apsp::run_on(&SoloComm, n, &adj, layout).unwrap();
        assert_eq!(d, reference, "block size {}", b);
    }
}

#[test]
fn matrix_file_round_trip_preserves_sentinels() {
    let adj = adjacency_from_edges(4, &[(0, 1, 5), (2, 3, 7)]);
    let d = apsp::run(&SoloComm, 4, &adj).unwrap();

    let dir = std::env::temp_dir().join("seqclust_pipeline_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("distances.txt");
    matio::write_matrix(&path, &d, 4, 4).unwrap();
    let (n, read_back) = matio::read_matrix(&path).unwrap();

    assert_eq!(n, 4);
    assert_eq!(read_back, d);
}

#[test]
fn full_chain_separates_two_sequence_families() {
    // two families of sequences, far apart in Hamming distance
    let seqs: Vec<String> = [
        "AAAAAAAA", "AAAAAAAT", "AAAAAATT", "TTTTTTTT", "TTTTTTTA", "TTTTTTAA",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let n = seqs.len();
    let packed: Vec<u8> = seqs.iter().flat_map(|s| s.bytes()).collect();

    let hd = hamming::build_distance_matrix(&SoloComm, n, 8, &packed).unwrap();

    // threshold keeps intra-family edges only
    let rendered = dot::parse_dot(&dot::render_dot(&hd, n, 4)).unwrap();
    let (parsed_n, adjacency) = rendered;
    assert_eq!(parsed_n, n);

    let d = apsp::run(&SoloComm, n, &adjacency).unwrap();
    // families are disconnected from each other
    assert_eq!(d[3], INF);

    let res = pam::run(
        &SoloComm,
        n,
        &d,
        &PamOptions {
            k: 2,
            seed: Some(11),
        },
    )
    .unwrap();

    // every local optimum puts one medoid in each family
    assert_eq!(res.cluster_of[0], res.cluster_of[1]);
    assert_eq!(res.cluster_of[1], res.cluster_of[2]);
    assert_eq!(res.cluster_of[3], res.cluster_of[4]);
    assert_eq!(res.cluster_of[4], res.cluster_of[5]);
    assert_ne!(res.cluster_of[0], res.cluster_of[3]);
}
