//! Distributed all-pairs shortest paths and k-medoid clustering over
//! sequence similarity graphs.
//!
//! The pipeline runs in three SPMD stages, each its own binary:
//! `pipeline_build_matrix` turns a FASTA corpus into a Hamming-distance
//! graph, `pipeline_apsp` computes the all-pairs shortest-path matrix of
//! that graph with a blocked 2-D parallel Floyd-Warshall, and
//! `pipeline_pam` partitions the vertices around k medoids. Rank 0 is the
//! coordinator and performs all file I/O; the other ranks only compute.

pub mod apsp;
pub mod cli;
pub mod comm;
pub mod dist;
pub mod dot;
pub mod fasta;
pub mod hamming;
pub mod kernels;
pub mod matio;
pub mod pam;
pub mod report;
