//! Reader and writer for the pipeline's weighted DOT graphs.
//!
//! The writer emits the restricted shape the shortest-path stage consumes:
//! one `A{i+1} [label="{i}"];` declaration per vertex and one
//! `A{i+1} -- A{j+1} [label="{d}", weight={d}];` line per unordered pair
//! whose distance is strictly below the threshold. The reader accepts
//! exactly that shape, so no graphviz binding is needed.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Render the DOT graph of all pairs with distance strictly below `epsilon`.
pub fn render_dot(dist: &[i32], n: usize, epsilon: i32) -> String {
    let mut out = String::new();
    out.push_str("graph graphe_pondere {\n");
    out.push_str("    node [shape=circle, style=filled, color=lightyellow, fontcolor=black];\n");
    out.push_str("    edge [color=black, fontcolor=blue];\n\n");

    for i in 0..n {
        out.push_str(&format!("    A{} [label=\"{}\"];\n", i + 1, i));
    }
    out.push('\n');

    for i in 0..n {
        for j in (i + 1)..n {
            let d = dist[i * n + j];
            if d < epsilon {
                out.push_str(&format!(
                    "    A{} -- A{} [label=\"{}\", weight={}];\n",
                    i + 1,
                    j + 1,
                    d,
                    d
                ));
            }
        }
    }

    out.push_str("}\n");
    out
}

/// Number of unordered pairs with distance strictly below `epsilon`.
pub fn edges_below(dist: &[i32], n: usize, epsilon: i32) -> usize {
    let mut count = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            if dist[i * n + j] < epsilon {
                count += 1;
            }
        }
    }
    count
}

/// Write the DOT graph and return the number of edges emitted.
pub fn write_dot(path: &Path, dist: &[i32], n: usize, epsilon: i32) -> Result<usize> {
    fs::write(path, render_dot(dist, n, epsilon))
        .context(format!("Failed to write DOT file {}", path.display()))?;
    Ok(edges_below(dist, n, epsilon))
}

/// Read a DOT graph and build its symmetric adjacency matrix
/// (0 = no direct edge).
pub fn read_dot(path: &Path) -> Result<(usize, Vec<i32>)> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read DOT file {}", path.display()))?;
    parse_dot(&content)
}

/// Parse the restricted DOT shape produced by [`render_dot`].
pub fn parse_dot(content: &str) -> Result<(usize, Vec<i32>)> {
    // First pass: vertex count from the A{id} declarations.
    let mut n = 0usize;
    for line in content.lines() {
        let line = line.trim();
        if let Some(id) = node_declaration(line) {
            n = n.max(id);
        }
    }
    if n == 0 {
        anyhow::bail!("DOT graph declares no vertices");
    }

    // Second pass: edges.
    let mut adjacency = vec![0i32; n * n];
    for line in content.lines() {
        let line = line.trim();
        if !line.contains("--") {
            continue;
        }
        let (i, j, w) = parse_edge(line).context(format!("Malformed edge line: {}", line))?;
        if i == 0 || j == 0 || i > n || j > n {
            anyhow::bail!("edge references undeclared vertex: {}", line);
        }
        if w < 0 {
            anyhow::bail!("negative edge weight: {}", line);
        }
        adjacency[(i - 1) * n + (j - 1)] = w;
        adjacency[(j - 1) * n + (i - 1)] = w;
    }

    Ok((n, adjacency))
}

/// `A{id} [label=...];` -> Some(id); anything else -> None.
fn node_declaration(line: &str) -> Option<usize> {
    if line.contains("--") || !line.starts_with('A') {
        return None;
    }
    let rest = &line[1..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || !rest[digits.len()..].trim_start().starts_with('[') {
        return None;
    }
    digits.parse().ok()
}

/// `A{i} -- A{j} [label="{d}", weight={d}];` -> (i, j, d).
fn parse_edge(line: &str) -> Result<(usize, usize, i32)> {
    let (left, right) = line.split_once("--").context("missing edge operator")?;

    let i = vertex_id(left.trim())?;
    let right = right.trim();
    let end = right.find(|c: char| c.is_whitespace() || c == '[').unwrap_or(right.len());
    let j = vertex_id(&right[..end])?;

    let weight_pos = line.find("weight=").context("missing weight attribute")?;
    let weight_str: String = line[weight_pos + "weight=".len()..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    let w = weight_str.parse().context("unparsable weight")?;

    Ok((i, j, w))
}

fn vertex_id(token: &str) -> Result<usize> {
    let digits = token.strip_prefix('A').context("vertex name must be A{id}")?;
    digits.parse().context("unparsable vertex id")
}
