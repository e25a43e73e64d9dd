//! Distance-matrix text files: `n m` on the first line, then n rows of m
//! whitespace-separated integers. Values must fit a signed 32-bit integer.

use anyhow::{Context, Result};
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Read a square matrix file.
pub fn read_matrix(path: &Path) -> Result<(usize, Vec<i32>)> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read matrix file {}", path.display()))?;
    parse_matrix(&content)
}

/// Parse matrix content, rejecting non-square headers and short rows.
pub fn parse_matrix(content: &str) -> Result<(usize, Vec<i32>)> {
    let mut values = content.split_whitespace();

    let n: usize = values
        .next()
        .context("missing row count")?
        .parse()
        .context("unparsable row count")?;
    let m: usize = values
        .next()
        .context("missing column count")?
        .parse()
        .context("unparsable column count")?;
    if n != m {
        anyhow::bail!("matrix is not square: {} x {}", n, m);
    }
    if n == 0 {
        anyhow::bail!("matrix is empty");
    }

    let mut matrix = Vec::with_capacity(n * n);
    for idx in 0..n * n {
        let token = values
            .next()
            .context(format!("matrix ends early at value {} of {}", idx, n * n))?;
        let value: i32 = token
            .parse()
            .context(format!("unparsable matrix value: {}", token))?;
        matrix.push(value);
    }

    Ok((n, matrix))
}

/// Write a matrix in the text format the clustering stage reads back.
pub fn write_matrix(path: &Path, matrix: &[i32], n: usize, m: usize) -> Result<()> {
    let mut file = File::create(path)
        .context(format!("Failed to create matrix file {}", path.display()))?;

    writeln!(file, "{} {}", n, m)?;
    for i in 0..n {
        let row: Vec<String> = matrix[i * m..(i + 1) * m]
            .iter()
            .map(|v| v.to_string())
            .collect();
        writeln!(file, "{}", row.join(" "))?;
    }

    Ok(())
}

/// Fixed-width matrix dump for eyeballing small inputs.
pub fn format_matrix(matrix: &[i32], n: usize, m: usize, width: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        for j in 0..m {
            out.push_str(&format!("{:>width$} ", matrix[i * m + j], width = width));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_square_matrix() {
        let (n, matrix) = parse_matrix("2 2\n0 5\n5 0\n").unwrap();
        assert_eq!(n, 2);
        assert_eq!(matrix, vec![0, 5, 5, 0]);
    }

    #[test]
    fn rejects_non_square() {
        assert!(parse_matrix("2 3\n0 1 2\n3 4 5\n").is_err());
    }

    #[test]
    fn rejects_truncated_rows() {
        assert!(parse_matrix("2 2\n0 5\n5\n").is_err());
    }

    #[test]
    fn rejects_values_beyond_i32() {
        assert!(parse_matrix("1 1\n99999999999\n").is_err());
    }

    #[test]
    fn format_pads_columns() {
        let text = format_matrix(&[0, 10, 100, 0], 2, 2, 3);
        assert_eq!(text, "  0  10 \n100   0 \n");
    }
}
