use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Sequences packed into one contiguous byte array, `count * length` long;
/// sequence i starts at offset `i * length`.
pub struct SequencePack {
    pub count: usize,
    pub length: usize,
    pub bytes: Vec<u8>,
}

/// Read a FASTA file and return its sequences.
pub fn read_fasta(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read FASTA file {}", path.display()))?;
    Ok(parse_fasta(&content))
}

/// Parse FASTA content: lines starting with '>' open a new record, all
/// following lines up to the next header are concatenated into one sequence.
pub fn parse_fasta(content: &str) -> Vec<String> {
    let mut sequences = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('>') {
            if !current.is_empty() {
                sequences.push(std::mem::take(&mut current));
            }
        } else {
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        sequences.push(current);
    }

    sequences
}

/// Pack sequences into contiguous storage, validating that the corpus is
/// non-empty and that every sequence has the same length.
pub fn pack_sequences(sequences: &[String]) -> Result<SequencePack> {
    if sequences.is_empty() {
        anyhow::bail!("no sequences in input");
    }

    let length = sequences[0].len();
    for (i, seq) in sequences.iter().enumerate() {
        if seq.len() != length {
            anyhow::bail!(
                "sequence {} has length {}, expected {}",
                i,
                seq.len(),
                length
            );
        }
    }

    let mut bytes = Vec::with_capacity(sequences.len() * length);
    for seq in sequences {
        bytes.extend_from_slice(seq.as_bytes());
    }

    Ok(SequencePack {
        count: sequences.len(),
        length,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headers_and_wrapped_sequences() {
        let content = ">seq1\nACGT\nACGT\n>seq2\nTTTT\nAAAA\n";
        let seqs = parse_fasta(content);
        assert_eq!(seqs, vec!["ACGTACGT", "TTTTAAAA"]);
    }

    #[test]
    fn skips_blank_lines() {
        let content = ">a\n\nAC\n\n>b\nGT\n";
        assert_eq!(parse_fasta(content), vec!["AC", "GT"]);
    }

    #[test]
    fn pack_rejects_unequal_lengths() {
        let seqs = vec!["ACGT".to_string(), "AC".to_string()];
        assert!(pack_sequences(&seqs).is_err());
    }

    #[test]
    fn pack_rejects_empty_corpus() {
        assert!(pack_sequences(&[]).is_err());
    }

    #[test]
    fn pack_lays_sequences_out_contiguously() {
        let seqs = vec!["ACGT".to_string(), "TGCA".to_string()];
        let pack = pack_sequences(&seqs).unwrap();
        assert_eq!(pack.count, 2);
        assert_eq!(pack.length, 4);
        assert_eq!(&pack.bytes, b"ACGTTGCA");
    }
}
