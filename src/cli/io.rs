use crate::kasm::config::MAX_SAMPLES;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Parse a reads file into the packed record batch the assembler consumes.
///
/// One record per line: `sample strand bases quals`, whitespace-separated.
/// `sample` is a one-based id, `strand` is `0` or `1`, and both `bases` and
/// `quals` must be exactly `read_length` long. Blank lines and `#` comments
/// are skipped.
pub fn read_batch(path: &Path, read_length: usize) -> Result<Vec<u8>> {
    let text =
        fs::read_to_string(path).context(format!("Error reading reads file {:?}", path))?;
    let mut batch = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            bail!(
                "Malformed record at {:?}:{}: expected 4 fields, got {}",
                path,
                idx + 1,
                fields.len()
            );
        }
        let sample: u8 = fields[0]
            .parse()
            .context(format!("Parsing sample id at {:?}:{}", path, idx + 1))?;
        if sample < 1 || sample as usize > MAX_SAMPLES {
            bail!(
                "Sample id {} at {:?}:{} out of range 1..={}",
                sample,
                path,
                idx + 1,
                MAX_SAMPLES
            );
        }
        let strand = match fields[1] {
            "0" => b'0',
            "1" => b'1',
            other => bail!("Invalid strand {:?} at {:?}:{}", other, path, idx + 1),
        };
        let bases = fields[2].as_bytes();
        let quals = fields[3].as_bytes();
        if bases.len() != read_length || quals.len() != read_length {
            bail!(
                "Record at {:?}:{} does not match read length {}",
                path,
                idx + 1,
                read_length
            );
        }
        batch.push(sample);
        batch.push(strand);
        batch.extend_from_slice(bases);
        batch.extend_from_slice(quals);
    }

    Ok(batch)
}

/// Load a reference sequence from a FASTA-shaped or raw text file.
///
/// Header lines are skipped and whitespace is stripped; multiple sequence
/// lines are concatenated into one region.
pub fn read_reference(path: &Path) -> Result<Vec<u8>> {
    let text =
        fs::read_to_string(path).context(format!("Error reading reference {:?}", path))?;
    let mut seq = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('>') {
            continue;
        }
        seq.extend_from_slice(line.as_bytes());
    }
    if seq.is_empty() {
        bail!("Reference {:?} contains no sequence", path);
    }
    Ok(seq)
}

/// Split FASTA-shaped contig text into (name, sequence) pairs.
///
/// Names are the header lines without the leading `>`; sequence lines up to
/// the next header are concatenated.
pub fn parse_fasta(text: &str) -> Vec<(String, String)> {
    let mut records = Vec::new();
    let mut name: Option<String> = None;
    let mut seq = String::new();

    for line in text.lines() {
        if let Some(header) = line.strip_prefix('>') {
            if let Some(n) = name.take() {
                records.push((n, std::mem::take(&mut seq)));
            }
            name = Some(header.to_string());
        } else {
            seq.push_str(line.trim());
        }
    }
    if let Some(n) = name {
        records.push((n, seq));
    }
    records
}
