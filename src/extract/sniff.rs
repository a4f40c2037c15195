//! Delimiter detection for tool output of unknown layout.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::config::Config;

/// Delimiters that are considered, in order of preference.
pub const CANDIDATES: [u8; 4] = [b'\t', b',', b';', b'|'];

/// Fraction of sampled lines that must agree on the delimiter count.
const MIN_CONSISTENCY: f64 = 0.9;

/// Sniffs the delimiter of the file at `path` from its first
/// `config.sniff_bytes` bytes, falling back to the configured default when
/// the file cannot be read or no delimiter is consistent enough.
pub fn delimiter_for(path: &Path, config: &Config) -> u8 {
    let sniffed = match sample(path, config.sniff_bytes) {
        Ok((text, truncated)) => sniff(&text, truncated),
        Err(e) => {
            debug!("  [*] Could not sample {}: {}", path.display(), e);
            None
        }
    };

    sniffed.unwrap_or_else(|| config.default_delimiter_byte())
}

fn sample(path: &Path, limit: usize) -> std::io::Result<(String, bool)> {
    let mut buffer = Vec::with_capacity(limit);
    File::open(path)?
        .take(limit as u64)
        .read_to_end(&mut buffer)?;

    let truncated = buffer.len() == limit;
    Ok((String::from_utf8_lossy(&buffer).into_owned(), truncated))
}

/// Guesses the delimiter used in `text`.
///
/// For each candidate the number of occurrences on every line is counted. A
/// candidate qualifies when its most common non-zero count appears on at
/// least 90% of the lines; the most consistent candidate wins, ties going to
/// the earlier entry of [`CANDIDATES`]. When `truncated` is set, the last line
/// is assumed to be cut short and is ignored.
///
/// ```
/// use amrsum::extract::sniff::sniff;
///
/// assert_eq!(sniff("a,b,c\n1,2,3\n", false), Some(b','));
/// assert_eq!(sniff("a\tb\n1\t2,3\n", false), Some(b'\t'));
/// assert_eq!(sniff("just words\n", false), None);
/// ```
pub fn sniff(text: &str, truncated: bool) -> Option<u8> {
    let mut lines: Vec<&str> = text.lines().collect();
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    lines.retain(|l| !l.trim().is_empty());

    if lines.is_empty() {
        return None;
    }

    let mut best: Option<(u8, f64)> = None;
    for candidate in CANDIDATES {
        let mut frequencies: HashMap<usize, usize> = HashMap::new();
        for line in &lines {
            let count = line.bytes().filter(|b| *b == candidate).count();
            *frequencies.entry(count).or_default() += 1;
        }

        let mode = frequencies
            .iter()
            .filter(|(count, _)| **count > 0)
            .max_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)));

        let consistency = match mode {
            Some((_, lines_with_mode)) => *lines_with_mode as f64 / lines.len() as f64,
            None => continue,
        };

        if consistency < MIN_CONSISTENCY {
            continue;
        }

        match best {
            Some((_, c)) if c >= consistency => {}
            _ => best = Some((candidate, consistency)),
        }
    }

    best.map(|(delimiter, _)| delimiter)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_header_only_file() {
        assert_eq!(sniff("Locus\t% Identity\n", false), Some(b'\t'));
    }

    #[test]
    fn test_commas_inside_tab_separated_genotype() {
        let text = "Sample\tGenotype\tQuality Module\nA_1\tstx1a,stx2c,eae\tPassed\n";
        assert_eq!(sniff(text, false), Some(b'\t'));
    }

    #[test]
    fn test_inconsistent_text_is_inconclusive() {
        let text = "a;b\nc,d,e\nf|g|h|i\nj k\n";
        assert_eq!(sniff(text, false), None);
    }

    #[test]
    fn test_truncated_last_line_is_ignored() {
        let text = "a;b;c\n1;2;3\n4;5;6\n7;8;9\n1;2;3\n4;5;6\n7;8;9\n1;2;3\n4;5;6\n7";
        assert_eq!(sniff(text, true), Some(b';'));
    }

    #[test]
    fn test_fallback_to_configured_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A_1_notes.txt");
        fs::write(&path, "nothing to see here\n").unwrap();

        let config = Config {
            default_delimiter: ',',
            ..Default::default()
        };
        assert_eq!(delimiter_for(&path, &config), b',');
        assert_eq!(delimiter_for(&dir.path().join("missing"), &config), b',');
    }
}
