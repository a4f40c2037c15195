//! Grouping of read files into read-1/read-2 pairs per sample.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::errors::Error;
use crate::errors::Result;

/// Both reads of one sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadPair {
    /// The sample the reads belong to.
    pub sample: String,

    /// The first read file.
    pub read_1: PathBuf,

    /// The second read file.
    pub read_2: PathBuf,
}

impl ReadPair {
    /// Both reads, read 1 first.
    pub fn reads(&self) -> [&Path; 2] {
        [&self.read_1, &self.read_2]
    }
}

/// The sample a read file belongs to: its file name without the last
/// `_`-delimited token.
///
/// ```
/// use amrsum::pipeline::pairing::sample_of;
///
/// assert_eq!(sample_of("S1_L001_R1.fastq.gz"), "S1_L001");
/// assert_eq!(sample_of("reads.fastq"), "reads.fastq");
/// ```
pub fn sample_of(file_name: &str) -> &str {
    match file_name.rsplit_once('_') {
        Some((sample, _)) => sample,
        None => file_name,
    }
}

/// Lists the read files directly inside `dir`, sorted by name.
pub fn read_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Groups read files into pairs by sample.
///
/// Files of a sample are ordered by file name, so `_R1` comes before `_R2`.
/// A sample with any other number of files than two is an
/// [`Error::InvalidPairing`].
pub fn pair_reads(files: Vec<PathBuf>) -> Result<Vec<ReadPair>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        let name = match file.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => continue,
        };
        groups
            .entry(String::from(sample_of(&name)))
            .or_default()
            .push(file);
    }

    let mut pairs = Vec::with_capacity(groups.len());
    for (sample, mut reads) in groups {
        if reads.len() != 2 {
            return Err(Error::InvalidPairing {
                sample,
                found: reads.len(),
            });
        }

        reads.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        let read_2 = reads.pop();
        let read_1 = reads.pop();
        if let (Some(read_1), Some(read_2)) = (read_1, read_2) {
            pairs.push(ReadPair {
                sample,
                read_1,
                read_2,
            });
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_pairs_are_ordered() {
        let pairs = pair_reads(vec![
            PathBuf::from("/r/S2_R2.fastq.gz"),
            PathBuf::from("/r/S1_R2.fastq.gz"),
            PathBuf::from("/r/S1_R1.fastq.gz"),
            PathBuf::from("/r/S2_R1.fastq.gz"),
        ])
        .unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].sample, "S1");
        assert_eq!(pairs[0].read_1, PathBuf::from("/r/S1_R1.fastq.gz"));
        assert_eq!(pairs[0].read_2, PathBuf::from("/r/S1_R2.fastq.gz"));
        assert_eq!(pairs[1].sample, "S2");
    }

    #[test]
    fn test_unpaired_sample_is_rejected() {
        let err = pair_reads(vec![
            PathBuf::from("/r/S1_R1.fastq.gz"),
            PathBuf::from("/r/S1_R2.fastq.gz"),
            PathBuf::from("/r/S1_R3.fastq.gz"),
        ])
        .unwrap_err();

        match err {
            Error::InvalidPairing { sample, found } => {
                assert_eq!(sample, "S1");
                assert_eq!(found, 3);
            }
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_read_files_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("S1_R1.fastq"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/S9_R1.fastq"), "").unwrap();

        let files = read_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("S1_R1.fastq")]);
    }

    #[test]
    fn test_read_files_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_files(&dir.path().join("missing")).is_err());
    }
}
