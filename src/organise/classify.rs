//! Derives the sample name and sample type from a result file name.
//!
//! Result files are named `{id1}_{id2}_{type tokens...}.{ext}`, for example
//! `SRX6855211_SRR10127028_resfinder.tsv`. The first two underscore-delimited
//! tokens identify the sample; whatever follows, up to the first `.`, is the
//! sample type (usually the tool that produced the file).

use std::path::Path;
use std::path::PathBuf;

use crate::errors::Error;
use crate::errors::Result;

/// Separator between the tokens of a result file name.
pub const SEPARATOR: char = '_';

/// A discovered result file together with the sample it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleFile {
    path: PathBuf,
    file_name: String,
    sample_name: String,
    sample_type: String,
}

impl SampleFile {
    /// Classifies the file at `path`.
    ///
    /// ```
    /// use amrsum::organise::SampleFile;
    ///
    /// let file = SampleFile::classify("data/SRX1_SRR2_mlst_warwick.tsv.gz").unwrap();
    /// assert_eq!(file.sample_name(), "SRX1_SRR2");
    /// assert_eq!(file.sample_type(), "mlst_warwick");
    /// ```
    pub fn classify(path: impl AsRef<Path>) -> Result<SampleFile> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::MalformedFileName {
                file: path.to_path_buf(),
                token: path.display().to_string(),
                reason: "file name is not valid UTF-8",
            })?
            .to_string();

        let sample_name = sample_name(&file_name).map_err(|(token, reason)| {
            Error::MalformedFileName {
                file: path.to_path_buf(),
                token,
                reason,
            }
        })?;
        let sample_type = sample_type(&file_name, &sample_name);
        if sample_type.is_empty() {
            return Err(Error::MalformedFileName {
                file: path.to_path_buf(),
                token: file_name,
                reason: "no sample type after the first two tokens",
            });
        }

        Ok(SampleFile {
            path: path.to_path_buf(),
            file_name,
            sample_name,
            sample_type,
        })
    }

    /// The full path to the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name, including all extensions.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The first two tokens of the file name.
    pub fn sample_name(&self) -> &str {
        &self.sample_name
    }

    /// The remainder of the file name, without extensions.
    pub fn sample_type(&self) -> &str {
        &self.sample_type
    }
}

/// Joins the first two tokens of `file_name`. On failure, returns the token
/// that could not be used and why.
fn sample_name(file_name: &str) -> std::result::Result<String, (String, &'static str)> {
    let mut tokens = file_name.split(SEPARATOR);

    let first = tokens.next().unwrap_or_default();
    let second = match tokens.next() {
        Some(t) => t,
        None => {
            return Err((
                first.to_string(),
                "expected at least two `_`-delimited tokens",
            ))
        }
    };

    if first.is_empty() {
        return Err((first.to_string(), "first token is empty"));
    }

    Ok(format!("{}{}{}", first, SEPARATOR, second))
}

/// Strips the sample name and one separator, then truncates at the first `.`.
fn sample_type(file_name: &str, sample_name: &str) -> String {
    let rest = file_name.strip_prefix(sample_name).unwrap_or(file_name);
    let rest = rest.strip_prefix(SEPARATOR).unwrap_or(rest);

    strip_extensions(rest).to_string()
}

/// Everything before the first `.`.
pub fn strip_extensions(name: &str) -> &str {
    match name.split_once('.') {
        Some((stem, _)) => stem,
        None => name,
    }
}

/// Parses the sample type back out of a file name used as a matrix column,
/// by dropping the two sample name tokens. Column names that were never
/// classified yield an empty type.
pub fn type_from_file_name(file_name: &str) -> String {
    let tokens: Vec<&str> = file_name.split(SEPARATOR).skip(2).collect();
    strip_extensions(&tokens.join("_")).to_string()
}
