//! Errors raised by the `amrsum` library.
//!
//! Subcommands wrap these in [`anyhow::Error`] with additional context; the
//! binary maps the final error onto an [`ExitCode`].

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use tracing::error;

/// Convenience alias for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// All failures the library can report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The sample directory does not exist or is not a directory.
    #[error("sample directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file name does not follow the `{id1}_{id2}_{type}.{ext}` convention.
    #[error("malformed sample file name `{}`: {reason} (token: `{token}`)", .file.display())]
    MalformedFileName {
        /// The offending file.
        file: PathBuf,
        /// The token that could not be interpreted.
        token: String,
        /// What was expected.
        reason: &'static str,
    },

    /// None of the known result dialects matched the columns of a file.
    #[error("correct column names not found in {}: {columns:?}", .file.display())]
    UnrecognizedSchema {
        /// The offending file.
        file: PathBuf,
        /// Columns that were found in the header.
        columns: Vec<String>,
    },

    /// A dialect matched but the column holding the score is absent.
    #[error("{dialect} file {} has no `{column}` column", .file.display())]
    MissingColumn {
        /// The offending file.
        file: PathBuf,
        /// Name of the dialect that matched.
        dialect: &'static str,
        /// The column that was expected.
        column: &'static str,
    },

    /// A genotype file reported a quality status other than passed/failed.
    #[error("unknown quality status `{status}` in {}", .file.display())]
    UnknownQualityStatus {
        /// The offending file.
        file: PathBuf,
        /// The status as written in the file.
        status: String,
    },

    /// A single-row dialect contained no data rows.
    #[error("{} contains a header but no records", .0.display())]
    EmptyTable(PathBuf),

    /// An I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// An error from the delimited text reader.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// An error while writing a workbook.
    #[error("writing workbook: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    /// An invalid configuration file.
    #[error("invalid configuration in {}: {reason}", .file.display())]
    Config {
        /// The configuration file.
        file: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// The remote pipeline service rejected or failed a request.
    #[error("pipeline service: {0}")]
    Pipeline(String),

    /// The datasets in a session differ from those that were uploaded.
    #[error("session {session} holds datasets {found:?}, expected {expected:?}")]
    UploadMismatch {
        /// The session that was inspected.
        session: String,
        /// Dataset identifiers returned by the uploads, in upload order.
        expected: Vec<String>,
        /// Dataset identifiers listed by the service.
        found: Vec<String>,
    },

    /// A remote job finished in the error state.
    #[error("job {0} finished in the error state")]
    JobFailed(String),

    /// A remote job did not finish in time.
    #[error("job {job} did not finish within {:?}", .timeout)]
    PollTimeout {
        /// The job being polled.
        job: String,
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// Read files could not be paired for a sample.
    #[error("sample `{sample}` needs exactly two read files, found {found}")]
    InvalidPairing {
        /// The sample group.
        sample: String,
        /// How many files belong to the group.
        found: usize,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Pipeline(err.to_string())
    }
}

/// Exit codes used by the `amrsum` binary.
pub enum ExitCode {
    /// Invalid data or arguments were supplied to the given subcommand.
    InvalidInputData = 1,
}

/// Logs the message at the error level and terminates the process.
pub fn exit<I>(message: I, code: ExitCode) -> !
where
    I: std::fmt::Display,
{
    error!("{}", message);
    std::process::exit(code as i32);
}
