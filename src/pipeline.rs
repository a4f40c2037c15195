//! Submission of paired reads to a remote pipeline-execution service.
//!
//! The service is abstracted behind [`PipelineService`] so that the run
//! flow can be exercised without a server. [`galaxy::GalaxyClient`] is the
//! implementation talking to a Galaxy instance.
//!
//! A sample is run in five steps: a session is created, both reads are
//! uploaded in order, the session contents are checked against the uploads,
//! the pipeline tool is started and the job is polled until it finishes or
//! the configured timeout passes. The session can be purged afterwards
//! whatever the outcome.

pub mod command;
pub mod galaxy;
pub mod inputs;
pub mod pairing;

use std::fmt;
use std::path::Path;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::PipelineConfig;
use crate::errors::Error;
use crate::errors::Result;
use inputs::ToolInputs;
use pairing::ReadPair;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name(String::from(value))
            }
        }
    };
}

identifier!(
    /// Identifier of a session (a Galaxy history).
    SessionId
);
identifier!(
    /// Identifier of an uploaded dataset.
    DatasetId
);
identifier!(
    /// Identifier of a submitted job.
    JobId
);

/// State of a submitted job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    /// Accepted but not started yet.
    Pending,

    /// Currently running.
    Running,

    /// Finished successfully.
    Ok,

    /// Finished with an error.
    Error,
}

/// Description of a tool installed on the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tool {
    /// Identifier used to run the tool.
    pub id: String,

    /// Human readable name.
    pub name: String,

    /// Installed version.
    pub version: String,
}

/// Operations the run flow needs from a pipeline-execution service.
pub trait PipelineService {
    /// Looks up the tool with the given identifier.
    fn show_tool(&self, tool_id: &str) -> Result<Tool>;

    /// Creates a new, empty session.
    fn create_session(&self, name: &str) -> Result<SessionId>;

    /// Uploads a file into the session and returns the new dataset.
    fn upload_file(&self, session: &SessionId, path: &Path) -> Result<DatasetId>;

    /// Lists the datasets of a session in upload order.
    fn list_uploaded(&self, session: &SessionId) -> Result<Vec<DatasetId>>;

    /// Starts a tool in the session.
    fn submit_job(&self, tool_id: &str, session: &SessionId, inputs: &ToolInputs)
        -> Result<JobId>;

    /// The current state of a job.
    fn job_state(&self, job: &JobId) -> Result<JobState>;

    /// Deletes (and purges) a session.
    fn delete_session(&self, session: &SessionId) -> Result<()>;
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct Submission {
    /// The session the run used.
    pub session: SessionId,

    /// The finished job.
    pub job: JobId,
}

/// Runs the pipeline for one sample and waits for the job to finish.
///
/// The read identifiers handed to the tool are the ones returned by the
/// uploads, read 1 first. The session is expected to hold exactly those
/// datasets in that order; anything else is an [`Error::UploadMismatch`].
///
/// With `purge`, the session is deleted once the run is over, whether it
/// succeeded or not. A failed deletion is logged and does not change the
/// outcome of the run.
pub fn run_sample(
    service: &dyn PipelineService,
    config: &PipelineConfig,
    pair: &ReadPair,
    purge: bool,
) -> Result<Submission> {
    // (1) Resolve the tool before creating anything remotely.
    let tool = service.show_tool(&config.tool_id)?;
    debug!(
        "  [*] Using tool {} ({}) version {}.",
        tool.name, tool.id, tool.version
    );

    // (2) Create the session.
    let session = service.create_session(&pair.sample)?;
    info!("  [*] Created session {} for {}.", session, pair.sample);

    let result = run_in_session(service, config, pair, &tool, &session);

    if purge {
        match service.delete_session(&session) {
            Ok(()) => debug!("  [*] Purged session {}.", session),
            Err(e) => warn!("could not purge session {}: {}", session, e),
        }
    }

    let job = result?;
    Ok(Submission { session, job })
}

fn run_in_session(
    service: &dyn PipelineService,
    config: &PipelineConfig,
    pair: &ReadPair,
    tool: &Tool,
    session: &SessionId,
) -> Result<JobId> {
    // (3) Upload the reads in order and check the session holds exactly
    // what was uploaded.
    let mut uploaded = Vec::with_capacity(2);
    for read in pair.reads() {
        let dataset = service.upload_file(session, read)?;
        debug!("  [*] Uploaded {} as {}.", read.display(), dataset);
        uploaded.push(dataset);
    }

    let found = service.list_uploaded(session)?;
    if found != uploaded {
        return Err(Error::UploadMismatch {
            session: session.to_string(),
            expected: uploaded.iter().map(|d| d.to_string()).collect(),
            found: found.iter().map(|d| d.to_string()).collect(),
        });
    }

    // (4) Start the pipeline.
    let inputs = ToolInputs::new(config, &pair.sample, &uploaded[0], &uploaded[1]);
    let job = service.submit_job(&tool.id, session, &inputs)?;
    info!("  [*] Submitted job {} for {}.", job, pair.sample);

    // (5) Wait for it.
    wait_for_job(service, &job, config.poll_interval(), config.timeout())?;

    Ok(job)
}

/// Polls a job every `interval` until it finishes.
///
/// Returns once the job is [`JobState::Ok`]. A job in [`JobState::Error`]
/// gives [`Error::JobFailed`]; a job still unfinished once `timeout` has
/// passed gives [`Error::PollTimeout`]. The state is always checked at least
/// once.
pub fn wait_for_job(
    service: &dyn PipelineService,
    job: &JobId,
    interval: Duration,
    timeout: Duration,
) -> Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}"),
    );
    pb.set_message(format!("Waiting for job {}", job));

    let started = Instant::now();
    loop {
        let state = service.job_state(job)?;
        pb.set_message(format!("Job {} is {:?}", job, state));
        pb.tick();

        match state {
            JobState::Ok => {
                pb.finish_and_clear();
                info!("  [*] Job {} finished.", job);
                return Ok(());
            }
            JobState::Error => {
                pb.abandon();
                return Err(Error::JobFailed(job.to_string()));
            }
            JobState::Pending | JobState::Running => {}
        }

        if started.elapsed() >= timeout {
            pb.abandon();
            return Err(Error::PollTimeout {
                job: job.to_string(),
                timeout,
            });
        }

        thread::sleep(interval);
    }
}
