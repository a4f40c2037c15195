//! [`PipelineService`] backed by the Galaxy REST API.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::Form;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::blocking::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::inputs::ToolInputs;
use super::DatasetId;
use super::JobId;
use super::JobState;
use super::PipelineService;
use super::SessionId;
use super::Tool;
use crate::errors::Error;
use crate::errors::Result;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Tool used by Galaxy to upload files into a history.
const UPLOAD_TOOL: &str = "upload1";

/// Timeout of a single request. Uploads of large read files can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Client for one Galaxy instance.
pub struct GalaxyClient {
    base_url: String,
    api_key: String,
    client: Client,
}

#[derive(Deserialize)]
struct Created {
    id: String,
}

#[derive(Deserialize)]
struct ShownTool {
    id: String,
    name: String,
    #[serde(default)]
    version: String,
}

#[derive(Deserialize)]
struct HistoryItem {
    id: String,
    hid: u64,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    history_content_type: Option<String>,
}

#[derive(Deserialize)]
struct ToolRun {
    #[serde(default)]
    outputs: Vec<Created>,
    #[serde(default)]
    jobs: Vec<Created>,
}

#[derive(Deserialize)]
struct ShownJob {
    state: String,
}

impl GalaxyClient {
    /// Creates a client for the Galaxy instance at `url`.
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(GalaxyClient {
            base_url: String::from(url.trim_end_matches('/')),
            api_key: String::from(api_key),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send()?;
        let response = check(response)?;
        Ok(response.json::<T>()?)
    }
}

/// Turns an unsuccessful response into an error carrying the body.
fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().unwrap_or_default();
    Err(Error::Pipeline(format!("{} returned {}: {}", url, status, body)))
}

/// Maps a Galaxy job state onto [`JobState`].
pub fn job_state_from(state: &str) -> JobState {
    match state {
        "ok" => JobState::Ok,
        "error" | "failed" | "deleted" | "deleting" => JobState::Error,
        "running" => JobState::Running,
        _ => JobState::Pending,
    }
}

impl PipelineService for GalaxyClient {
    fn show_tool(&self, tool_id: &str) -> Result<Tool> {
        let tool: ShownTool = self.send(self.client.get(self.url(&format!("tools/{}", tool_id))))?;
        Ok(Tool {
            id: tool.id,
            name: tool.name,
            version: tool.version,
        })
    }

    fn create_session(&self, name: &str) -> Result<SessionId> {
        let created: Created = self.send(
            self.client
                .post(self.url("histories"))
                .json(&json!({ "name": name })),
        )?;
        Ok(SessionId(created.id))
    }

    fn upload_file(&self, session: &SessionId, path: &Path) -> Result<DatasetId> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let inputs = json!({
            "files_0|NAME": name,
            "files_0|type": "upload_dataset",
            "dbkey": "?",
            "file_type": "auto",
        });

        debug!("  [*] Uploading {}.", path.display());
        let form = Form::new()
            .text("tool_id", UPLOAD_TOOL)
            .text("history_id", session.0.clone())
            .text("inputs", inputs.to_string())
            .file("files_0|file_data", path)?;

        let run: ToolRun = self.send(self.client.post(self.url("tools")).multipart(form))?;
        match run.outputs.into_iter().next() {
            Some(output) => Ok(DatasetId(output.id)),
            None => Err(Error::Pipeline(format!(
                "upload of {} produced no dataset",
                path.display()
            ))),
        }
    }

    fn list_uploaded(&self, session: &SessionId) -> Result<Vec<DatasetId>> {
        let mut items: Vec<HistoryItem> = self.send(
            self.client
                .get(self.url(&format!("histories/{}/contents", session))),
        )?;

        items.retain(|i| {
            !i.deleted && i.history_content_type.as_deref().unwrap_or("dataset") == "dataset"
        });
        items.sort_by_key(|i| i.hid);

        Ok(items.into_iter().map(|i| DatasetId(i.id)).collect())
    }

    fn submit_job(
        &self,
        tool_id: &str,
        session: &SessionId,
        inputs: &ToolInputs,
    ) -> Result<JobId> {
        let body = json!({
            "tool_id": tool_id,
            "history_id": session.0,
            "inputs": inputs,
        });

        let run: ToolRun = self.send(self.client.post(self.url("tools")).json(&body))?;
        match run.jobs.into_iter().next() {
            Some(job) => Ok(JobId(job.id)),
            None => Err(Error::Pipeline(format!(
                "running {} in session {} started no job",
                tool_id, session
            ))),
        }
    }

    fn job_state(&self, job: &JobId) -> Result<JobState> {
        let shown: ShownJob = self.send(self.client.get(self.url(&format!("jobs/{}", job))))?;
        Ok(job_state_from(&shown.state))
    }

    fn delete_session(&self, session: &SessionId) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("histories/{}", session)))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&json!({ "purge": true }))
            .send()?;
        check(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_states() {
        assert_eq!(job_state_from("ok"), JobState::Ok);
        assert_eq!(job_state_from("error"), JobState::Error);
        assert_eq!(job_state_from("running"), JobState::Running);
        assert_eq!(job_state_from("queued"), JobState::Pending);
        assert_eq!(job_state_from("new"), JobState::Pending);
    }

    #[test]
    fn test_urls() {
        let client = GalaxyClient::new("https://galaxy.example.org/", "key").unwrap();
        assert_eq!(
            client.url("histories"),
            "https://galaxy.example.org/api/histories"
        );
    }
}
