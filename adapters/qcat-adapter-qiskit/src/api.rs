//! IBM Quantum REST client.
//!
//! Jobs go through the Sampler V2 primitive at `/v1/jobs` with an OpenQASM 3
//! program. Results come back as one hex sample per shot and classical
//! register; bit `i` of a sample is classical bit `i`, which the translator
//! wires to qubit `i`.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use qcat_hal::{Counts, HalError, HalResult, JobId, JobStatus, Program, TaskApi, TaskPayload};
use qcat_ir::QubitId;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IbmError, IbmResult};

/// Default IBM Quantum Cloud API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://quantum.cloud.ibm.com/api";

/// User-Agent sent with requests.
const USER_AGENT: &str = concat!("qcat/", env!("CARGO_PKG_VERSION"));

/// IBM Quantum API client.
pub struct IbmClient {
    client: Client,
    endpoint: String,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl IbmClient {
    /// Create a client authenticating with a bearer token.
    pub fn new(endpoint: impl Into<String>, token: &str) -> IbmResult<Self> {
        if token.is_empty() {
            return Err(IbmError::MissingToken);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| IbmError::InvalidToken)?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Submit a Sampler V2 job.
    pub async fn submit_sampler_job(
        &self,
        backend: &str,
        qasm: &str,
        shots: u32,
    ) -> IbmResult<String> {
        let url = format!("{}/v1/jobs", self.endpoint);
        let request = SamplerJobRequest {
            program_id: "sampler".into(),
            backend: backend.into(),
            params: SamplerParams {
                version: 2,
                pubs: vec![(qasm.to_string(), serde_json::json!({}), shots)],
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let submitted: SubmitResponse = response.json().await?;
        Ok(submitted.id)
    }

    /// Get job status.
    pub async fn get_job_status(&self, job_id: &str) -> IbmResult<JobStatusResponse> {
        let url = format!("{}/v1/jobs/{}", self.endpoint, job_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(IbmError::JobNotFound(job_id.to_string()));
            }
            return Err(api_error(response).await);
        }
        response.json().await.map_err(IbmError::from)
    }

    /// Get job results.
    pub async fn get_job_results(&self, job_id: &str) -> IbmResult<JobResultResponse> {
        let url = format!("{}/v1/jobs/{}/results", self.endpoint, job_id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(IbmError::JobNotFound(job_id.to_string()));
            }
            return Err(api_error(response).await);
        }
        response.json().await.map_err(IbmError::from)
    }

    /// Cancel a job.
    pub async fn cancel_job(&self, job_id: &str) -> IbmResult<()> {
        let url = format!("{}/v1/jobs/{}/cancel", self.endpoint, job_id);
        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}

async fn api_error(response: reqwest::Response) -> IbmError {
    let status = response.status();
    match response.json::<ApiErrorResponse>().await {
        Ok(body) => IbmError::ApiError {
            code: body.code,
            message: body.message,
        },
        Err(_) => IbmError::ApiError {
            code: None,
            message: format!("HTTP {status}"),
        },
    }
}

#[async_trait]
impl TaskApi for IbmClient {
    async fn create_task(&self, payload: &TaskPayload) -> HalResult<JobId> {
        let Program::OpenQasm3(qasm) = &payload.program else {
            return Err(HalError::InvalidRequest(
                "IBM Quantum accepts OpenQASM 3 programs only".into(),
            ));
        };
        let id = self
            .submit_sampler_job(&payload.target, qasm, payload.shots)
            .await?;
        Ok(JobId::new(id))
    }

    async fn task_status(&self, id: &JobId) -> HalResult<JobStatus> {
        let status = self.get_job_status(&id.0).await?;
        Ok(status.to_job_status())
    }

    async fn task_result(&self, id: &JobId, payload: &TaskPayload) -> HalResult<Counts> {
        let results = self.get_job_results(&id.0).await?;
        let samples = results
            .results
            .into_iter()
            .next()
            .and_then(|r| r.data)
            .and_then(|mut data| data.remove("c").or_else(|| data.into_values().next()))
            .ok_or_else(|| IbmError::EmptyResult(id.0.clone()))?;
        debug!(job_id = %id, shots = samples.samples.len(), "Decoding IBM samples");
        Ok(decode_samples(&samples.samples, &payload.measured)?)
    }

    async fn cancel_task(&self, id: &JobId) -> HalResult<()> {
        Ok(self.cancel_job(&id.0).await?)
    }
}

/// Turn hex samples into counts over the measured qubits.
///
/// Character `k` of each bitstring is the `k`-th measured qubit. A sample
/// that is not hex fails the whole decode.
pub fn decode_samples(samples: &[String], measured: &[QubitId]) -> IbmResult<Counts> {
    if samples.is_empty() {
        return Err(IbmError::ResultParse("no samples".into()));
    }
    let mut counts = Counts::new();
    for sample in samples {
        let hex = sample.strip_prefix("0x").unwrap_or(sample);
        let value = u128::from_str_radix(hex, 16)
            .map_err(|_| IbmError::ResultParse(format!("sample '{sample}' is not hex")))?;
        let bits: String = measured
            .iter()
            .map(|q| if q.0 < 128 && value >> q.0 & 1 == 1 { '1' } else { '0' })
            .collect();
        counts.insert(bits, 1);
    }
    Ok(counts)
}

#[derive(Debug, Serialize)]
struct SamplerJobRequest {
    program_id: String,
    backend: String,
    params: SamplerParams,
}

#[derive(Debug, Serialize)]
struct SamplerParams {
    version: u32,
    pubs: Vec<(String, serde_json::Value, u32)>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Job submission response.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Job ID.
    pub id: String,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID.
    pub id: String,
    /// Job status, mixed case on the Cloud API.
    pub status: String,
    /// State object with reason.
    #[serde(default)]
    pub state: Option<JobState>,
}

/// Job state with reason.
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    /// Reason for failure.
    #[serde(default)]
    pub reason: Option<String>,
}

impl JobStatusResponse {
    /// Map the IBM status string onto [`JobStatus`].
    pub fn to_job_status(&self) -> JobStatus {
        match self.status.to_uppercase().as_str() {
            "COMPLETED" | "DONE" => JobStatus::Completed,
            "FAILED" | "ERROR" => JobStatus::Failed(
                self.state
                    .as_ref()
                    .and_then(|s| s.reason.clone())
                    .unwrap_or_else(|| self.status.clone()),
            ),
            "CANCELLED" => JobStatus::Cancelled,
            "QUEUED" | "INITIALIZING" | "VALIDATING" => JobStatus::Queued,
            _ => JobStatus::Running,
        }
    }
}

/// Job result response.
#[derive(Debug, Deserialize)]
pub struct JobResultResponse {
    /// One entry per submitted pub.
    pub results: Vec<SamplerResult>,
}

/// Sampler result for one pub.
#[derive(Debug, Deserialize)]
pub struct SamplerResult {
    /// Classical register name to sample data.
    #[serde(default)]
    pub data: Option<HashMap<String, ClassicalRegisterData>>,
}

/// Classical register data from V2 Sampler results.
#[derive(Debug, Deserialize)]
pub struct ClassicalRegisterData {
    /// One hex string per shot, e.g. `["0x0", "0x3"]`.
    pub samples: Vec<String>,
}
