//! IonQ REST client.
//!
//! Jobs are submitted as `ionq.circuit.v0` documents. Results come back as
//! a probability histogram keyed by the decimal basis state index, with
//! qubit 0 as the least significant bit.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use qcat_hal::{Counts, HalError, HalResult, JobId, JobStatus, Program, TaskApi, TaskPayload};
use qcat_ir::QubitId;
use reqwest::{Client, StatusCode, header};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{IonqError, IonqResult};

/// Default IonQ API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.ionq.co/v0.3";

const USER_AGENT: &str = concat!("qcat/", env!("CARGO_PKG_VERSION"));

/// IonQ API client.
pub struct IonqClient {
    client: Client,
    endpoint: String,
}

impl fmt::Debug for IonqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IonqClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl IonqClient {
    /// Create a client authenticating with an API key.
    pub fn new(endpoint: impl Into<String>, api_key: &str) -> IonqResult<Self> {
        if api_key.is_empty() {
            return Err(IonqError::MissingApiKey);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("apiKey {api_key}"))
                .map_err(|_| IonqError::InvalidApiKey)?,
        );
        headers.insert(
            header::CONTENT_TYPE,
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

    /// Submit a job.
    pub async fn submit_job(
        &self,
        target: &str,
        shots: u32,
        input: &serde_json::Value,
    ) -> IonqResult<String> {
        let url = format!("{}/jobs", self.endpoint);
        let body = SubmitRequest {
            target,
            shots,
            input,
        };
        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let submitted: SubmitResponse = response.json().await?;
        Ok(submitted.id)
    }

    /// Get job status.
    pub async fn get_job(&self, job_id: &str) -> IonqResult<JobResponse> {
        let url = format!("{}/jobs/{}", self.endpoint, job_id);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IonqError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Get the probability histogram of a completed job.
    pub async fn get_histogram(&self, job_id: &str) -> IonqResult<FxHashMap<String, f64>> {
        let url = format!("{}/jobs/{}/results", self.endpoint, job_id);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(IonqError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Cancel a job.
    pub async fn cancel_job(&self, job_id: &str) -> IonqResult<()> {
        let url = format!("{}/jobs/{}/status/cancel", self.endpoint, job_id);
        let response = self.client.put(&url).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}

async fn api_error(response: reqwest::Response) -> IonqError {
    let status = response.status().as_u16();
    let message = match response.json::<ApiErrorResponse>().await {
        Ok(body) => body.error.message,
        Err(_) => format!("HTTP {status}"),
    };
    IonqError::ApiError { status, message }
}

#[async_trait]
impl TaskApi for IonqClient {
    async fn create_task(&self, payload: &TaskPayload) -> HalResult<JobId> {
        let Program::Json(input) = &payload.program else {
            return Err(HalError::InvalidRequest(
                "IonQ accepts JSON circuits only".into(),
            ));
        };
        let id = self
            .submit_job(&payload.target, payload.shots, input)
            .await?;
        Ok(JobId::new(id))
    }

    async fn task_status(&self, id: &JobId) -> HalResult<JobStatus> {
        Ok(self.get_job(&id.0).await?.to_job_status())
    }

    async fn task_result(&self, id: &JobId, payload: &TaskPayload) -> HalResult<Counts> {
        let histogram = self.get_histogram(&id.0).await?;
        debug!(job_id = %id, states = histogram.len(), "Decoding IonQ histogram");
        Ok(decode_histogram(&histogram, &payload.measured, payload.shots)?)
    }

    async fn cancel_task(&self, id: &JobId) -> HalResult<()> {
        Ok(self.cancel_job(&id.0).await?)
    }
}

/// Marginalize an IonQ histogram onto `measured` and scale it to `shots`.
///
/// Character `k` of each bitstring is the `k`-th measured qubit.
pub fn decode_histogram(
    histogram: &FxHashMap<String, f64>,
    measured: &[QubitId],
    shots: u32,
) -> IonqResult<Counts> {
    let mut marginal: FxHashMap<String, f64> = FxHashMap::default();
    for (key, probability) in histogram {
        let state: u128 = key
            .parse()
            .map_err(|_| IonqError::InvalidHistogram(key.clone()))?;
        let bits: String = measured
            .iter()
            .map(|q| if q.0 < 128 && state >> q.0 & 1 == 1 { '1' } else { '0' })
            .collect();
        *marginal.entry(bits).or_default() += probability;
    }
    Counts::from_probabilities(marginal, shots).ok_or(IonqError::EmptyHistogram)
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    target: &'a str,
    shots: u32,
    input: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobResponse {
    /// Job ID.
    pub id: String,
    /// `ready`, `submitted`, `running`, `completed`, `failed` or `canceled`.
    pub status: String,
    /// Failure details.
    #[serde(default)]
    pub failure: Option<JobFailure>,
}

/// Failure details of a job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobFailure {
    /// Error message.
    #[serde(default)]
    pub error: Option<String>,
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
}

impl JobResponse {
    /// Map the IonQ status onto [`JobStatus`].
    pub fn to_job_status(&self) -> JobStatus {
        match self.status.as_str() {
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed(
                self.failure
                    .as_ref()
                    .and_then(|f| f.error.clone().or_else(|| f.code.clone()))
                    .unwrap_or_else(|| "failed".into()),
            ),
            "canceled" | "cancelled" => JobStatus::Cancelled,
            "ready" | "submitted" => JobStatus::Queued,
            _ => JobStatus::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let parse = |json: &str| serde_json::from_str::<JobResponse>(json).unwrap();
        assert_eq!(
            parse(r#"{"id":"a","status":"ready"}"#).to_job_status(),
            JobStatus::Queued
        );
        assert_eq!(
            parse(r#"{"id":"a","status":"running"}"#).to_job_status(),
            JobStatus::Running
        );
        assert_eq!(
            parse(r#"{"id":"a","status":"completed"}"#).to_job_status(),
            JobStatus::Completed
        );
        assert_eq!(
            parse(r#"{"id":"a","status":"failed","failure":{"error":"too many qubits"}}"#)
                .to_job_status(),
            JobStatus::Failed("too many qubits".into())
        );
    }

    #[test]
    fn test_histogram_is_little_endian() {
        // Index 1 is |q0 = 1, q1 = 0>.
        let mut histogram = FxHashMap::default();
        histogram.insert("1".to_string(), 1.0);
        let counts = decode_histogram(&histogram, &[QubitId(0), QubitId(1)], 10).unwrap();
        assert_eq!(counts.get("10"), 10);
    }

    #[test]
    fn test_histogram_marginalizes() {
        let mut histogram = FxHashMap::default();
        histogram.insert("0".to_string(), 0.25);
        histogram.insert("1".to_string(), 0.25);
        histogram.insert("2".to_string(), 0.5);
        let counts = decode_histogram(&histogram, &[QubitId(1)], 100).unwrap();
        assert_eq!(counts.get("0"), 50);
        assert_eq!(counts.get("1"), 50);
    }

    #[test]
    fn test_bad_histogram_key() {
        let mut histogram = FxHashMap::default();
        histogram.insert("zero".to_string(), 1.0);
        assert!(matches!(
            decode_histogram(&histogram, &[QubitId(0)], 1),
            Err(IonqError::InvalidHistogram(_))
        ));
    }

    #[test]
    fn test_massless_histogram_is_an_error() {
        let empty = FxHashMap::default();
        assert!(matches!(
            decode_histogram(&empty, &[QubitId(0)], 1024),
            Err(IonqError::EmptyHistogram)
        ));

        let mut zeros = FxHashMap::default();
        zeros.insert("0".to_string(), 0.0);
        assert!(matches!(
            decode_histogram(&zeros, &[QubitId(0)], 1024),
            Err(IonqError::EmptyHistogram)
        ));
    }

    #[test]
    fn test_client_rejects_empty_key() {
        assert!(matches!(
            IonqClient::new(DEFAULT_ENDPOINT, ""),
            Err(IonqError::MissingApiKey)
        ));
    }
}
