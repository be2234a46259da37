//! AWS Braket API client.
//!
//! Tasks are created through the Braket SDK with an OpenQASM 3 action.
//! Braket writes `results.json` to `{prefix}/{task_id}/` in the configured
//! S3 bucket; results are read back from there once the task completes.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_braket::types::QuantumTaskStatus;
use qcat_hal::{Counts, HalError, HalResult, JobId, JobStatus, Program, TaskApi, TaskPayload};
use qcat_ir::QubitId;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{BraketError, BraketResult};

/// AWS Braket API client.
pub struct BraketClient {
    braket: aws_sdk_braket::Client,
    s3: aws_sdk_s3::Client,
    s3_bucket: String,
    s3_prefix: String,
    region: String,
}

impl fmt::Debug for BraketClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraketClient")
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_prefix", &self.s3_prefix)
            .field("region", &self.region)
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

impl BraketClient {
    /// Create a client.
    ///
    /// AWS credentials come from the default chain (environment, SSO,
    /// config files, IAM role).
    pub async fn new(
        region: impl Into<String>,
        s3_bucket: impl Into<String>,
        s3_prefix: impl Into<String>,
    ) -> BraketResult<Self> {
        let s3_bucket = s3_bucket.into();
        if s3_bucket.is_empty() {
            return Err(BraketError::MissingS3Bucket);
        }
        let region = region.into();

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(60))
                    .connect_timeout(Duration::from_secs(10))
                    .build(),
            )
            .load()
            .await;

        Ok(Self {
            braket: aws_sdk_braket::Client::new(&config),
            s3: aws_sdk_s3::Client::new(&config),
            s3_bucket,
            s3_prefix: s3_prefix.into(),
            region,
        })
    }

    /// Create a quantum task and return its ARN.
    pub async fn create_task(
        &self,
        device_arn: &str,
        qasm: &str,
        shots: u32,
    ) -> BraketResult<String> {
        let action = serde_json::json!({
            "braketSchemaHeader": {
                "name": "braket.ir.openqasm.program",
                "version": "1"
            },
            "source": qasm
        });

        let resp = self
            .braket
            .create_quantum_task()
            .client_token(Uuid::new_v4().to_string())
            .device_arn(device_arn)
            .action(action.to_string())
            .shots(i64::from(shots))
            .output_s3_bucket(&self.s3_bucket)
            .output_s3_key_prefix(&self.s3_prefix)
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(e.to_string()))?;

        Ok(resp.quantum_task_arn().to_string())
    }

    /// Get quantum task status.
    pub async fn get_task_status(&self, task_arn: &str) -> BraketResult<JobStatus> {
        let resp = self
            .braket
            .get_quantum_task()
            .quantum_task_arn(task_arn)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("ResourceNotFoundException") {
                    BraketError::TaskNotFound(task_arn.to_string())
                } else {
                    BraketError::BraketApi(e.to_string())
                }
            })?;

        Ok(match resp.status() {
            QuantumTaskStatus::Created | QuantumTaskStatus::Queued => JobStatus::Queued,
            QuantumTaskStatus::Running | QuantumTaskStatus::Cancelling => JobStatus::Running,
            QuantumTaskStatus::Completed => JobStatus::Completed,
            QuantumTaskStatus::Failed => JobStatus::Failed(
                resp.failure_reason()
                    .unwrap_or("Unknown failure")
                    .to_string(),
            ),
            QuantumTaskStatus::Cancelled => JobStatus::Cancelled,
            other => JobStatus::Failed(format!("Unknown status {other:?}")),
        })
    }

    /// Cancel a quantum task.
    pub async fn cancel_task(&self, task_arn: &str) -> BraketResult<()> {
        self.braket
            .cancel_quantum_task()
            .client_token(Uuid::new_v4().to_string())
            .quantum_task_arn(task_arn)
            .send()
            .await
            .map_err(|e| BraketError::BraketApi(e.to_string()))?;
        Ok(())
    }

    /// Read `results.json` of a task from S3.
    pub async fn get_task_result(&self, task_arn: &str) -> BraketResult<TaskResult> {
        let task_id = task_id_from_arn(task_arn)?;
        let key = result_key(&self.s3_prefix, task_id);

        let resp = self
            .s3
            .get_object()
            .bucket(&self.s3_bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| BraketError::S3Error(e.to_string()))?;

        Ok(serde_json::from_slice(&body.into_bytes())?)
    }
}

/// S3 key of `results.json` for a task written under `prefix`.
pub fn result_key(prefix: &str, task_id: &str) -> String {
    match prefix.trim_end_matches('/') {
        "" => format!("{task_id}/results.json"),
        prefix => format!("{prefix}/{task_id}/results.json"),
    }
}

/// Task ID from `arn:aws:braket:<region>:<account>:quantum-task/<id>`.
pub fn task_id_from_arn(task_arn: &str) -> BraketResult<&str> {
    task_arn
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && *id != task_arn)
        .ok_or_else(|| BraketError::InvalidArn(task_arn.to_string()))
}

#[async_trait]
impl TaskApi for BraketClient {
    async fn create_task(&self, payload: &TaskPayload) -> HalResult<JobId> {
        let Program::OpenQasm3(qasm) = &payload.program else {
            return Err(HalError::InvalidRequest(
                "Braket accepts OpenQASM 3 programs only".into(),
            ));
        };
        let arn = BraketClient::create_task(self, &payload.target, qasm, payload.shots).await?;
        Ok(JobId::new(arn))
    }

    async fn task_status(&self, id: &JobId) -> HalResult<JobStatus> {
        Ok(self.get_task_status(&id.0).await?)
    }

    async fn task_result(&self, id: &JobId, payload: &TaskPayload) -> HalResult<Counts> {
        let result = self.get_task_result(&id.0).await?;
        debug!(task_arn = %id, "Decoding Braket result");
        Ok(decode_result(&result, &payload.measured, payload.shots)?)
    }

    async fn cancel_task(&self, id: &JobId) -> HalResult<()> {
        Ok(BraketClient::cancel_task(self, &id.0).await?)
    }
}

/// Task result from Braket (stored in S3).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Measurement counts (bitstring -> count).
    #[serde(default)]
    pub measurement_counts: Option<FxHashMap<String, u64>>,
    /// Measurement probabilities (bitstring -> probability).
    #[serde(default)]
    pub measurement_probabilities: Option<FxHashMap<String, f64>>,
    /// One row of bits per shot.
    #[serde(default)]
    pub measurements: Option<Vec<Vec<u8>>>,
    /// Qubit of each bitstring position.
    #[serde(default)]
    pub measured_qubits: Option<Vec<u32>>,
}

/// Convert a Braket result to counts over `measured`.
///
/// Braket bitstrings follow `measuredQubits`; they are re-keyed so that
/// character `k` is `measured[k]`.
pub fn decode_result(result: &TaskResult, measured: &[QubitId], shots: u32) -> BraketResult<Counts> {
    let order: Vec<u32> = result
        .measured_qubits
        .clone()
        .unwrap_or_else(|| measured.iter().map(|q| q.0).collect());
    let positions = measured
        .iter()
        .map(|q| {
            order.iter().position(|&o| o == q.0).ok_or_else(|| {
                BraketError::ResultParseError(format!("qubit {} was not measured", q.0))
            })
        })
        .collect::<BraketResult<Vec<usize>>>()?;

    let rekey = |bits: &[u8]| -> String {
        positions
            .iter()
            .map(|&p| if bits.get(p) == Some(&b'1') { '1' } else { '0' })
            .collect()
    };

    if let Some(counts) = &result.measurement_counts {
        let counts = Counts::from_pairs(counts.iter().map(|(k, &n)| (rekey(k.as_bytes()), n)));
        if counts.total_shots() == 0 {
            return Err(BraketError::ResultParseError("measurement counts are empty".into()));
        }
        return Ok(counts);
    }
    if let Some(rows) = &result.measurements {
        if rows.is_empty() {
            return Err(BraketError::ResultParseError("measurements are empty".into()));
        }
        return Ok(Counts::from_pairs(rows.iter().map(|row| {
            let bits: Vec<u8> = row.iter().map(|&b| if b == 1 { b'1' } else { b'0' }).collect();
            (rekey(&bits), 1)
        })));
    }
    if let Some(probabilities) = &result.measurement_probabilities {
        let mut marginal: FxHashMap<String, f64> = FxHashMap::default();
        for (k, &p) in probabilities {
            *marginal.entry(rekey(k.as_bytes())).or_default() += p;
        }
        return Counts::from_probabilities(marginal, shots).ok_or_else(|| {
            BraketError::ResultParseError("measurement probabilities sum to zero".into())
        });
    }
    Err(BraketError::ResultParseError(
        "result has no counts, measurements or probabilities".into(),
    ))
}
