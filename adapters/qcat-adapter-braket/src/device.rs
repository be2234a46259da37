//! Known Braket device ARNs.

/// Rigetti Ankaa-3 (superconducting).
pub const RIGETTI_ANKAA_3: &str = "arn:aws:braket:us-west-1::device/qpu/rigetti/Ankaa-3";

/// IonQ Aria 1 (trapped-ion).
pub const IONQ_ARIA: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-1";

/// IonQ Forte 1 (trapped-ion).
pub const IONQ_FORTE: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Forte-1";

/// IQM Garnet (superconducting).
pub const IQM_GARNET: &str = "arn:aws:braket:eu-north-1::device/qpu/iqm/Garnet";

/// SV1 state vector simulator.
pub const SV1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/sv1";

/// TN1 tensor network simulator.
pub const TN1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/tn1";

/// DM1 density matrix simulator.
pub const DM1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/dm1";

/// Region used when neither the ARN nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Resolve a friendly device name to its ARN. Anything else passes through.
pub fn resolve_device(name: &str) -> String {
    let arn = match name.to_lowercase().as_str() {
        "rigetti" | "ankaa" | "ankaa-3" => RIGETTI_ANKAA_3,
        "aria" | "aria-1" => IONQ_ARIA,
        "forte" | "forte-1" => IONQ_FORTE,
        "garnet" | "iqm-garnet" => IQM_GARNET,
        "sv1" => SV1,
        "tn1" => TN1,
        "dm1" => DM1,
        _ => return name.to_string(),
    };
    arn.to_string()
}

/// Region embedded in an ARN, if any.
///
/// ARN format: `arn:aws:braket:<region>::device/<type>/<provider>/<device>`.
/// On-demand simulators leave the region empty.
pub fn region_from_arn(arn: &str) -> Option<&str> {
    arn.split(':').nth(3).filter(|region| !region.is_empty())
}
