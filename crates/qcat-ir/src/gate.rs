//! Gate Kind Registry.
//!
//! [`GateKind`] is the closed set of operations a circuit can record. Each
//! kind carries a fixed [`GateSpec`]: how its qubit groups are shaped and
//! which parameters it takes. Both the builder surface and every translator
//! consult this table; nothing else decides what a kind looks like.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// Every operation kind known to the IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    // Single-qubit, parameterless
    /// Identity.
    IGate,
    /// Pauli-X.
    XGate,
    /// Pauli-Y.
    YGate,
    /// Pauli-Z.
    ZGate,
    /// Hadamard.
    HGate,
    /// S (sqrt Z).
    SGate,
    /// S-dagger.
    SdgGate,
    /// T (fourth root of Z).
    TGate,
    /// T-dagger.
    TdGate,
    /// sqrt(X).
    SxGate,
    /// sqrt(X)-dagger.
    SxdGate,

    // Single-qubit, parametrized
    /// Rotation about X.
    RxGate,
    /// Rotation about Y.
    RyGate,
    /// Rotation about Z.
    RzGate,
    /// Phase gate P(λ).
    PGate,
    /// U1(λ), equivalent to P(λ).
    U1Gate,
    /// U2(φ, λ) = U(π/2, φ, λ).
    U2Gate,
    /// R(θ, φ): rotation θ about cos(φ)X + sin(φ)Y.
    RGate,
    /// Generic single-qubit U(θ, φ, λ).
    UGate,
    /// U3(θ, φ, λ), equivalent to U.
    U3Gate,

    // Two-qubit
    /// Controlled-X.
    CxGate,
    /// Controlled-Y.
    CyGate,
    /// Controlled-Z.
    CzGate,
    /// Controlled-Hadamard.
    ChGate,
    /// Controlled sqrt(X).
    CsxGate,
    /// SWAP.
    SwapGate,
    /// iSWAP.
    IswapGate,
    /// Double CNOT: CX(a, b) then CX(b, a).
    DcxGate,
    /// XX interaction exp(-iθ/2 X⊗X).
    RxxGate,
    /// YY interaction exp(-iθ/2 Y⊗Y).
    RyyGate,
    /// ZZ interaction exp(-iθ/2 Z⊗Z).
    RzzGate,
    /// ZX interaction exp(-iθ/2 Z⊗X), Z on the first qubit.
    RzxGate,
    /// Controlled phase.
    CphaseGate,
    /// Controlled U1.
    Cu1Gate,
    /// Controlled Rx.
    CrxGate,
    /// Controlled Ry.
    CryGate,
    /// Controlled Rz.
    CrzGate,
    /// Controlled U3.
    Cu3Gate,
    /// Controlled U with global phase γ on the controlled block.
    CuGate,

    // Three or more qubits, fixed arity
    /// Toffoli.
    CcxGate,
    /// Fredkin (controlled SWAP).
    CswapGate,
    /// Simplified Toffoli with relative phases.
    RccxGate,
    /// Three-controlled X.
    C3xGate,
    /// Three-controlled sqrt(X).
    C3sxGate,
    /// Simplified three-controlled Toffoli with relative phases.
    Rc3xGate,
    /// Four-controlled X.
    C4xGate,

    // Multi-controlled, variable arity
    /// Multi-controlled X with a selectable decomposition mode.
    McxGate,
    /// Multi-controlled Toffoli; alias of `mcx_gate`.
    MctGate,
    /// Multi-controlled X, gray-code decomposition.
    McxgcGate,
    /// Multi-controlled X, recursive decomposition.
    McxrecGate,
    /// Multi-controlled X, v-chain decomposition.
    McxvchainGate,
    /// Multi-controlled phase.
    McpGate,

    // Measurement
    /// Measure one qubit.
    Measure,
    /// Measure every qubit in index order.
    MeasureAll,
}

/// Shape of an operation's qubit groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QubitLayout {
    /// `n` groups holding exactly one qubit each.
    Fixed(usize),
    /// `[controls, [target]]` plus an optional ancilla group.
    MultiControlled {
        /// Whether a third (possibly empty) ancilla group is accepted.
        ancillas: bool,
    },
}

/// Kind of one positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Angle in radians.
    Angle,
    /// Number of control qubits; must equal the control group length.
    Count,
    /// Boolean flag.
    Flag,
    /// Multi-controlled X decomposition mode.
    Mode,
}

/// Arity and parameter contract for one [`GateKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSpec {
    /// Qubit group layout.
    pub qubits: QubitLayout,
    /// Positional parameter kinds.
    pub params: &'static [ParamKind],
}

const NONE: &[ParamKind] = &[];
const ONE_ANGLE: &[ParamKind] = &[ParamKind::Angle];
const TWO_ANGLES: &[ParamKind] = &[ParamKind::Angle, ParamKind::Angle];
const THREE_ANGLES: &[ParamKind] = &[ParamKind::Angle, ParamKind::Angle, ParamKind::Angle];
const FOUR_ANGLES: &[ParamKind] = &[
    ParamKind::Angle,
    ParamKind::Angle,
    ParamKind::Angle,
    ParamKind::Angle,
];

impl GateKind {
    /// All kinds, in registry order.
    pub const ALL: &'static [GateKind] = &[
        GateKind::IGate,
        GateKind::XGate,
        GateKind::YGate,
        GateKind::ZGate,
        GateKind::HGate,
        GateKind::SGate,
        GateKind::SdgGate,
        GateKind::TGate,
        GateKind::TdGate,
        GateKind::SxGate,
        GateKind::SxdGate,
        GateKind::RxGate,
        GateKind::RyGate,
        GateKind::RzGate,
        GateKind::PGate,
        GateKind::U1Gate,
        GateKind::U2Gate,
        GateKind::RGate,
        GateKind::UGate,
        GateKind::U3Gate,
        GateKind::CxGate,
        GateKind::CyGate,
        GateKind::CzGate,
        GateKind::ChGate,
        GateKind::CsxGate,
        GateKind::SwapGate,
        GateKind::IswapGate,
        GateKind::DcxGate,
        GateKind::RxxGate,
        GateKind::RyyGate,
        GateKind::RzzGate,
        GateKind::RzxGate,
        GateKind::CphaseGate,
        GateKind::Cu1Gate,
        GateKind::CrxGate,
        GateKind::CryGate,
        GateKind::CrzGate,
        GateKind::Cu3Gate,
        GateKind::CuGate,
        GateKind::CcxGate,
        GateKind::CswapGate,
        GateKind::RccxGate,
        GateKind::C3xGate,
        GateKind::C3sxGate,
        GateKind::Rc3xGate,
        GateKind::C4xGate,
        GateKind::McxGate,
        GateKind::MctGate,
        GateKind::McxgcGate,
        GateKind::McxrecGate,
        GateKind::McxvchainGate,
        GateKind::McpGate,
        GateKind::Measure,
        GateKind::MeasureAll,
    ];

    /// Registry name, e.g. `"h_gate"` or `"measure_all"`.
    pub fn name(self) -> &'static str {
        match self {
            GateKind::IGate => "i_gate",
            GateKind::XGate => "x_gate",
            GateKind::YGate => "y_gate",
            GateKind::ZGate => "z_gate",
            GateKind::HGate => "h_gate",
            GateKind::SGate => "s_gate",
            GateKind::SdgGate => "sdg_gate",
            GateKind::TGate => "t_gate",
            GateKind::TdGate => "td_gate",
            GateKind::SxGate => "sx_gate",
            GateKind::SxdGate => "sxd_gate",
            GateKind::RxGate => "rx_gate",
            GateKind::RyGate => "ry_gate",
            GateKind::RzGate => "rz_gate",
            GateKind::PGate => "p_gate",
            GateKind::U1Gate => "u1_gate",
            GateKind::U2Gate => "u2_gate",
            GateKind::RGate => "r_gate",
            GateKind::UGate => "u_gate",
            GateKind::U3Gate => "u3_gate",
            GateKind::CxGate => "cx_gate",
            GateKind::CyGate => "cy_gate",
            GateKind::CzGate => "cz_gate",
            GateKind::ChGate => "ch_gate",
            GateKind::CsxGate => "csx_gate",
            GateKind::SwapGate => "swap_gate",
            GateKind::IswapGate => "iswap_gate",
            GateKind::DcxGate => "dcx_gate",
            GateKind::RxxGate => "rxx_gate",
            GateKind::RyyGate => "ryy_gate",
            GateKind::RzzGate => "rzz_gate",
            GateKind::RzxGate => "rzx_gate",
            GateKind::CphaseGate => "cphase_gate",
            GateKind::Cu1Gate => "cu1_gate",
            GateKind::CrxGate => "crx_gate",
            GateKind::CryGate => "cry_gate",
            GateKind::CrzGate => "crz_gate",
            GateKind::Cu3Gate => "cu3_gate",
            GateKind::CuGate => "cu_gate",
            GateKind::CcxGate => "ccx_gate",
            GateKind::CswapGate => "cswap_gate",
            GateKind::RccxGate => "rccx_gate",
            GateKind::C3xGate => "c3x_gate",
            GateKind::C3sxGate => "c3sx_gate",
            GateKind::Rc3xGate => "rc3x_gate",
            GateKind::C4xGate => "c4x_gate",
            GateKind::McxGate => "mcx_gate",
            GateKind::MctGate => "mct_gate",
            GateKind::McxgcGate => "mcxgc_gate",
            GateKind::McxrecGate => "mcxrec_gate",
            GateKind::McxvchainGate => "mcxvchain_gate",
            GateKind::McpGate => "mcp_gate",
            GateKind::Measure => "measure",
            GateKind::MeasureAll => "measure_all",
        }
    }

    /// Arity and parameter contract.
    pub fn spec(self) -> GateSpec {
        use GateKind::*;

        let (qubits, params) = match self {
            IGate | XGate | YGate | ZGate | HGate | SGate | SdgGate | TGate | TdGate | SxGate
            | SxdGate => (QubitLayout::Fixed(1), NONE),
            RxGate | RyGate | RzGate | PGate | U1Gate => (QubitLayout::Fixed(1), ONE_ANGLE),
            U2Gate | RGate => (QubitLayout::Fixed(1), TWO_ANGLES),
            UGate | U3Gate => (QubitLayout::Fixed(1), THREE_ANGLES),

            CxGate | CyGate | CzGate | ChGate | CsxGate | SwapGate | IswapGate | DcxGate => {
                (QubitLayout::Fixed(2), NONE)
            }
            RxxGate | RyyGate | RzzGate | RzxGate | CphaseGate | Cu1Gate | CrxGate | CryGate
            | CrzGate => (QubitLayout::Fixed(2), ONE_ANGLE),
            Cu3Gate => (QubitLayout::Fixed(2), THREE_ANGLES),
            CuGate => (QubitLayout::Fixed(2), FOUR_ANGLES),

            CcxGate | CswapGate | RccxGate => (QubitLayout::Fixed(3), NONE),
            C3xGate | C3sxGate | Rc3xGate => (QubitLayout::Fixed(4), NONE),
            C4xGate => (QubitLayout::Fixed(5), NONE),

            McxGate | MctGate => (
                QubitLayout::MultiControlled { ancillas: true },
                &[ParamKind::Count, ParamKind::Mode][..],
            ),
            McxgcGate | McxrecGate => (
                QubitLayout::MultiControlled { ancillas: false },
                &[ParamKind::Count][..],
            ),
            McxvchainGate => (
                QubitLayout::MultiControlled { ancillas: true },
                &[ParamKind::Count, ParamKind::Flag][..],
            ),
            McpGate => (
                QubitLayout::MultiControlled { ancillas: false },
                &[ParamKind::Angle, ParamKind::Count][..],
            ),

            Measure => (QubitLayout::Fixed(1), NONE),
            MeasureAll => (QubitLayout::Fixed(0), NONE),
        };

        GateSpec { qubits, params }
    }

    /// Number of positional parameters.
    pub fn num_params(self) -> usize {
        self.spec().params.len()
    }

    /// Whether this kind records a measurement.
    pub fn is_measurement(self) -> bool {
        matches!(self, GateKind::Measure | GateKind::MeasureAll)
    }

    /// Whether this kind takes a variable-length control group.
    pub fn is_multi_controlled(self) -> bool {
        matches!(self.spec().qubits, QubitLayout::MultiControlled { .. })
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| IrError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_unique() {
        let mut names: Vec<_> = GateKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), GateKind::ALL.len());
    }

    #[test]
    fn test_serde_name_matches_registry() {
        for kind in GateKind::ALL {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_from_str_roundtrip() {
        for kind in GateKind::ALL {
            assert_eq!(kind.name().parse::<GateKind>().unwrap(), *kind);
        }
        assert!("toffoli".parse::<GateKind>().is_err());
    }

    #[test]
    fn test_spec_arity() {
        assert_eq!(GateKind::HGate.spec().qubits, QubitLayout::Fixed(1));
        assert_eq!(GateKind::UGate.num_params(), 3);
        assert_eq!(GateKind::CuGate.num_params(), 4);
        assert_eq!(GateKind::C4xGate.spec().qubits, QubitLayout::Fixed(5));
        assert_eq!(GateKind::MeasureAll.spec().qubits, QubitLayout::Fixed(0));
        assert_eq!(
            GateKind::McxGate.spec().qubits,
            QubitLayout::MultiControlled { ancillas: true }
        );
        assert_eq!(
            GateKind::McpGate.spec().params,
            &[ParamKind::Angle, ParamKind::Count]
        );
    }

    #[test]
    fn test_kind_predicates() {
        assert!(GateKind::Measure.is_measurement());
        assert!(GateKind::MeasureAll.is_measurement());
        assert!(!GateKind::XGate.is_measurement());
        assert!(GateKind::McxvchainGate.is_multi_controlled());
        assert!(!GateKind::C3xGate.is_multi_controlled());
    }
}
