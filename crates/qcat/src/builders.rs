//! One builder method per gate kind.
//!
//! Angles come first and qubits last, in the role order of the kind:
//! controls before targets. Multi-controlled builders take explicit slices;
//! an empty ancilla slice means no ancillas.

use qcat_ir::{GateKind, IrResult, McxMode, Param, QubitId};

use crate::circuit::QCircuit;

fn groups(qubits: &[u32]) -> Vec<Vec<QubitId>> {
    qubits.iter().map(|&q| vec![QubitId(q)]).collect()
}

fn ids(qubits: &[u32]) -> Vec<QubitId> {
    qubits.iter().copied().map(QubitId).collect()
}

fn angles(values: &[f64]) -> Vec<Param> {
    values.iter().copied().map(Param::Angle).collect()
}

/// `[controls, [target]]`, plus `ancillas` when there are any.
fn multi_controlled(controls: &[u32], target: u32, ancillas: &[u32]) -> Vec<Vec<QubitId>> {
    let mut out = vec![ids(controls), vec![QubitId(target)]];
    if !ancillas.is_empty() {
        out.push(ids(ancillas));
    }
    out
}

impl QCircuit {
    fn fixed(&mut self, kind: GateKind, qubits: &[u32], params: &[f64]) -> IrResult<&mut Self> {
        self.append(kind, groups(qubits), angles(params))
    }

    // Single-qubit

    pub fn i_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::IGate, &[qubit], &[])
    }

    pub fn x_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::XGate, &[qubit], &[])
    }

    pub fn y_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::YGate, &[qubit], &[])
    }

    pub fn z_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::ZGate, &[qubit], &[])
    }

    pub fn h_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::HGate, &[qubit], &[])
    }

    pub fn s_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::SGate, &[qubit], &[])
    }

    pub fn sdg_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::SdgGate, &[qubit], &[])
    }

    pub fn t_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::TGate, &[qubit], &[])
    }

    pub fn td_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::TdGate, &[qubit], &[])
    }

    pub fn sx_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::SxGate, &[qubit], &[])
    }

    pub fn sxd_gate(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::SxdGate, &[qubit], &[])
    }

    pub fn rx_gate(&mut self, theta: f64, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::RxGate, &[qubit], &[theta])
    }

    pub fn ry_gate(&mut self, theta: f64, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::RyGate, &[qubit], &[theta])
    }

    pub fn rz_gate(&mut self, phi: f64, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::RzGate, &[qubit], &[phi])
    }

    pub fn p_gate(&mut self, theta: f64, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::PGate, &[qubit], &[theta])
    }

    pub fn u1_gate(&mut self, theta: f64, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::U1Gate, &[qubit], &[theta])
    }

    pub fn u2_gate(&mut self, phi: f64, lambda: f64, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::U2Gate, &[qubit], &[phi, lambda])
    }

    pub fn r_gate(&mut self, theta: f64, phi: f64, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::RGate, &[qubit], &[theta, phi])
    }

    pub fn u_gate(&mut self, theta: f64, phi: f64, lambda: f64, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::UGate, &[qubit], &[theta, phi, lambda])
    }

    pub fn u3_gate(&mut self, theta: f64, phi: f64, lambda: f64, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::U3Gate, &[qubit], &[theta, phi, lambda])
    }

    // Two-qubit

    pub fn cx_gate(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CxGate, &[control, target], &[])
    }

    pub fn cy_gate(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CyGate, &[control, target], &[])
    }

    pub fn cz_gate(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CzGate, &[control, target], &[])
    }

    pub fn ch_gate(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::ChGate, &[control, target], &[])
    }

    pub fn csx_gate(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CsxGate, &[control, target], &[])
    }

    pub fn swap_gate(&mut self, a: u32, b: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::SwapGate, &[a, b], &[])
    }

    pub fn iswap_gate(&mut self, a: u32, b: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::IswapGate, &[a, b], &[])
    }

    pub fn dcx_gate(&mut self, a: u32, b: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::DcxGate, &[a, b], &[])
    }

    pub fn rxx_gate(&mut self, theta: f64, a: u32, b: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::RxxGate, &[a, b], &[theta])
    }

    pub fn ryy_gate(&mut self, theta: f64, a: u32, b: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::RyyGate, &[a, b], &[theta])
    }

    pub fn rzz_gate(&mut self, theta: f64, a: u32, b: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::RzzGate, &[a, b], &[theta])
    }

    pub fn rzx_gate(&mut self, theta: f64, a: u32, b: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::RzxGate, &[a, b], &[theta])
    }

    pub fn cphase_gate(&mut self, theta: f64, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CphaseGate, &[control, target], &[theta])
    }

    pub fn cu1_gate(&mut self, theta: f64, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::Cu1Gate, &[control, target], &[theta])
    }

    pub fn crx_gate(&mut self, theta: f64, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CrxGate, &[control, target], &[theta])
    }

    pub fn cry_gate(&mut self, theta: f64, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CryGate, &[control, target], &[theta])
    }

    pub fn crz_gate(&mut self, theta: f64, control: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CrzGate, &[control, target], &[theta])
    }

    pub fn cu3_gate(
        &mut self,
        theta: f64,
        phi: f64,
        lambda: f64,
        control: u32,
        target: u32,
    ) -> IrResult<&mut Self> {
        self.fixed(GateKind::Cu3Gate, &[control, target], &[theta, phi, lambda])
    }

    /// Controlled `e^{iγ} U(θ, φ, λ)`.
    pub fn cu_gate(
        &mut self,
        theta: f64,
        phi: f64,
        lambda: f64,
        gamma: f64,
        control: u32,
        target: u32,
    ) -> IrResult<&mut Self> {
        self.fixed(
            GateKind::CuGate,
            &[control, target],
            &[theta, phi, lambda, gamma],
        )
    }

    // Three to five qubits

    pub fn ccx_gate(&mut self, control1: u32, control2: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CcxGate, &[control1, control2, target], &[])
    }

    pub fn cswap_gate(&mut self, control: u32, a: u32, b: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::CswapGate, &[control, a, b], &[])
    }

    pub fn rccx_gate(&mut self, control1: u32, control2: u32, target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::RccxGate, &[control1, control2, target], &[])
    }

    pub fn c3x_gate(&mut self, controls: [u32; 3], target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::C3xGate, &[controls[0], controls[1], controls[2], target], &[])
    }

    pub fn c3sx_gate(&mut self, controls: [u32; 3], target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::C3sxGate, &[controls[0], controls[1], controls[2], target], &[])
    }

    pub fn rc3x_gate(&mut self, controls: [u32; 3], target: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::Rc3xGate, &[controls[0], controls[1], controls[2], target], &[])
    }

    pub fn c4x_gate(&mut self, controls: [u32; 4], target: u32) -> IrResult<&mut Self> {
        let [a, b, c, d] = controls;
        self.fixed(GateKind::C4xGate, &[a, b, c, d, target], &[])
    }

    // Multi-controlled

    /// Multi-controlled X with an explicit decomposition mode.
    pub fn mcx_gate(
        &mut self,
        controls: &[u32],
        target: u32,
        ancillas: &[u32],
        mode: McxMode,
    ) -> IrResult<&mut Self> {
        self.append(
            GateKind::McxGate,
            multi_controlled(controls, target, ancillas),
            vec![Param::Count(controls.len()), Param::Mode(mode)],
        )
    }

    /// Multi-controlled Toffoli; same contract as [`mcx_gate`](Self::mcx_gate).
    pub fn mct_gate(
        &mut self,
        controls: &[u32],
        target: u32,
        ancillas: &[u32],
        mode: McxMode,
    ) -> IrResult<&mut Self> {
        self.append(
            GateKind::MctGate,
            multi_controlled(controls, target, ancillas),
            vec![Param::Count(controls.len()), Param::Mode(mode)],
        )
    }

    /// Gray-code multi-controlled X.
    pub fn mcxgc_gate(&mut self, controls: &[u32], target: u32) -> IrResult<&mut Self> {
        self.append(
            GateKind::McxgcGate,
            multi_controlled(controls, target, &[]),
            vec![Param::Count(controls.len())],
        )
    }

    /// Recursive multi-controlled X.
    pub fn mcxrec_gate(&mut self, controls: &[u32], target: u32) -> IrResult<&mut Self> {
        self.append(
            GateKind::McxrecGate,
            multi_controlled(controls, target, &[]),
            vec![Param::Count(controls.len())],
        )
    }

    /// V-chain multi-controlled X; `dirty` marks the ancillas as dirty.
    pub fn mcxvchain_gate(
        &mut self,
        controls: &[u32],
        target: u32,
        dirty: bool,
    ) -> IrResult<&mut Self> {
        self.append(
            GateKind::McxvchainGate,
            multi_controlled(controls, target, &[]),
            vec![Param::Count(controls.len()), Param::Flag(dirty)],
        )
    }

    /// Multi-controlled phase.
    pub fn mcp_gate(&mut self, lambda: f64, controls: &[u32], target: u32) -> IrResult<&mut Self> {
        self.append(
            GateKind::McpGate,
            multi_controlled(controls, target, &[]),
            vec![Param::Angle(lambda), Param::Count(controls.len())],
        )
    }

    // Measurement

    pub fn measure(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.fixed(GateKind::Measure, &[qubit], &[])
    }

    /// Measure every qubit, in index order.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.append(GateKind::MeasureAll, Vec::new(), Vec::new())
    }

    // Convenience

    /// Put `qubit` into equal superposition.
    pub fn superposition(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.h_gate(qubit)
    }

    /// Bell pair on `a` and `b`.
    pub fn entangle(&mut self, a: u32, b: u32) -> IrResult<&mut Self> {
        self.superposition(a)?.cx_gate(a, b)
    }

    /// Prepare `qubit` in `|−⟩`.
    pub fn phase_kickback(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.x_gate(qubit)?.h_gate(qubit)
    }
}
