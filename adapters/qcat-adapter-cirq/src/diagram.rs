//! Text diagrams in the style of `cirq.Circuit.__str__`.
//!
//! ```text
//! 0: ───H───@───M('result')───
//!           │   │
//! 1: ───────X───M─────────────
//! ```

use qcat_hal::NativeCircuit;

use crate::circuit::{CirqCircuit, Moment};

const WIRE: char = '─';
const CROSS: &str = "┼";
const LINK: char = '│';

/// One moment column: a symbol per wire and which gaps are bridged.
struct Column {
    cells: Vec<Option<String>>,
    links: Vec<bool>,
    width: usize,
}

fn column(num_qubits: usize, moment: &Moment) -> Column {
    let mut cells: Vec<Option<String>> = vec![None; num_qubits];
    let mut links = vec![false; num_qubits.saturating_sub(1)];

    for op in &moment.operations {
        let symbols = op.gate.wire_symbols(op.qubits.len());
        for (q, symbol) in op.qubits.iter().zip(symbols) {
            if let Some(cell) = cells.get_mut(q.index()) {
                *cell = Some(symbol);
            }
        }

        let rows = op.qubits.iter().map(|q| q.index());
        let (Some(lo), Some(hi)) = (rows.clone().min(), rows.max()) else {
            continue;
        };
        for gap in lo..hi.min(links.len()) {
            links[gap] = true;
        }
        for cell in cells.iter_mut().take(hi).skip(lo + 1) {
            if cell.is_none() {
                *cell = Some(CROSS.to_string());
            }
        }
    }

    let width = cells
        .iter()
        .flatten()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(1);
    Column {
        cells,
        links,
        width,
    }
}

/// Render the whole circuit.
pub(crate) fn render(circuit: &CirqCircuit) -> String {
    let n = circuit.num_qubits() as usize;
    let columns: Vec<Column> = circuit.moments().iter().map(|m| column(n, m)).collect();
    let labels: Vec<String> = (0..n).map(|i| format!("{i}: ")).collect();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(n * 2);
    for (row, label) in labels.iter().enumerate() {
        let mut line = format!("{label:<label_width$}");
        for col in &columns {
            line.extend(std::iter::repeat_n(WIRE, 3));
            let symbol = col.cells[row].as_deref().unwrap_or("");
            line.push_str(symbol);
            let pad = col.width - symbol.chars().count();
            line.extend(std::iter::repeat_n(WIRE, pad));
        }
        line.extend(std::iter::repeat_n(WIRE, 3));
        lines.push(line);

        if row + 1 < n {
            let mut gap = " ".repeat(label_width);
            for col in &columns {
                gap.push_str("   ");
                gap.push(if col.links[row] { LINK } else { ' ' });
                gap.push_str(&" ".repeat(col.width - 1));
            }
            lines.push(gap.trim_end().to_string());
        }
    }
    lines.join("\n")
}
