use thiserror::Error;

/// All failure modes of a bench run.
///
/// There is deliberately a single runtime fault kind: a
/// [`Violation`](BenchError::Violation)
/// means an observed signal disagreed with the value the protocol mandates
/// at that checkpoint. Wrong start or stop bits, a broken bi-phase
/// complement, a bad opcode or address byte and mistimed chip-select all
/// report identically, and the first one aborts the run. Continuing past a
/// violation would leave the bus framing corrupted and invalidate every
/// later assertion.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error(
        "protocol violation at {time} ns: {subject} expected {expected:#x}, observed {observed:#x}"
    )]
    Violation {
        subject: String,
        expected: u64,
        observed: u64,
        time: u64,
    },

    #[error("no signal named `{0}` on the device")]
    UnknownSignal(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BenchError {
    /// True for the protocol-violation fault kind.
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::Violation { .. })
    }
}
