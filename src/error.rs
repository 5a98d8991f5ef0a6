use thiserror::Error;

/// Failures of the platform layer (terminal, input thread).  The simulation
/// itself has no error cases.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("terminal is {cols}x{rows}; need at least {min_cols}x{min_rows}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },

    #[error("input reader thread stopped")]
    InputClosed,
}
