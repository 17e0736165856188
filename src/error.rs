use thiserror::Error;

/// Precondition failures surfaced to the caller of an analysis routine.
///
/// These are never retried: each one means the caller supplied an incomplete
/// request and must fix it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The report was requested without a wallet address.
    #[error("missing start address")]
    MissingStartAddress,

    /// The batch handed to the analysis was empty.
    #[error("no transactions supplied")]
    NoTransactions,

    /// A wallet address did not match `0x` + 40 or 64 hex characters.
    #[error("invalid wallet address '{0}'")]
    InvalidAddress(String),
}

/// Precondition failures of the graph routines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// BFS was requested without a focal address.
    #[error("missing start address")]
    MissingStartAddress,
}
