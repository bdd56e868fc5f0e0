//! Error taxonomy. See `spec.md` §7. One closed `thiserror` enum plus a
//! `FailureKind` split for provider errors that participate in retry
//! (mirrors the teacher's `OrchestratorError` / `ErrorCategory` split).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContainerError>;

#[derive(Error, Debug)]
pub enum ContainerError {
    // --- Validation ---
    #[error("include path missing or empty for child '{0}'")]
    MissingIncludePath(String),

    #[error("'{0}' is not a valid include declaration")]
    NotAnInclude(String),

    #[error("ambiguous instance specifier: {0}")]
    AmbiguousInstanceSpecifier(String),

    // --- Cycle / depth ---
    #[error("blueprint_cycle_detected: instance '{instance_id}' already present in tree path {tree_path:?}")]
    BlueprintCycleDetected {
        instance_id: String,
        tree_path: Vec<String>,
    },

    #[error("max_blueprint_depth_exceeded: depth {depth} exceeds maximum {max}")]
    MaxBlueprintDepthExceeded { depth: usize, max: usize },

    // --- Resolution ---
    #[error("substitution resolution failed for '{path}': {reason}")]
    ResolutionFailed { path: String, reason: String },

    #[error("value at '{0}' is deferred (resolve-on-deploy) but a concrete value is required now")]
    DeferredValueRequired(String),

    // --- State ---
    #[error("not found: {0}")]
    NotFound(String),

    #[error("state store error: {0}")]
    StateStore(String),

    // --- Provider ---
    #[error("retryable provider error ({unit}): {message}")]
    Retryable { unit: String, message: String },

    #[error("terminal provider error on resource A ({unit}): {message}")]
    TerminalOnA { unit: String, message: String },

    #[error("terminal provider error on resource B ({unit}): {message}")]
    TerminalOnB { unit: String, message: String },

    #[error("terminal provider error on intermediary resources ({unit}): {message}")]
    TerminalOnIntermediaries { unit: String, message: String },

    #[error("provider error ({unit}): {message}")]
    Provider { unit: String, message: String },

    // --- Stabilisation ---
    #[error("stabilisation deadline exceeded for '{0}'")]
    StabilisationDeadlineExceeded(String),

    // --- Cancellation ---
    #[error("operation cancelled")]
    Cancelled,

    // --- Internal / structural ---
    #[error("ordering failed: {0}")]
    OrderingFailed(String),

    #[error("invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ContainerError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Classify a provider error for the retry loop (§4.5/§7). The
    /// `Retryable` variant participates in backoff; everything else is
    /// terminal for its unit and short-circuits immediately, mirroring
    /// the teacher's `ErrorCategory` split in `job.rs`.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ContainerError::Retryable { .. } => FailureKind::Retryable,
            _ => FailureKind::Terminal,
        }
    }

    /// True for state-store lookups where "absent" is recoverable at the
    /// read site (§7 "Not-found errors are recovered at every read site
    /// where 'absent' has a meaningful interpretation").
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContainerError::NotFound(_))
    }
}

/// Whether a provider error should be retried by the deployer's backoff
/// loop or surfaced as terminal immediately. See `spec.md` §4.5/§7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Retryable,
    Terminal,
}
