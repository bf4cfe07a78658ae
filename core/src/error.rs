// crm-core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Error kinds produced by the batch-mutation engine.
///
/// The first three variants are expected business failures and display as the
/// bare, human-readable reason, so batch error lists can render them as
/// `Record {n}: {reason}` without re-formatting. `Infrastructure` is reserved
/// for genuine faults (storage unavailable, connection loss) and always aborts
/// the surrounding atomic scope.
#[derive(Debug, Error)]
pub enum CoreError {
  /// A candidate record broke a structural or business rule.
  #[error("{reason}")]
  Validation { reason: String },

  /// A referenced entity does not exist in the repository.
  #[error("{reason}")]
  NotFound { reason: String },

  /// A unique-key collision, usually surfaced post-hoc by the repository
  /// after a clean validator pre-check lost a race.
  #[error("{reason}")]
  Conflict { reason: String },

  /// Storage or environment fault.
  #[error("Infrastructure error: {source}")]
  Infrastructure {
    #[source]
    source: AnyhowError,
  },
}

impl CoreError {
  pub fn validation(reason: impl Into<String>) -> Self {
    CoreError::Validation { reason: reason.into() }
  }

  pub fn not_found(reason: impl Into<String>) -> Self {
    CoreError::NotFound { reason: reason.into() }
  }

  pub fn conflict(reason: impl Into<String>) -> Self {
    CoreError::Conflict { reason: reason.into() }
  }

  /// True for faults that abort an atomic scope rather than being reported
  /// as a per-record rule violation.
  pub fn is_infrastructure(&self) -> bool {
    matches!(self, CoreError::Infrastructure { .. })
  }
}

// The conversion the engine provides for external faults: anything a store
// implementation bubbles up through anyhow is an infrastructure error, never
// a validation outcome.
impl From<AnyhowError> for CoreError {
  fn from(err: AnyhowError) -> Self {
    CoreError::Infrastructure { source: err }
  }
}

pub type CoreResult<T, E = CoreError> = std::result::Result<T, E>;
