//! Result types for script execution

mod error;

pub use error::{CapabilityError, ConfigError, ScriptError, StackKind};

use crate::script::Value;

/// Outcome of one top-level script execution.
///
/// A result is either a success carrying the last value a line produced,
/// or a failure carrying the hard error that stopped the script. It is
/// never both. Cooperative cancellation is a success.
///
/// # Examples
///
/// ```
/// use guiscript::{ScriptEngine, Value};
/// use guiscript::host::memory::{MemoryActor, MemoryServer};
/// use std::sync::Arc;
///
/// let engine = ScriptEngine::builder(MemoryServer::new().host()).build();
/// let actor = Arc::new(MemoryActor::new("Alex"));
///
/// let result = engine.execute("set coins 5", actor, Default::default());
/// assert!(result.is_success());
/// assert_eq!(result.value(), Some(&Value::Bool(true)));
/// ```
#[derive(Debug)]
pub enum ScriptResult {
    /// The script ran to completion or was cancelled.
    Success(Value),
    /// The script was aborted by a hard failure.
    Failure(ScriptError),
}

impl ScriptResult {
    /// Whether the script completed without a hard failure.
    pub fn is_success(&self) -> bool {
        matches!(self, ScriptResult::Success(_))
    }

    /// The last computed value, if the script succeeded.
    pub fn value(&self) -> Option<&Value> {
        match self {
            ScriptResult::Success(value) => Some(value),
            ScriptResult::Failure(_) => None,
        }
    }

    /// The error that aborted the script, if it failed.
    pub fn error(&self) -> Option<&ScriptError> {
        match self {
            ScriptResult::Success(_) => None,
            ScriptResult::Failure(err) => Some(err),
        }
    }

    /// Human-readable error text, or `"No error"` on success.
    pub fn error_message(&self) -> String {
        match self {
            ScriptResult::Success(_) => "No error".to_string(),
            ScriptResult::Failure(err) => err.to_string(),
        }
    }

    /// Convert into a standard `Result` for use with `?`.
    pub fn into_result(self) -> Result<Value, ScriptError> {
        self.into()
    }
}

impl From<Result<Value, ScriptError>> for ScriptResult {
    fn from(result: Result<Value, ScriptError>) -> Self {
        match result {
            Ok(value) => ScriptResult::Success(value),
            Err(err) => ScriptResult::Failure(err),
        }
    }
}

impl From<ScriptResult> for Result<Value, ScriptError> {
    fn from(result: ScriptResult) -> Self {
        match result {
            ScriptResult::Success(value) => Ok(value),
            ScriptResult::Failure(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_accessors() {
        let result = ScriptResult::Success(Value::Bool(true));
        assert!(result.is_success());
        assert_eq!(result.value(), Some(&Value::Bool(true)));
        assert!(result.error().is_none());
        assert_eq!(result.error_message(), "No error");
    }

    #[test]
    fn test_failure_accessors() {
        let result = ScriptResult::from(Err(ScriptError::BudgetExceeded { limit: 2 }));
        assert!(!result.is_success());
        assert!(result.value().is_none());
        assert_eq!(
            result.error_message(),
            "Script exceeded maximum command limit of 2"
        );
        assert!(matches!(
            result.into_result(),
            Err(ScriptError::BudgetExceeded { limit: 2 })
        ));
    }

    #[test]
    fn test_stack_underflow_message() {
        let err = ScriptError::StackUnderflow(StackKind::Condition);
        assert_eq!(err.to_string(), "The condition stack is empty");
    }
}
