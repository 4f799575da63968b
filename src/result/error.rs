//! Error types for script execution

use std::fmt;
use thiserror::Error;

/// Which of the two context stacks an underflow happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    /// The scratch data stack used by functions.
    Data,
    /// The condition stack tracking open `if` blocks.
    Condition,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackKind::Data => f.write_str("data"),
            StackKind::Condition => f.write_str("condition"),
        }
    }
}

/// Hard failures that terminate a script execution.
///
/// Every variant aborts the whole top-level execution, including any
/// nested `include` calls, and ends up in [`ScriptResult::Failure`].
/// Recoverable problems with host capabilities are reported through
/// [`CapabilityError`] instead and never surface here.
///
/// # Examples
///
/// ```
/// use guiscript::{ScriptEngine, ScriptError};
/// use guiscript::host::memory::{MemoryActor, MemoryServer};
/// use std::sync::Arc;
///
/// let engine = ScriptEngine::builder(MemoryServer::new().host()).build();
/// let actor = Arc::new(MemoryActor::new("Steve"));
///
/// let result = engine.execute("endif", actor, Default::default());
/// match result.error() {
///     Some(ScriptError::StackUnderflow(kind)) => println!("underflow on {kind} stack"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
///
/// [`ScriptResult::Failure`]: crate::ScriptResult::Failure
#[derive(Error, Debug)]
pub enum ScriptError {
    /// A line matched none of the known command forms.
    #[error("Unknown script command: {line}")]
    UnknownCommand {
        /// The offending line, trimmed.
        line: String,
    },

    /// Pop or peek on an empty stack.
    #[error("The {0} stack is empty")]
    StackUnderflow(StackKind),

    /// Arithmetic that cannot produce a value, such as division by zero.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// The command-count ceiling was exceeded.
    #[error("Script exceeded maximum command limit of {limit}")]
    BudgetExceeded {
        /// The configured ceiling.
        limit: u32,
    },

    /// The wall-clock deadline passed before the script finished.
    #[error("Script execution timed out (limit {limit_ms} ms)")]
    Timeout {
        /// The configured deadline in milliseconds.
        limit_ms: u64,
    },

    /// A generic `name: args` call named a function that is not registered.
    #[error("Unknown script function: {0}")]
    FunctionNotFound(String),

    /// Nested `include` calls went deeper than the configured limit.
    #[error("Include depth exceeded maximum of {limit}")]
    IncludeDepthExceeded {
        /// The configured maximum depth.
        limit: u32,
    },

    /// A script requested by name could not be loaded from the script source.
    #[error("Script not found: {0}")]
    ScriptNotFound(String),

    /// A registered function reported a failure that must abort the script.
    #[error("Function '{name}' failed: {message}")]
    Function {
        /// Name the function was registered under.
        name: String,
        /// Description of the failure.
        message: String,
    },
}

/// Soft failures raised by host capabilities.
///
/// These are reported to the acting player and turn the current line's
/// value into `false`; execution then continues with the next line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The host does not know the requested sound identifier.
    #[error("Unknown sound: {0}")]
    UnknownSound(String),

    /// The host does not know the requested particle identifier.
    #[error("Unknown particle effect: {0}")]
    UnknownParticle(String),

    /// An argument could not be interpreted (bad number, missing value).
    #[error("Invalid argument for {function}: {value}")]
    InvalidArgument {
        /// The built-in that rejected the argument.
        function: &'static str,
        /// The raw argument text.
        value: String,
    },

    /// Console dispatch is switched off in the configuration.
    #[error("Console commands are disabled in the configuration.")]
    ConsoleDisabled,

    /// The host cannot perform this presentation effect at all.
    #[error("Unsupported by this host: {0}")]
    Unsupported(&'static str),
}

impl CapabilityError {
    pub(crate) fn invalid(function: &'static str, value: impl Into<String>) -> Self {
        CapabilityError::InvalidArgument {
            function,
            value: value.into(),
        }
    }
}

/// Failures while loading a [`ScriptConfig`](crate::ScriptConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid YAML or has mistyped keys.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}
