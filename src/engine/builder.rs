//! Engine builder for configuration

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::engine::{EngineInner, ScriptConfig, ScriptEngine};
use crate::host::Host;
use crate::registry::FunctionRegistry;

/// Default ceiling on command-like actions per execution
pub const DEFAULT_MAX_COMMANDS: u32 = 10;

/// Default wall-clock limit per execution (in milliseconds)
pub const DEFAULT_TIMEOUT_MS: i64 = 1000;

/// Default maximum `include` nesting
pub const DEFAULT_MAX_INCLUDE_DEPTH: u32 = 16;

/// Builder for configuring a [`ScriptEngine`].
///
/// # Defaults
///
/// - Max commands: 10
/// - Timeout: 1000 ms
/// - Console commands: allowed
/// - Max include depth: 16
/// - Built-in functions: installed
///
/// # Examples
///
/// ```
/// use guiscript::ScriptEngine;
/// use guiscript::host::memory::MemoryServer;
/// use std::time::Duration;
///
/// let engine = ScriptEngine::builder(MemoryServer::new().host())
///     .max_commands(50)
///     .timeout(Duration::from_millis(250))
///     .allow_console_commands(false)
///     .build();
///
/// assert_eq!(engine.config().max_commands, 50);
/// assert!(!engine.config().allow_console_commands);
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    host: Host,
    config: ScriptConfig,
    builtins: bool,
}

impl EngineBuilder {
    /// Create a builder with default configuration.
    pub fn new(host: Host) -> Self {
        Self {
            host,
            config: ScriptConfig::default(),
            builtins: true,
        }
    }

    /// Set the command-count ceiling. 0 disables it.
    pub fn max_commands(mut self, limit: u32) -> Self {
        self.config.max_commands = limit;
        self
    }

    /// Set the wall-clock limit.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        self
    }

    /// Disable the wall-clock limit.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = 0;
        self
    }

    /// Allow or forbid `console:`.
    pub fn allow_console_commands(mut self, allow: bool) -> Self {
        self.config.allow_console_commands = allow;
        self
    }

    /// Set the deepest allowed `include` nesting. 0 disables the limit.
    pub fn max_include_depth(mut self, depth: u32) -> Self {
        self.config.max_include_depth = depth;
        self
    }

    /// Replace every option at once.
    pub fn config(mut self, config: ScriptConfig) -> Self {
        self.config = config;
        self
    }

    /// Start with an empty function registry.
    ///
    /// Shorthand lines (`msg:`, `set`, ...) keep working; only generic
    /// `name: args` calls depend on the registry.
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    /// Build the engine.
    pub fn build(self) -> ScriptEngine {
        let registry = if self.builtins {
            FunctionRegistry::with_builtins()
        } else {
            FunctionRegistry::new()
        };

        ScriptEngine {
            inner: Arc::new(EngineInner {
                registry,
                host: self.host,
                config: RwLock::new(self.config),
            }),
        }
    }
}
