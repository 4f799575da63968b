//! Script engine: the entry point for running scripts.

mod builder;
mod config;

pub use builder::{
    EngineBuilder, DEFAULT_MAX_COMMANDS, DEFAULT_MAX_INCLUDE_DEPTH, DEFAULT_TIMEOUT_MS,
};
pub use config::ScriptConfig;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::host::{Actor, Host};
use crate::registry::{FunctionRegistry, ScriptFunction};
use crate::result::{ScriptError, ScriptResult};
use crate::script::{dispatcher, ScriptContext, Value};

struct EngineInner {
    registry: FunctionRegistry,
    host: Host,
    config: RwLock<ScriptConfig>,
}

/// Runs scripts against a host.
///
/// The engine is a cheap handle: clones share the same function registry,
/// host services and configuration, and may be used from several threads
/// at once. Each execution gets its own [`ScriptContext`].
///
/// # Examples
///
/// ```
/// use guiscript::{ScriptEngine, Value};
/// use guiscript::host::memory::{MemoryActor, MemoryServer};
/// use std::sync::Arc;
///
/// let server = MemoryServer::new();
/// let engine = ScriptEngine::builder(server.host()).build();
/// let actor = Arc::new(MemoryActor::new("Steve"));
///
/// let mut ctx = engine.create_context(actor.clone());
/// let result = engine.execute_script("open: shop\ncmd: spawn", &mut ctx);
///
/// assert!(result.is_success());
/// assert_eq!(ctx.command_count(), 2);
/// assert_eq!(server.opened(), vec![("Steve".to_string(), "shop".to_string())]);
/// ```
#[derive(Clone)]
pub struct ScriptEngine {
    inner: Arc<EngineInner>,
}

impl ScriptEngine {
    /// Create a new engine builder.
    pub fn builder(host: Host) -> EngineBuilder {
        EngineBuilder::new(host)
    }

    /// Create an engine with default configuration and all built-ins.
    pub fn new(host: Host) -> Self {
        Self::builder(host).build()
    }

    /// Current configuration.
    pub fn config(&self) -> ScriptConfig {
        *self.inner.config.read()
    }

    /// Replace the configuration. Affects contexts created afterwards;
    /// the console switch and include depth apply immediately.
    pub fn set_config(&self, config: ScriptConfig) {
        *self.inner.config.write() = config;
    }

    /// Host services.
    pub fn host(&self) -> &Host {
        &self.inner.host
    }

    /// The function registry.
    pub fn registry(&self) -> &FunctionRegistry {
        &self.inner.registry
    }

    /// Create a fresh context for `actor`.
    pub fn create_context(&self, actor: Arc<dyn Actor>) -> ScriptContext {
        self.create_context_with(actor, HashMap::new())
    }

    /// Create a context for `actor` seeded with `variables`.
    pub fn create_context_with(
        &self,
        actor: Arc<dyn Actor>,
        variables: HashMap<String, Value>,
    ) -> ScriptContext {
        let config = self.config();
        ScriptContext::new(
            self.clone(),
            actor,
            variables,
            config.max_commands,
            config.timeout(),
        )
    }

    /// Run `source` line by line against `ctx`.
    ///
    /// Any hard failure, including one raised inside an included script,
    /// stops execution and is returned as [`ScriptResult::Failure`].
    pub fn execute_script(&self, source: &str, ctx: &mut ScriptContext) -> ScriptResult {
        let result = dispatcher::run(source, ctx);
        if let Err(err) = &result {
            warn!(actor = %ctx.actor().name(), error = %err, "script failed");
        }
        result.into()
    }

    /// Run `source` in a new context for `actor`.
    pub fn execute(
        &self,
        source: &str,
        actor: Arc<dyn Actor>,
        variables: HashMap<String, Value>,
    ) -> ScriptResult {
        let mut ctx = self.create_context_with(actor, variables);
        self.execute_script(source, &mut ctx)
    }

    /// Load script `name` from the host's script source and run it.
    pub fn execute_named(&self, name: &str, ctx: &mut ScriptContext) -> ScriptResult {
        match self.host().scripts.load_script(name) {
            Some(source) => self.execute_script(&source, ctx),
            None => {
                warn!(script = name, "script not found");
                ScriptResult::Failure(ScriptError::ScriptNotFound(name.to_string()))
            }
        }
    }

    /// Resolve placeholders in `text` against `ctx` and evaluate it.
    pub fn evaluate_condition(&self, text: &str, ctx: &ScriptContext) -> bool {
        ctx.evaluate_condition(text)
    }

    /// Register a function. Returns `false` if the name is taken.
    pub fn register_function<F>(&self, name: impl Into<String>, function: F) -> bool
    where
        F: Fn(&mut ScriptContext, &[Value]) -> Result<Value, ScriptError> + Send + Sync + 'static,
    {
        self.inner.registry.register(name, function)
    }

    /// Remove a function, reporting whether it existed.
    pub fn unregister_function(&self, name: &str) -> bool {
        self.inner.registry.unregister(name)
    }

    /// Look up a function.
    pub fn function(&self, name: &str) -> Option<ScriptFunction> {
        self.inner.registry.lookup(name)
    }

    /// Names of all registered functions, sorted.
    pub fn function_names(&self) -> Vec<String> {
        self.inner.registry.names()
    }

    /// Run an included script against the same context, one level deeper.
    pub(crate) fn run_nested(
        &self,
        name: &str,
        source: &str,
        ctx: &mut ScriptContext,
    ) -> Result<Value, ScriptError> {
        let limit = self.config().max_include_depth;
        if limit > 0 && ctx.include_depth() >= limit {
            return Err(ScriptError::IncludeDepthExceeded { limit });
        }

        ctx.enter_include();
        debug!(script = name, depth = ctx.include_depth(), "entering include");
        let result = dispatcher::run(source, ctx);
        ctx.leave_include();
        debug!(script = name, ok = result.is_ok(), "leaving include");
        result
    }
}

impl std::fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEngine")
            .field("config", &self.config())
            .field("functions", &self.inner.registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{MemoryActor, MemoryServer};

    fn engine() -> (Arc<MemoryServer>, ScriptEngine) {
        let server = MemoryServer::new();
        let engine = ScriptEngine::builder(server.host()).build();
        (server, engine)
    }

    #[test]
    fn test_context_takes_config() {
        let (_, engine) = engine();
        engine.set_config(ScriptConfig {
            max_commands: 1,
            ..ScriptConfig::default()
        });
        let actor = Arc::new(MemoryActor::new("Steve"));
        let result = engine.execute("cmd: a\ncmd: b", actor, HashMap::new());
        assert!(matches!(
            result.error(),
            Some(ScriptError::BudgetExceeded { limit: 1 })
        ));
    }

    #[test]
    fn test_execute_named() {
        let (server, engine) = engine();
        server.add_script("hello", "msg: hi {player}");
        let actor = Arc::new(MemoryActor::new("Alex"));
        let mut ctx = engine.create_context(actor.clone());

        assert!(engine.execute_named("hello", &mut ctx).is_success());
        assert_eq!(actor.messages(), vec!["hi Alex".to_string()]);

        let missing = engine.execute_named("nope", &mut ctx);
        assert!(matches!(missing.error(), Some(ScriptError::ScriptNotFound(name)) if name == "nope"));
    }

    #[test]
    fn test_clones_share_registry() {
        let (_, engine) = engine();
        let other = engine.clone();
        assert!(other.register_function("ping", |_: &mut ScriptContext, _: &[Value]| {
            Ok(Value::from("pong"))
        }));
        assert!(engine.function("ping").is_some());
        assert!(engine.function_names().contains(&"ping".to_string()));
        assert!(engine.unregister_function("ping"));
        assert!(other.function("ping").is_none());
    }

    #[test]
    fn test_evaluate_condition_resolves_placeholders() {
        let (_, engine) = engine();
        let mut ctx = engine.create_context(Arc::new(MemoryActor::new("Steve")));
        ctx.set_variable("coins", 12);
        assert!(engine.evaluate_condition("{coins} >= 10", &ctx));
        assert!(engine.evaluate_condition("{player} == Steve", &ctx));
        assert!(!engine.evaluate_condition("{coins} < 10", &ctx));
    }
}
