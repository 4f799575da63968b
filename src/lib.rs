//! guiscript: action scripts for menu and command triggers
//!
//! guiscript interprets small line-oriented scripts attached to GUI buttons
//! and chat commands on a game server. A script runs as one player, can
//! branch on conditions, keep variables, run commands, open menus and
//! trigger effects, and is bounded by a command budget and a deadline.
//!
//! # Features
//!
//! - **Line grammar**: `if`/`else`/`endif`, shorthand actions (`cmd:`,
//!   `open:`, `msg:`, `console:`, `perm:`, `set`, `math`, `random`, `delay`)
//! - **Placeholders**: `{player}`, `{uuid}`, `{world}` and any variable
//! - **Function registry**: built-ins plus host-registered `name: args` calls
//! - **Includes**: `include: <name>` runs another script in the same context
//! - **Budget**: command ceiling and wall-clock timeout per execution
//! - **Pluggable host**: the server is reached only through traits
//!
//! # Quick Start
//!
//! ```rust
//! use guiscript::ScriptEngine;
//! use guiscript::host::memory::{MemoryActor, MemoryServer};
//! use std::sync::Arc;
//!
//! let server = MemoryServer::new();
//! let engine = ScriptEngine::builder(server.host()).build();
//! let actor = Arc::new(MemoryActor::new("Steve").with_permission("shop.vip"));
//!
//! let script = "\
//! if {player} == Steve
//!   perm: shop.vip
//!   msg: Welcome back, {player}!
//! else
//!   msg: Hello stranger
//! endif
//! open: shop";
//!
//! let result = engine.execute(script, actor.clone(), Default::default());
//! assert!(result.is_success());
//! assert_eq!(actor.messages(), vec!["Welcome back, Steve!".to_string()]);
//! assert_eq!(server.opened(), vec![("Steve".to_string(), "shop".to_string())]);
//! ```
//!
//! # Custom Functions
//!
//! ```rust
//! use guiscript::{ScriptContext, ScriptEngine, ScriptError, Value};
//! use guiscript::host::memory::{MemoryActor, MemoryServer};
//! use std::sync::Arc;
//!
//! let engine = ScriptEngine::new(MemoryServer::new().host());
//! engine.register_function("double", |ctx: &mut ScriptContext, args: &[Value]| {
//!     let n = args
//!         .first()
//!         .and_then(Value::as_number)
//!         .ok_or_else(|| ScriptError::Function {
//!             name: "double".into(),
//!             message: "expected a number".into(),
//!         })?;
//!     ctx.set_variable("doubled", n * 2.0);
//!     Ok(Value::Bool(true))
//! });
//!
//! let actor = Arc::new(MemoryActor::new("Alex"));
//! let mut ctx = engine.create_context(actor.clone());
//! assert!(engine.execute_script("double: 21\nmsg: {doubled}", &mut ctx).is_success());
//! assert_eq!(actor.messages(), vec!["42.0".to_string()]);
//! ```
//!
//! # Configuration
//!
//! Limits come from [`ScriptConfig`], either set through the builder or
//! read from the `script:` section of a YAML file:
//!
//! ```rust
//! use guiscript::{ScriptConfig, ScriptEngine};
//! use guiscript::host::memory::MemoryServer;
//!
//! let config = ScriptConfig::from_yaml_str("script:\n  max-commands: 25\n").unwrap();
//! let engine = ScriptEngine::builder(MemoryServer::new().host())
//!     .config(config)
//!     .build();
//! assert_eq!(engine.config().max_commands, 25);
//! ```

#![warn(missing_docs)]

mod engine;
pub mod host;
mod registry;
mod result;
pub mod script;

// Public API exports
pub use engine::{
    EngineBuilder, ScriptConfig, ScriptEngine, DEFAULT_MAX_COMMANDS, DEFAULT_MAX_INCLUDE_DEPTH,
    DEFAULT_TIMEOUT_MS,
};
pub use registry::{FunctionRegistry, ScriptFunction, MAX_DELAY_MS};
pub use result::{CapabilityError, ConfigError, ScriptError, ScriptResult, StackKind};
pub use script::{ScriptContext, Value};
