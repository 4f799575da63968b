//! Line-oriented script interpreter.
//!
//! A script is plain text, one instruction per line. Blank lines and lines
//! starting with `#` are ignored. Every other line is classified into a
//! [`Command`] and executed in order against a [`ScriptContext`].
//!
//! # Features
//!
//! - Flow control: `if <condition>`, `else`, `endif`
//! - Shorthand actions: `cmd:`, `open:`, `close`, `msg:`, `console:`, `perm:`
//! - Variables: `set <name> <value>`, `math <name> <op> <value>`,
//!   `random <name> <min> <max>`
//! - `{name}` placeholders in any argument
//! - Calls to registered functions: `<name>: <args...>`
//!
//! `loop <n>`, `endloop`, `break` and `continue` are recognised but do not
//! iterate; they produce a null value.
//!
//! # Example
//!
//! ```rust
//! use guiscript::{ScriptEngine, Value};
//! use guiscript::host::memory::{MemoryActor, MemoryServer};
//! use std::sync::Arc;
//!
//! let engine = ScriptEngine::builder(MemoryServer::new().host()).build();
//! let actor = Arc::new(MemoryActor::new("Steve"));
//! let mut ctx = engine.create_context(actor.clone());
//!
//! let result = engine.execute_script(
//!     "set coins 10\n\
//!      math coins - 3\n\
//!      if {coins} >= 5\n\
//!        msg: {player} still has {coins} coins\n\
//!      endif",
//!     &mut ctx,
//! );
//!
//! assert!(result.is_success());
//! assert_eq!(actor.messages(), vec!["Steve still has 7.0 coins".to_string()]);
//! ```

mod ast;
mod budget;
mod condition;
mod context;
mod control;
pub(crate) mod dispatcher;
pub(crate) mod parser;
mod placeholder;
mod value;

pub use ast::{CmdLine, Command, MathOp};
pub use budget::Budget;
pub use condition::evaluate as evaluate_condition;
pub use context::ScriptContext;
pub use control::ConditionStack;
pub use parser::parse_line;
pub use placeholder::resolve as resolve_placeholders;
pub use value::Value;
