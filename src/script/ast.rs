//! Parsed form of a single script line.

use std::fmt;

/// One classified script line.
///
/// The parser turns every non-blank, non-comment line into exactly one
/// variant. String payloads are raw text; placeholder resolution happens
/// at execution time so that skipped lines are never resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open a conditional block: `if <condition>`
    If {
        /// Unresolved condition text.
        condition: String,
    },
    /// Flip the innermost conditional block: `else`
    Else,
    /// Close the innermost conditional block: `endif`
    EndIf,
    /// Loop header: `loop <n>`. Recognised but inert.
    Loop {
        /// Requested iteration count.
        count: u64,
    },
    /// Loop footer: `endloop`. Recognised but inert.
    EndLoop,
    /// `break`. Recognised but inert.
    Break,
    /// `continue`. Recognised but inert.
    Continue,
    /// Run a command as a player: `cmd: <command> {<target>} <trailing>`
    Cmd(CmdLine),
    /// Open a GUI: `open: <guiId> [<target>]`
    Open {
        /// GUI identifier.
        gui_id: String,
        /// Optional target player name.
        target: Option<String>,
    },
    /// Close the acting player's GUI: `close`
    Close,
    /// Message the acting player: `msg: <text>`
    Msg {
        /// Unresolved message text.
        text: String,
    },
    /// Run a command as the console: `console: <command>`
    Console {
        /// Unresolved command text.
        command: String,
    },
    /// Permission check: `perm: <permission>`
    Perm {
        /// Permission node.
        permission: String,
    },
    /// Store a variable: `set <name> <value>`
    Set {
        /// Variable name.
        name: String,
        /// Unresolved value text.
        value: String,
    },
    /// Arithmetic on a variable: `math <name> <op> <value>`
    Math {
        /// Variable name.
        name: String,
        /// Operator.
        op: MathOp,
        /// Unresolved operand text.
        operand: String,
    },
    /// Random integer into a variable: `random <name> <min> <max>`
    Random {
        /// Variable name.
        name: String,
        /// Unresolved lower bound.
        min: String,
        /// Unresolved upper bound.
        max: String,
    },
    /// Blocking pause: `delay <millis>`
    Delay {
        /// Unresolved duration in milliseconds.
        millis: String,
    },
    /// Generic registered-function call: `<name>: <args...>`
    Call {
        /// Function name (text before the first colon, trimmed).
        name: String,
        /// Whitespace-separated, unresolved arguments.
        args: Vec<String>,
    },
}

/// Payload of a `cmd:` line.
#[derive(Debug, Clone, PartialEq)]
pub struct CmdLine {
    /// Command text before any `{target}` marker.
    pub command: String,
    /// Player named inside `{...}`, if present.
    ///
    /// The name is looked up exactly as written and is not
    /// placeholder-resolved: `{player}` targets an actor called `player`,
    /// falling back to the invoking actor when none is online.
    pub target: Option<String>,
    /// Text after the target marker, appended to the command.
    pub trailing: String,
}

impl Command {
    /// Whether this line is processed while a false branch is being skipped.
    pub fn is_flow_control(&self) -> bool {
        matches!(self, Command::If { .. } | Command::Else | Command::EndIf)
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::If { .. } => "if",
            Command::Else => "else",
            Command::EndIf => "endif",
            Command::Loop { .. } => "loop",
            Command::EndLoop => "endloop",
            Command::Break => "break",
            Command::Continue => "continue",
            Command::Cmd(_) => "cmd",
            Command::Open { .. } => "open",
            Command::Close => "close",
            Command::Msg { .. } => "msg",
            Command::Console { .. } => "console",
            Command::Perm { .. } => "perm",
            Command::Set { .. } => "set",
            Command::Math { .. } => "math",
            Command::Random { .. } => "random",
            Command::Delay { .. } => "delay",
            Command::Call { .. } => "call",
        }
    }
}

/// Operators accepted by `math`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    /// Addition: `+`
    Add,
    /// Subtraction: `-`
    Sub,
    /// Multiplication: `*`
    Mul,
    /// Division: `/`
    Div,
}

impl MathOp {
    /// Parse an operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(MathOp::Add),
            "-" => Some(MathOp::Sub),
            "*" => Some(MathOp::Mul),
            "/" => Some(MathOp::Div),
            _ => None,
        }
    }

    /// The operator's symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            MathOp::Add => "+",
            MathOp::Sub => "-",
            MathOp::Mul => "*",
            MathOp::Div => "/",
        }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
