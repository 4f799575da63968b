//! Line-by-line dispatcher.

use tracing::debug;

use crate::registry::builtins;
use crate::result::ScriptError;
use crate::script::ast::Command;
use crate::script::context::ScriptContext;
use crate::script::parser;
use crate::script::value::Value;

/// Run every line of `source` against `ctx`.
///
/// Returns the last value produced by an executed line. Stops early, with
/// success, when the context is cancelled.
pub(crate) fn run(source: &str, ctx: &mut ScriptContext) -> Result<Value, ScriptError> {
    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;

        ctx.budget().check_deadline()?;
        if ctx.is_cancelled() {
            debug!(line = number, "script cancelled");
            break;
        }

        let line = raw.trim();
        if parser::is_ignorable(line) {
            continue;
        }

        if ctx.is_skipping() {
            track_skipped(line, number, ctx);
            continue;
        }

        let command = parser::parse_line(line)?;
        debug!(line = number, kind = command.kind(), "executing");
        let value = execute(&command, ctx)?;
        ctx.set_result(value);
    }

    Ok(ctx.result().clone())
}

// Only branch structure is tracked here; nothing is resolved or evaluated.
fn track_skipped(line: &str, number: usize, ctx: &mut ScriptContext) {
    match parser::parse_line(line) {
        Ok(Command::If { .. }) => ctx.conditions_mut().push_skipped(),
        Ok(Command::Else) => {
            ctx.conditions_mut().flip();
        }
        Ok(Command::EndIf) => {
            // Skipping implies an open branch
            let _ = ctx.conditions_mut().pop();
        }
        _ => debug!(line = number, "skipped"),
    }
}

fn execute(command: &Command, ctx: &mut ScriptContext) -> Result<Value, ScriptError> {
    match command {
        Command::If { condition } => {
            let taken = ctx.evaluate_condition(condition);
            ctx.push_condition(taken);
            Ok(Value::Bool(taken))
        }
        Command::Else => {
            if !ctx.flip_condition() {
                debug!("else without an open if");
            }
            Ok(Value::Null)
        }
        Command::EndIf => ctx.pop_condition().map(Value::Bool),
        Command::Loop { count } => {
            debug!(count, "loop blocks are not executed");
            Ok(Value::Null)
        }
        Command::EndLoop | Command::Break | Command::Continue => Ok(Value::Null),
        Command::Cmd(cmd) => {
            let mut text = ctx.resolve(&cmd.command);
            if !cmd.trailing.is_empty() {
                text.push(' ');
                text.push_str(&ctx.resolve(&cmd.trailing));
            }
            builtins::run_player_command(ctx, cmd.target.as_deref(), &text)
        }
        Command::Open { gui_id, target } => {
            let gui_id = ctx.resolve(gui_id);
            let target = target.as_deref().map(|name| ctx.resolve(name));
            builtins::open_gui(ctx, &gui_id, target.as_deref())
        }
        Command::Close => builtins::close_gui(ctx),
        Command::Msg { text } => {
            let text = ctx.resolve(text);
            Ok(builtins::send_message(ctx, &text))
        }
        Command::Console { command } => {
            let command = ctx.resolve(command);
            builtins::run_console_command(ctx, &command)
        }
        Command::Perm { permission } => {
            let permission = ctx.resolve(permission);
            Ok(Value::Bool(ctx.actor().has_permission(&permission)))
        }
        Command::Set { name, value } => {
            let value = ctx.resolve(value);
            Ok(builtins::set_variable(ctx, name, value))
        }
        Command::Math { name, op, operand } => {
            let operand = ctx.resolve(operand);
            builtins::apply_math(ctx, name, *op, &operand)
        }
        Command::Random { name, min, max } => {
            let min = ctx.resolve(min);
            let max = ctx.resolve(max);
            Ok(builtins::store_random(ctx, name, &min, &max))
        }
        Command::Delay { millis } => Ok(builtins::delay(&ctx.resolve(millis))),
        Command::Call { name, args } => {
            let function = ctx
                .engine()
                .registry()
                .lookup(name)
                .ok_or_else(|| ScriptError::FunctionNotFound(name.clone()))?;
            let args: Vec<Value> = args
                .iter()
                .map(|arg| Value::String(ctx.resolve(arg)))
                .collect();
            function(ctx, &args)
        }
    }
}
