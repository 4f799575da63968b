//! Built-in functions and the actions shared with shorthand lines.

use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::registry::{effects, FunctionRegistry};
use crate::result::{CapabilityError, ScriptError};
use crate::script::{MathOp, ScriptContext, Value};

/// Longest pause a single `delay` may block for, in milliseconds.
pub const MAX_DELAY_MS: i64 = 10_000;

/// Install every built-in into `registry`.
pub(crate) fn install(registry: &FunctionRegistry) {
    registry.register("cmd", cmd);
    registry.register("open", open);
    registry.register("close", close);
    registry.register("msg", msg);
    registry.register("console", console);
    registry.register("perm", perm);
    registry.register("set", set);
    registry.register("math", math);
    registry.register("random", random);
    registry.register("delay", delay_fn);
    registry.register("include", include);
    effects::install(registry);
}

/// Report a soft failure to the actor and yield `false` for the line.
pub(crate) fn soft_failure(ctx: &ScriptContext, err: CapabilityError) -> Value {
    warn!(actor = %ctx.actor().name(), error = %err, "soft failure");
    ctx.actor().send_message(&err.to_string());
    Value::Bool(false)
}

pub(crate) fn joined(args: &[Value]) -> String {
    args.iter()
        .map(Value::as_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `command` as the named target, or as the acting player when the
/// target is absent or not online.
pub(crate) fn run_player_command(
    ctx: &mut ScriptContext,
    target: Option<&str>,
    command: &str,
) -> Result<Value, ScriptError> {
    if command.trim().is_empty() {
        return Ok(Value::Bool(false));
    }

    let actor = match target {
        Some(name) => ctx
            .engine()
            .host()
            .actors
            .find_actor(name)
            .unwrap_or_else(|| {
                debug!(target = name, "command target not found, using acting player");
                ctx.actor().clone()
            }),
        None => ctx.actor().clone(),
    };

    ctx.increment_command_count()?;
    Ok(Value::Bool(actor.run_command(command)))
}

pub(crate) fn open_gui(
    ctx: &mut ScriptContext,
    gui_id: &str,
    target: Option<&str>,
) -> Result<Value, ScriptError> {
    let actor = match target {
        Some(name) => match ctx.engine().host().actors.find_actor(name) {
            Some(actor) => actor,
            None => {
                debug!(target = name, gui = gui_id, "gui target not found");
                return Ok(Value::Bool(false));
            }
        },
        None => ctx.actor().clone(),
    };

    ctx.increment_command_count()?;
    Ok(Value::Bool(
        ctx.engine().host().gui.open_gui(actor.as_ref(), gui_id),
    ))
}

pub(crate) fn close_gui(ctx: &mut ScriptContext) -> Result<Value, ScriptError> {
    ctx.increment_command_count()?;
    Ok(Value::Bool(
        ctx.engine().host().gui.close_gui(ctx.actor().as_ref()),
    ))
}

pub(crate) fn send_message(ctx: &ScriptContext, text: &str) -> Value {
    ctx.actor().send_message(text);
    Value::Bool(true)
}

pub(crate) fn run_console_command(
    ctx: &mut ScriptContext,
    command: &str,
) -> Result<Value, ScriptError> {
    if !ctx.engine().config().allow_console_commands {
        return Ok(soft_failure(ctx, CapabilityError::ConsoleDisabled));
    }
    if command.trim().is_empty() {
        return Ok(Value::Bool(false));
    }

    ctx.increment_command_count()?;
    Ok(Value::Bool(
        ctx.engine().host().console.dispatch_console(command),
    ))
}

pub(crate) fn set_variable(ctx: &mut ScriptContext, name: &str, value: impl Into<Value>) -> Value {
    ctx.set_variable(name, value);
    Value::Bool(true)
}

/// `math`: combine the variable's number with `operand` and store it back.
///
/// A missing variable counts as 0. Non-numeric input yields `false`;
/// division by zero aborts the script.
pub(crate) fn apply_math(
    ctx: &mut ScriptContext,
    name: &str,
    op: MathOp,
    operand: &str,
) -> Result<Value, ScriptError> {
    let current = match ctx.variable(name) {
        None => 0.0,
        Some(value) => match value.as_number() {
            Some(n) => n,
            None => {
                debug!(variable = name, "math on non-numeric variable");
                return Ok(Value::Bool(false));
            }
        },
    };
    let Ok(operand) = operand.trim().parse::<f64>() else {
        debug!(variable = name, operand, "math with non-numeric operand");
        return Ok(Value::Bool(false));
    };

    let result = match op {
        MathOp::Add => current + operand,
        MathOp::Sub => current - operand,
        MathOp::Mul => current * operand,
        MathOp::Div => {
            if operand == 0.0 {
                return Err(ScriptError::Arithmetic("Division by zero".to_string()));
            }
            current / operand
        }
    };

    ctx.set_variable(name, Value::Number(result));
    Ok(Value::Bool(true))
}

/// `random`: store an integer drawn uniformly from `[min, max]`.
pub(crate) fn store_random(ctx: &mut ScriptContext, name: &str, min: &str, max: &str) -> Value {
    let (Ok(min), Ok(max)) = (min.trim().parse::<i64>(), max.trim().parse::<i64>()) else {
        return Value::Bool(false);
    };
    if min >= max {
        debug!(variable = name, min, max, "random needs min < max");
        return Value::Bool(false);
    }

    let roll = rand::thread_rng().gen_range(min..=max);
    ctx.set_variable(name, Value::from(roll));
    Value::Bool(true)
}

/// `delay`: block the calling thread for up to [`MAX_DELAY_MS`].
pub(crate) fn delay(millis: &str) -> Value {
    let Ok(millis) = millis.trim().parse::<i64>() else {
        return Value::Bool(false);
    };
    if millis > 0 {
        let capped = u64::try_from(millis.min(MAX_DELAY_MS)).unwrap_or_default();
        thread::sleep(Duration::from_millis(capped));
    }
    Value::Bool(true)
}

fn cmd(ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    run_player_command(ctx, None, &joined(args))
}

fn open(ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    let Some(gui_id) = args.first().map(Value::as_string) else {
        return Ok(Value::Bool(false));
    };
    let target = args.get(1).map(Value::as_string);
    open_gui(ctx, &gui_id, target.as_deref())
}

fn close(ctx: &mut ScriptContext, _args: &[Value]) -> Result<Value, ScriptError> {
    close_gui(ctx)
}

fn msg(ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    if args.is_empty() {
        return Ok(Value::Bool(false));
    }
    Ok(send_message(ctx, &joined(args)))
}

fn console(ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    run_console_command(ctx, &joined(args))
}

fn perm(ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    let Some(permission) = args.first() else {
        return Ok(Value::Bool(false));
    };
    Ok(Value::Bool(
        ctx.actor().has_permission(&permission.as_string()),
    ))
}

fn set(ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    match args {
        [name, value] => Ok(set_variable(ctx, &name.as_string(), value.clone())),
        [name, rest @ ..] if !rest.is_empty() => {
            Ok(set_variable(ctx, &name.as_string(), joined(rest)))
        }
        _ => Ok(Value::Bool(false)),
    }
}

fn math(ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    let [name, op, operand, ..] = args else {
        return Ok(Value::Bool(false));
    };
    let Some(op) = MathOp::from_symbol(&op.as_string()) else {
        return Ok(Value::Bool(false));
    };
    apply_math(ctx, &name.as_string(), op, &operand.as_string())
}

fn random(ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    let [name, min, max, ..] = args else {
        return Ok(Value::Bool(false));
    };
    Ok(store_random(
        ctx,
        &name.as_string(),
        &min.as_string(),
        &max.as_string(),
    ))
}

fn delay_fn(_ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    Ok(args
        .first()
        .map(|millis| delay(&millis.as_string()))
        .unwrap_or(Value::Bool(false)))
}

/// `include`: run another script against the same context.
fn include(ctx: &mut ScriptContext, args: &[Value]) -> Result<Value, ScriptError> {
    let Some(name) = args.first().map(Value::as_string) else {
        return Ok(Value::Bool(false));
    };

    let engine = ctx.engine().clone();
    let Some(source) = engine.host().scripts.load_script(&name) else {
        warn!(script = %name, "included script not found");
        return Ok(Value::Bool(false));
    };

    engine.run_nested(&name, &source, ctx)?;
    Ok(Value::Bool(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{MemoryActor, MemoryServer};
    use crate::ScriptEngine;
    use std::sync::Arc;
    use std::time::Instant;

    fn context() -> (Arc<MemoryActor>, ScriptContext) {
        let engine = ScriptEngine::builder(MemoryServer::new().host()).build();
        let actor = Arc::new(MemoryActor::new("Steve"));
        let ctx = engine.create_context(actor.clone());
        (actor, ctx)
    }

    #[test]
    fn test_math_on_absent_variable() {
        let (_, mut ctx) = context();
        let value = apply_math(&mut ctx, "x", MathOp::Add, "5").unwrap();
        assert_eq!(value, Value::Bool(true));
        assert_eq!(ctx.variable("x"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_math_non_numeric_is_soft() {
        let (_, mut ctx) = context();
        ctx.set_variable("name", "Steve");
        let value = apply_math(&mut ctx, "name", MathOp::Add, "1").unwrap();
        assert_eq!(value, Value::Bool(false));
        assert_eq!(ctx.variable("name"), Some(&Value::from("Steve")));

        let value = apply_math(&mut ctx, "x", MathOp::Add, "lots").unwrap();
        assert_eq!(value, Value::Bool(false));
        assert!(ctx.variable("x").is_none());
    }

    #[test]
    fn test_math_division_by_zero() {
        let (_, mut ctx) = context();
        ctx.set_variable("x", 10.0);
        let err = apply_math(&mut ctx, "x", MathOp::Div, "0").unwrap_err();
        assert!(matches!(err, ScriptError::Arithmetic(_)));
    }

    #[test]
    fn test_random_bounds() {
        let (_, mut ctx) = context();
        for _ in 0..50 {
            assert_eq!(store_random(&mut ctx, "roll", "1", "3"), Value::Bool(true));
            let roll = ctx.variable("roll").and_then(Value::as_number).unwrap();
            assert!((1.0..=3.0).contains(&roll));
            assert_eq!(roll.fract(), 0.0);
        }
    }

    #[test]
    fn test_random_equal_bounds_rejected() {
        let (_, mut ctx) = context();
        assert_eq!(store_random(&mut ctx, "x", "5", "5"), Value::Bool(false));
        assert!(ctx.variable("x").is_none());
        assert_eq!(store_random(&mut ctx, "x", "a", "5"), Value::Bool(false));
    }

    #[test]
    fn test_delay_non_positive_is_immediate() {
        let start = Instant::now();
        assert_eq!(delay("0"), Value::Bool(true));
        assert_eq!(delay("-50"), Value::Bool(true));
        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(delay("soon"), Value::Bool(false));
    }

    #[test]
    fn test_delay_blocks() {
        let start = Instant::now();
        assert_eq!(delay("30"), Value::Bool(true));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_set_keeps_raw_value() {
        let (_, mut ctx) = context();
        set(&mut ctx, &[Value::from("n"), Value::Number(3.0)]).unwrap();
        assert_eq!(ctx.variable("n"), Some(&Value::Number(3.0)));

        set(&mut ctx, &[Value::from("s"), Value::from("a"), Value::from("b")]).unwrap();
        assert_eq!(ctx.variable("s"), Some(&Value::from("a b")));

        assert_eq!(set(&mut ctx, &[Value::from("x")]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_cmd_joins_arguments() {
        let (actor, mut ctx) = context();
        cmd(&mut ctx, &[Value::from("spawn"), Value::from("now")]).unwrap();
        assert_eq!(actor.commands(), vec!["spawn now".to_string()]);
        assert_eq!(ctx.command_count(), 1);
    }
}
