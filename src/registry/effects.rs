//! Presentation built-ins: sounds, titles, particles, fireworks, healing.
//!
//! All of these delegate to the actor. Bad identifiers or unparsable
//! numbers are soft failures: the actor is told, the line yields `false`,
//! and the script carries on.

use std::str::FromStr;

use rand::Rng;
use tracing::warn;

use crate::host::{FireworkColors, ParticleOffset, Rgb, TitleTimings};
use crate::registry::builtins::{joined, soft_failure};
use crate::registry::FunctionRegistry;
use crate::result::{CapabilityError, ScriptError};
use crate::script::{ScriptContext, Value};

const DEFAULT_PARTICLE_COUNT: i32 = 10;
const DEFAULT_PARTICLE_SPREAD: f64 = 0.5;
const DEFAULT_HEAL: f64 = 20.0;
const DEFAULT_FEED: i32 = 20;

pub(crate) fn install(registry: &FunctionRegistry) {
    registry.register("sound", soft(sound));
    registry.register("title", soft(title));
    registry.register("subtitle", soft(subtitle));
    registry.register("actionbar", soft(actionbar));
    registry.register("particle", soft(particle));
    registry.register("firework", soft(firework));
    registry.register("heal", soft(heal));
    registry.register("feed", soft(feed));
}

type Effect = fn(&ScriptContext, &[Value]) -> Result<bool, CapabilityError>;

fn soft(
    effect: Effect,
) -> impl Fn(&mut ScriptContext, &[Value]) -> Result<Value, ScriptError> + Send + Sync + 'static {
    move |ctx: &mut ScriptContext, args: &[Value]| {
        Ok(match effect(ctx, args) {
            Ok(done) => Value::Bool(done),
            Err(err) => soft_failure(ctx, err),
        })
    }
}

fn parse_or<T: FromStr>(
    args: &[Value],
    index: usize,
    default: T,
    function: &'static str,
) -> Result<T, CapabilityError> {
    match args.get(index) {
        None => Ok(default),
        Some(value) => {
            let text = value.as_string();
            text.trim()
                .parse()
                .map_err(|_| CapabilityError::invalid(function, text))
        }
    }
}

fn timings(args: &[Value], function: &'static str) -> Result<TitleTimings, CapabilityError> {
    let defaults = TitleTimings::default();
    Ok(TitleTimings {
        fade_in: parse_or(args, 1, defaults.fade_in, function)?,
        stay: parse_or(args, 2, defaults.stay, function)?,
        fade_out: parse_or(args, 3, defaults.fade_out, function)?,
    })
}

// sound: <id> [volume] [pitch]
fn sound(ctx: &ScriptContext, args: &[Value]) -> Result<bool, CapabilityError> {
    let Some(id) = args.first().map(Value::as_string) else {
        return Ok(false);
    };
    let volume = parse_or(args, 1, 1.0_f32, "sound")?;
    let pitch = parse_or(args, 2, 1.0_f32, "sound")?;
    ctx.actor().play_sound(&id, volume, pitch)?;
    Ok(true)
}

// title: <text> [fadeIn] [stay] [fadeOut]
fn title(ctx: &ScriptContext, args: &[Value]) -> Result<bool, CapabilityError> {
    let Some(text) = args.first().map(Value::as_string) else {
        return Ok(false);
    };
    let timings = timings(args, "title")?;
    ctx.actor().send_title(&text, "", timings);
    Ok(true)
}

fn subtitle(ctx: &ScriptContext, args: &[Value]) -> Result<bool, CapabilityError> {
    let Some(text) = args.first().map(Value::as_string) else {
        return Ok(false);
    };
    let timings = timings(args, "subtitle")?;
    ctx.actor().send_title("", &text, timings);
    Ok(true)
}

fn actionbar(ctx: &ScriptContext, args: &[Value]) -> Result<bool, CapabilityError> {
    if args.is_empty() {
        return Ok(false);
    }
    let text = joined(args);
    if let Err(err) = ctx.actor().send_action_bar(&text) {
        // Still deliver the text, as a chat message
        warn!(error = %err, "action bar unavailable, sending chat message");
        ctx.actor().send_message(&text);
        return Ok(false);
    }
    Ok(true)
}

// particle: <id> [count] [dx] [dy] [dz]
fn particle(ctx: &ScriptContext, args: &[Value]) -> Result<bool, CapabilityError> {
    let Some(id) = args.first().map(Value::as_string) else {
        return Ok(false);
    };
    let count = parse_or(args, 1, DEFAULT_PARTICLE_COUNT, "particle")?;
    let offset = ParticleOffset {
        x: parse_or(args, 2, DEFAULT_PARTICLE_SPREAD, "particle")?,
        y: parse_or(args, 3, DEFAULT_PARTICLE_SPREAD, "particle")?,
        z: parse_or(args, 4, DEFAULT_PARTICLE_SPREAD, "particle")?,
    };
    ctx.actor().spawn_particle(&id, count, offset)?;
    Ok(true)
}

// firework: [random]
fn firework(ctx: &ScriptContext, args: &[Value]) -> Result<bool, CapabilityError> {
    let random = args
        .first()
        .is_some_and(|arg| arg.as_string().eq_ignore_ascii_case("random"));

    let colors = if random {
        let mut rng = rand::thread_rng();
        let mut pick = || {
            Rgb::new(
                rng.gen_range(0..255),
                rng.gen_range(0..255),
                rng.gen_range(0..255),
            )
        };
        FireworkColors {
            primary: pick(),
            secondary: pick(),
        }
    } else {
        FireworkColors::default()
    };

    ctx.actor().spawn_firework(colors)?;
    Ok(true)
}

fn heal(ctx: &ScriptContext, args: &[Value]) -> Result<bool, CapabilityError> {
    let amount = parse_or(args, 0, DEFAULT_HEAL, "heal")?;
    ctx.actor().heal(amount);
    Ok(true)
}

fn feed(ctx: &ScriptContext, args: &[Value]) -> Result<bool, CapabilityError> {
    let amount = parse_or(args, 0, DEFAULT_FEED, "feed")?;
    ctx.actor().feed(amount);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{Effect as Recorded, MemoryActor, MemoryServer};
    use crate::ScriptEngine;
    use std::sync::Arc;

    fn context(actor: MemoryActor) -> (Arc<MemoryActor>, ScriptContext) {
        let engine = ScriptEngine::builder(MemoryServer::new().host()).build();
        let actor = Arc::new(actor);
        let ctx = engine.create_context(actor.clone());
        (actor, ctx)
    }

    fn args(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_sound_defaults() {
        let (actor, ctx) = context(MemoryActor::new("Steve"));
        assert_eq!(sound(&ctx, &args(&["LEVEL_UP"])), Ok(true));
        assert_eq!(
            actor.effects(),
            vec![Recorded::Sound {
                id: "LEVEL_UP".to_string(),
                volume: 1.0,
                pitch: 1.0
            }]
        );
    }

    #[test]
    fn test_unknown_sound_is_soft() {
        let (actor, mut ctx) = context(MemoryActor::new("Steve").with_sounds(["LEVEL_UP"]));
        let function = soft(sound);
        let value = function(&mut ctx, &args(&["BOOM"])).unwrap();
        assert_eq!(value, Value::Bool(false));
        assert_eq!(actor.messages(), vec!["Unknown sound: BOOM".to_string()]);
    }

    #[test]
    fn test_bad_number_is_soft() {
        let (actor, mut ctx) = context(MemoryActor::new("Steve"));
        let function = soft(title);
        let value = function(&mut ctx, &args(&["Hello", "soon"])).unwrap();
        assert_eq!(value, Value::Bool(false));
        assert!(actor.effects().is_empty());
        assert_eq!(actor.messages().len(), 1);
    }

    #[test]
    fn test_title_timings() {
        let (actor, ctx) = context(MemoryActor::new("Steve"));
        assert_eq!(title(&ctx, &args(&["Welcome", "5", "40", "5"])), Ok(true));
        assert_eq!(
            actor.effects(),
            vec![Recorded::Title {
                title: "Welcome".to_string(),
                subtitle: String::new(),
                timings: TitleTimings {
                    fade_in: 5,
                    stay: 40,
                    fade_out: 5
                },
            }]
        );
    }

    #[test]
    fn test_actionbar_fallback_to_chat() {
        let (actor, ctx) = context(MemoryActor::new("Steve").without_action_bar());
        assert_eq!(actionbar(&ctx, &args(&["Low", "health"])), Ok(false));
        assert_eq!(actor.messages(), vec!["Low health".to_string()]);
    }

    #[test]
    fn test_firework_default_colors() {
        let (actor, ctx) = context(MemoryActor::new("Steve"));
        assert_eq!(firework(&ctx, &[]), Ok(true));
        assert_eq!(
            actor.effects(),
            vec![Recorded::Firework(FireworkColors::default())]
        );
    }

    #[test]
    fn test_heal_and_feed_defaults() {
        let (actor, ctx) = context(MemoryActor::new("Steve"));
        assert_eq!(heal(&ctx, &[]), Ok(true));
        assert_eq!(feed(&ctx, &args(&["4"])), Ok(true));
        assert_eq!(
            actor.effects(),
            vec![Recorded::Heal(20.0), Recorded::Feed(4)]
        );
    }
}
