//! `{name}` placeholder substitution.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::host::Actor;
use crate::script::value::Value;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Replace every `{identifier}` token in `text`.
///
/// `player`, `uuid` and `world` (any case) read from the actor; other
/// identifiers read from `variables`. Unknown identifiers become the empty
/// string. The output is not scanned again, so values that themselves
/// contain braces are inserted verbatim.
pub fn resolve(text: &str, actor: &dyn Actor, variables: &HashMap<String, Value>) -> String {
    if !text.contains('{') {
        return text.to_string();
    }

    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            let key = &caps[1];
            if key.eq_ignore_ascii_case("player") {
                actor.name()
            } else if key.eq_ignore_ascii_case("uuid") {
                actor.unique_id().to_string()
            } else if key.eq_ignore_ascii_case("world") {
                actor.world_name()
            } else {
                variables.get(key).map(Value::as_string).unwrap_or_default()
            }
        })
        .into_owned()
}
