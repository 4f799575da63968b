//! In-memory host that records everything scripts do.
//!
//! # Examples
//!
//! ```
//! use guiscript::ScriptEngine;
//! use guiscript::host::memory::{MemoryActor, MemoryServer};
//! use std::sync::Arc;
//!
//! let server = MemoryServer::new();
//! server.add_script("greet", "msg: Hello {player}");
//!
//! let engine = ScriptEngine::builder(server.host()).build();
//! let actor = Arc::new(MemoryActor::new("Alex"));
//! let result = engine.execute("include: greet", actor.clone(), Default::default());
//!
//! assert!(result.is_success());
//! assert_eq!(actor.messages(), vec!["Hello Alex".to_string()]);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use super::{
    Actor, ActorDirectory, ConsoleExecutor, FireworkColors, GuiService, Host, MemoryScriptSource,
    ParticleOffset, ScriptSource, TitleTimings,
};
use crate::result::CapabilityError;

/// A presentation effect received by a [`MemoryActor`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// `play_sound`
    Sound {
        /// Sound identifier.
        id: String,
        /// Volume.
        volume: f32,
        /// Pitch.
        pitch: f32,
    },
    /// `send_title`
    Title {
        /// Title line.
        title: String,
        /// Subtitle line.
        subtitle: String,
        /// Timings.
        timings: TitleTimings,
    },
    /// `send_action_bar`
    ActionBar(String),
    /// `spawn_particle`
    Particle {
        /// Particle identifier.
        id: String,
        /// Particle count.
        count: i32,
        /// Spread.
        offset: ParticleOffset,
    },
    /// `spawn_firework`
    Firework(FireworkColors),
    /// `heal`
    Heal(f64),
    /// `feed`
    Feed(i32),
}

/// A player that records messages, commands and effects.
///
/// Holds every permission unless some are granted explicitly. Accepts any
/// sound or particle unless a known set is configured.
#[derive(Debug)]
pub struct MemoryActor {
    name: String,
    id: Uuid,
    world: String,
    permissions: Option<HashSet<String>>,
    sounds: Option<HashSet<String>>,
    particles: Option<HashSet<String>>,
    action_bar: bool,
    accept_commands: bool,
    messages: Mutex<Vec<String>>,
    commands: Mutex<Vec<String>>,
    effects: Mutex<Vec<Effect>>,
}

fn upper_set<I, S>(items: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_ascii_uppercase())
        .collect()
}

impl MemoryActor {
    /// Create a player in world `world` with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: Uuid::new_v4(),
            world: "world".to_string(),
            permissions: None,
            sounds: None,
            particles: None,
            action_bar: true,
            accept_commands: true,
            messages: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
            effects: Mutex::new(Vec::new()),
        }
    }

    /// Place the player in another world.
    pub fn with_world(mut self, world: impl Into<String>) -> Self {
        self.world = world.into();
        self
    }

    /// Use a fixed id.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Grant one permission. Once any is granted, all others are denied.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions
            .get_or_insert_with(HashSet::new)
            .insert(permission.into());
        self
    }

    /// Deny every permission.
    pub fn without_permissions(mut self) -> Self {
        self.permissions = Some(HashSet::new());
        self
    }

    /// Restrict known sounds (case-insensitive).
    pub fn with_sounds<I, S>(mut self, sounds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sounds = Some(upper_set(sounds));
        self
    }

    /// Restrict known particles (case-insensitive).
    pub fn with_particles<I, S>(mut self, particles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.particles = Some(upper_set(particles));
        self
    }

    /// Report action bars as unsupported.
    pub fn without_action_bar(mut self) -> Self {
        self.action_bar = false;
        self
    }

    /// Make `run_command` report rejection.
    pub fn rejecting_commands(mut self) -> Self {
        self.accept_commands = false;
        self
    }

    /// Chat messages received, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Commands run as this player, oldest first.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }

    /// Presentation effects received, oldest first.
    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().clone()
    }

    fn knows(set: &Option<HashSet<String>>, id: &str) -> bool {
        set.as_ref()
            .is_none_or(|known| known.contains(&id.to_ascii_uppercase()))
    }
}

impl Actor for MemoryActor {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn unique_id(&self) -> Uuid {
        self.id
    }

    fn world_name(&self) -> String {
        self.world.clone()
    }

    fn run_command(&self, command: &str) -> bool {
        self.commands.lock().push(command.to_string());
        self.accept_commands
    }

    fn send_message(&self, text: &str) {
        self.messages.lock().push(text.to_string());
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_none_or(|granted| granted.contains(permission))
    }

    fn send_title(&self, title: &str, subtitle: &str, timings: TitleTimings) {
        self.effects.lock().push(Effect::Title {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            timings,
        });
    }

    fn send_action_bar(&self, text: &str) -> Result<(), CapabilityError> {
        if !self.action_bar {
            return Err(CapabilityError::Unsupported("action bar"));
        }
        self.effects.lock().push(Effect::ActionBar(text.to_string()));
        Ok(())
    }

    fn play_sound(&self, sound: &str, volume: f32, pitch: f32) -> Result<(), CapabilityError> {
        if !Self::knows(&self.sounds, sound) {
            return Err(CapabilityError::UnknownSound(sound.to_string()));
        }
        self.effects.lock().push(Effect::Sound {
            id: sound.to_string(),
            volume,
            pitch,
        });
        Ok(())
    }

    fn spawn_particle(
        &self,
        particle: &str,
        count: i32,
        offset: ParticleOffset,
    ) -> Result<(), CapabilityError> {
        if !Self::knows(&self.particles, particle) {
            return Err(CapabilityError::UnknownParticle(particle.to_string()));
        }
        self.effects.lock().push(Effect::Particle {
            id: particle.to_string(),
            count,
            offset,
        });
        Ok(())
    }

    fn spawn_firework(&self, colors: FireworkColors) -> Result<(), CapabilityError> {
        self.effects.lock().push(Effect::Firework(colors));
        Ok(())
    }

    fn heal(&self, amount: f64) {
        self.effects.lock().push(Effect::Heal(amount));
    }

    fn feed(&self, amount: i32) {
        self.effects.lock().push(Effect::Feed(amount));
    }
}

/// A server with online players, a console, a GUI layer and a script store.
#[derive(Default)]
pub struct MemoryServer {
    actors: RwLock<HashMap<String, Arc<MemoryActor>>>,
    scripts: MemoryScriptSource,
    console: Mutex<Vec<String>>,
    opened: Mutex<Vec<(String, String)>>,
    closed: Mutex<Vec<String>>,
}

impl MemoryServer {
    /// Create an empty server.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A [`Host`] backed entirely by this server.
    pub fn host(self: &Arc<Self>) -> Host {
        Host::new(self.clone(), self.clone(), self.clone(), self.clone())
    }

    /// Bring a player online.
    pub fn add_actor(&self, actor: Arc<MemoryActor>) {
        self.actors.write().insert(actor.name.clone(), actor);
    }

    /// Store a script for `include`.
    pub fn add_script(&self, name: impl Into<String>, source: impl Into<String>) {
        self.scripts.insert(name, source);
    }

    /// Console commands dispatched, oldest first.
    pub fn console_commands(&self) -> Vec<String> {
        self.console.lock().clone()
    }

    /// `(player, gui)` pairs opened, oldest first.
    pub fn opened(&self) -> Vec<(String, String)> {
        self.opened.lock().clone()
    }

    /// Players whose GUI was closed, oldest first.
    pub fn closed(&self) -> Vec<String> {
        self.closed.lock().clone()
    }
}

impl ActorDirectory for MemoryServer {
    fn find_actor(&self, name: &str) -> Option<Arc<dyn Actor>> {
        self.actors
            .read()
            .get(name)
            .map(|actor| actor.clone() as Arc<dyn Actor>)
    }
}

impl ConsoleExecutor for MemoryServer {
    fn dispatch_console(&self, command: &str) -> bool {
        self.console.lock().push(command.to_string());
        true
    }
}

impl GuiService for MemoryServer {
    fn open_gui(&self, actor: &dyn Actor, gui_id: &str) -> bool {
        self.opened.lock().push((actor.name(), gui_id.to_string()));
        true
    }

    fn close_gui(&self, actor: &dyn Actor) -> bool {
        self.closed.lock().push(actor.name());
        true
    }
}

impl ScriptSource for MemoryServer {
    fn load_script(&self, name: &str) -> Option<String> {
        self.scripts.load_script(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_default_to_granted() {
        let actor = MemoryActor::new("Steve");
        assert!(actor.has_permission("anything"));

        let actor = MemoryActor::new("Steve").with_permission("gui.vip");
        assert!(actor.has_permission("gui.vip"));
        assert!(!actor.has_permission("gui.admin"));

        assert!(!MemoryActor::new("Steve").without_permissions().has_permission("x"));
    }

    #[test]
    fn test_known_sounds_case_insensitive() {
        let actor = MemoryActor::new("Steve").with_sounds(["level_up"]);
        assert!(actor.play_sound("LEVEL_UP", 1.0, 1.0).is_ok());
        assert!(actor.play_sound("Level_Up", 1.0, 1.0).is_ok());
        assert!(actor.play_sound("BOOM", 1.0, 1.0).is_err());
    }

    #[test]
    fn test_server_finds_online_actors() {
        let server = MemoryServer::new();
        server.add_actor(Arc::new(MemoryActor::new("Alex")));
        assert_eq!(server.find_actor("Alex").map(|a| a.name()), Some("Alex".to_string()));
        assert!(server.find_actor("Notch").is_none());
    }
}
