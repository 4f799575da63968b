//! Collaborators supplied by the embedding server.
//!
//! The interpreter never talks to a game server directly. Everything it
//! needs (the acting player, other online players, the console, the GUI
//! layer and the script store) sits behind the traits in this module and
//! is bundled into a [`Host`] handed to the engine.
//!
//! [`memory`] provides in-memory implementations that record every call,
//! used by the test suite and the command-line runner.

pub mod memory;
mod source;

pub use source::{DirectoryScriptSource, MemoryScriptSource};

use std::sync::Arc;

use uuid::Uuid;

use crate::result::CapabilityError;

/// Fade-in, stay and fade-out durations for titles, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTimings {
    /// Ticks spent fading in.
    pub fade_in: i32,
    /// Ticks the title stays fully visible.
    pub stay: i32,
    /// Ticks spent fading out.
    pub fade_out: i32,
}

impl Default for TitleTimings {
    fn default() -> Self {
        Self {
            fade_in: 10,
            stay: 70,
            fade_out: 20,
        }
    }
}

/// Random spread applied to spawned particles on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleOffset {
    /// Spread along x.
    pub x: f64,
    /// Spread along y.
    pub y: f64,
    /// Spread along z.
    pub z: f64,
}

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure red.
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    /// Pure blue.
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    /// Build a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Main and fade colours of a firework burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireworkColors {
    /// Burst colour.
    pub primary: Rgb,
    /// Fade colour.
    pub secondary: Rgb,
}

impl Default for FireworkColors {
    fn default() -> Self {
        Self {
            primary: Rgb::RED,
            secondary: Rgb::BLUE,
        }
    }
}

/// A player a script can run as or act upon.
///
/// Identity, command dispatch, messaging and permission checks are
/// required. Presentation effects have defaults so that hosts without
/// them still work: titles, healing and feeding are ignored, while sounds,
/// particles, fireworks and action bars report
/// [`CapabilityError::Unsupported`].
pub trait Actor: Send + Sync {
    /// Display name, used for `{player}`.
    fn name(&self) -> String;

    /// Stable identifier, used for `{uuid}`.
    fn unique_id(&self) -> Uuid;

    /// Name of the world the player is in, used for `{world}`.
    fn world_name(&self) -> String;

    /// Run a command as this player. Returns whether the server accepted it.
    fn run_command(&self, command: &str) -> bool;

    /// Send a chat message to this player.
    fn send_message(&self, text: &str);

    /// Whether this player holds `permission`.
    fn has_permission(&self, permission: &str) -> bool;

    /// Show a title and subtitle. Either may be empty.
    fn send_title(&self, title: &str, subtitle: &str, timings: TitleTimings) {
        let _ = (title, subtitle, timings);
    }

    /// Show text above the hotbar.
    fn send_action_bar(&self, text: &str) -> Result<(), CapabilityError> {
        let _ = text;
        Err(CapabilityError::Unsupported("action bar"))
    }

    /// Play a sound at the player's location.
    fn play_sound(&self, sound: &str, volume: f32, pitch: f32) -> Result<(), CapabilityError> {
        let _ = (volume, pitch);
        Err(CapabilityError::UnknownSound(sound.to_string()))
    }

    /// Spawn particles around the player.
    fn spawn_particle(
        &self,
        particle: &str,
        count: i32,
        offset: ParticleOffset,
    ) -> Result<(), CapabilityError> {
        let _ = (count, offset);
        Err(CapabilityError::UnknownParticle(particle.to_string()))
    }

    /// Launch a firework at the player's location.
    fn spawn_firework(&self, colors: FireworkColors) -> Result<(), CapabilityError> {
        let _ = colors;
        Err(CapabilityError::Unsupported("firework"))
    }

    /// Restore health, capped by the server at the player's maximum.
    fn heal(&self, amount: f64) {
        let _ = amount;
    }

    /// Restore food level, capped by the server at its maximum.
    fn feed(&self, amount: i32) {
        let _ = amount;
    }
}

/// Lookup of online players by name.
pub trait ActorDirectory: Send + Sync {
    /// Find an online player by exact name.
    fn find_actor(&self, name: &str) -> Option<Arc<dyn Actor>>;
}

/// Dispatches commands with console authority.
pub trait ConsoleExecutor: Send + Sync {
    /// Run `command` from the console. Returns whether it was accepted.
    fn dispatch_console(&self, command: &str) -> bool;
}

/// Opens and closes inventory GUIs.
pub trait GuiService: Send + Sync {
    /// Open the GUI registered as `gui_id` for `actor`.
    fn open_gui(&self, actor: &dyn Actor, gui_id: &str) -> bool;

    /// Close whatever GUI `actor` has open.
    fn close_gui(&self, actor: &dyn Actor) -> bool;
}

/// Loads script text by name for `include` and named execution.
pub trait ScriptSource: Send + Sync {
    /// The text of script `name`, or `None` when it does not exist.
    fn load_script(&self, name: &str) -> Option<String>;
}

/// Bundle of host services shared by every script execution.
#[derive(Clone)]
pub struct Host {
    /// Online player lookup.
    pub actors: Arc<dyn ActorDirectory>,
    /// Console dispatch.
    pub console: Arc<dyn ConsoleExecutor>,
    /// GUI open/close.
    pub gui: Arc<dyn GuiService>,
    /// Script store for `include`.
    pub scripts: Arc<dyn ScriptSource>,
}

impl Host {
    /// Bundle the given services.
    pub fn new(
        actors: Arc<dyn ActorDirectory>,
        console: Arc<dyn ConsoleExecutor>,
        gui: Arc<dyn GuiService>,
        scripts: Arc<dyn ScriptSource>,
    ) -> Self {
        Self {
            actors,
            console,
            gui,
            scripts,
        }
    }

    /// Replace the script store.
    pub fn with_scripts(mut self, scripts: Arc<dyn ScriptSource>) -> Self {
        self.scripts = scripts;
        self
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl Actor for Bare {
        fn name(&self) -> String {
            "Bare".to_string()
        }
        fn unique_id(&self) -> Uuid {
            Uuid::nil()
        }
        fn world_name(&self) -> String {
            "world".to_string()
        }
        fn run_command(&self, _: &str) -> bool {
            true
        }
        fn send_message(&self, _: &str) {}
        fn has_permission(&self, _: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_default_effects_are_unsupported() {
        let actor = Bare;
        assert_eq!(
            actor.play_sound("LEVEL_UP", 1.0, 1.0),
            Err(CapabilityError::UnknownSound("LEVEL_UP".to_string()))
        );
        assert!(actor.send_action_bar("hi").is_err());
        assert!(actor.spawn_firework(FireworkColors::default()).is_err());
    }

    #[test]
    fn test_title_timing_defaults() {
        let timings = TitleTimings::default();
        assert_eq!((timings.fade_in, timings.stay, timings.fade_out), (10, 70, 20));
    }
}
