//! CLI tool for running action scripts against a terminal-backed player.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use guiscript::host::{
    Actor, ActorDirectory, ConsoleExecutor, DirectoryScriptSource, FireworkColors, GuiService,
    Host, ParticleOffset, TitleTimings,
};
use guiscript::{CapabilityError, ScriptConfig, ScriptEngine, ScriptResult, Value};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "guiscript")]
#[command(author, version, about = "Run a GUI action script from the terminal", long_about = None)]
struct Args {
    /// Script file to run
    file: PathBuf,

    /// Name of the player the script runs as
    #[arg(short, long, default_value = "Player")]
    player: String,

    /// Initial variable, as name=value (repeatable)
    #[arg(long = "var", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// YAML configuration file with a `script:` section
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the command ceiling (0 = unlimited)
    #[arg(long)]
    max_commands: Option<u32>,

    /// Override the timeout in milliseconds (0 = none)
    #[arg(long)]
    timeout: Option<i64>,

    /// Directory holding scripts for `include` (default: the script's directory)
    #[arg(long)]
    scripts: Option<PathBuf>,

    /// Refuse `console:` commands
    #[arg(long)]
    no_console: bool,

    /// Log every executed line
    #[arg(short, long)]
    verbose: bool,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got '{raw}'")),
    }
}

/// The player at the terminal. Everything it receives is printed.
struct TerminalActor {
    name: String,
    id: Uuid,
}

impl Actor for TerminalActor {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn unique_id(&self) -> Uuid {
        self.id
    }

    fn world_name(&self) -> String {
        "world".to_string()
    }

    fn run_command(&self, command: &str) -> bool {
        println!("[{} runs] /{}", self.name, command);
        true
    }

    fn send_message(&self, text: &str) {
        println!("[to {}] {}", self.name, text);
    }

    fn has_permission(&self, _permission: &str) -> bool {
        true
    }

    fn send_title(&self, title: &str, subtitle: &str, timings: TitleTimings) {
        println!(
            "[title] {title} | {subtitle} ({}/{}/{})",
            timings.fade_in, timings.stay, timings.fade_out
        );
    }

    fn send_action_bar(&self, text: &str) -> Result<(), CapabilityError> {
        println!("[action bar] {text}");
        Ok(())
    }

    fn play_sound(&self, sound: &str, volume: f32, pitch: f32) -> Result<(), CapabilityError> {
        println!("[sound] {sound} volume={volume} pitch={pitch}");
        Ok(())
    }

    fn spawn_particle(
        &self,
        particle: &str,
        count: i32,
        offset: ParticleOffset,
    ) -> Result<(), CapabilityError> {
        println!(
            "[particle] {particle} x{count} spread=({}, {}, {})",
            offset.x, offset.y, offset.z
        );
        Ok(())
    }

    fn spawn_firework(&self, colors: FireworkColors) -> Result<(), CapabilityError> {
        let (p, s) = (colors.primary, colors.secondary);
        println!(
            "[firework] #{:02x}{:02x}{:02x} -> #{:02x}{:02x}{:02x}",
            p.r, p.g, p.b, s.r, s.g, s.b
        );
        Ok(())
    }

    fn heal(&self, amount: f64) {
        println!("[heal] {amount}");
    }

    fn feed(&self, amount: i32) {
        println!("[feed] {amount}");
    }
}

/// A one-player server: the console and GUI layer just print.
struct Terminal {
    player: Arc<TerminalActor>,
}

impl ActorDirectory for Terminal {
    fn find_actor(&self, name: &str) -> Option<Arc<dyn Actor>> {
        (name == self.player.name).then(|| self.player.clone() as Arc<dyn Actor>)
    }
}

impl ConsoleExecutor for Terminal {
    fn dispatch_console(&self, command: &str) -> bool {
        println!("[console] {command}");
        true
    }
}

impl GuiService for Terminal {
    fn open_gui(&self, actor: &dyn Actor, gui_id: &str) -> bool {
        println!("[gui] open {gui_id} for {}", actor.name());
        true
    }

    fn close_gui(&self, actor: &dyn Actor) -> bool {
        println!("[gui] close for {}", actor.name());
        true
    }
}

fn load_config(args: &Args) -> Result<ScriptConfig> {
    let mut config = match &args.config {
        Some(path) => ScriptConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScriptConfig::default(),
    };
    if let Some(limit) = args.max_commands {
        config.max_commands = limit;
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if args.no_console {
        config.allow_console_commands = false;
    }
    Ok(config)
}

fn run(args: Args) -> Result<ScriptResult> {
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading script {}", args.file.display()))?;
    let config = load_config(&args)?;

    let scripts_dir = args.scripts.clone().unwrap_or_else(|| {
        args.file
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let player = Arc::new(TerminalActor {
        name: args.player.clone(),
        id: Uuid::new_v4(),
    });
    let terminal = Arc::new(Terminal {
        player: player.clone(),
    });
    let host = Host::new(
        terminal.clone(),
        terminal.clone(),
        terminal,
        Arc::new(DirectoryScriptSource::new(scripts_dir)),
    );

    let engine = ScriptEngine::builder(host).config(config).build();
    let variables: HashMap<String, Value> = args
        .vars
        .into_iter()
        .map(|(name, value)| (name, Value::from(value)))
        .collect();

    Ok(engine.execute(&source, player, variables))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "guiscript=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(ScriptResult::Success(value)) => {
            println!("=> {}", value.as_string());
            ExitCode::SUCCESS
        }
        Ok(ScriptResult::Failure(err)) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
