//! Terminal sandbox: walk a hero around a level and watch the resolver.

mod ui;

use std::collections::VecDeque;
use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::{info, warn};

use ledgewalk::config::Config;
use ledgewalk::sim::event::MoveEvent;
use ledgewalk::sim::level::{builtin_level, load_level_file, Level};
use ledgewalk::sim::step;
use ledgewalk::sim::world::World;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(2);
const RECENT_EVENTS: usize = 3;
const LOG_FILE: &str = "ledgewalk.log";

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let config = Config::load();
    let level = load_configured_level(&config)?;
    let mut world = World::from_level(level, &config)?;
    info!("loaded level {:?}", world.level.name);

    let mut renderer = Renderer::new();
    renderer.init().context("terminal init")?;
    let result = run(&mut world, &mut renderer, &config);
    let cleanup = renderer.cleanup().context("terminal cleanup");

    result?;
    cleanup?;
    println!("Damage taken: {}", world.hero.damage_taken);
    Ok(())
}

/// Logs go to a file: the terminal belongs to the renderer.
fn init_logging() -> anyhow::Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("creating {LOG_FILE}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_configured_level(config: &Config) -> anyhow::Result<Level> {
    match &config.sandbox.level {
        Some(path) => load_level_file(path),
        None => builtin_level(),
    }
}

fn run(world: &mut World, renderer: &mut Renderer, config: &Config) -> anyhow::Result<()> {
    let mut input = InputState::new();
    let mut recent: VecDeque<String> = VecDeque::with_capacity(RECENT_EVENTS);
    let frame = Duration::from_millis(u64::from(world.motion.frame_ms));
    let mut last_tick = Instant::now();

    loop {
        input.drain_events();
        for command in input.commands() {
            match command {
                Command::Quit => return Ok(()),
                Command::Restart => {
                    restart(world, config);
                    recent.clear();
                }
            }
        }

        if last_tick.elapsed() >= frame {
            last_tick = Instant::now();
            for event in step::step(world, input.frame_input()) {
                if recent.len() == RECENT_EVENTS {
                    recent.pop_front();
                }
                recent.push_back(describe(&event));
            }
            let lines: Vec<String> = recent.iter().cloned().collect();
            renderer.render(world, &lines)?;
        }

        std::thread::sleep(FRAME_SLEEP);
    }
}

/// Reload the level from disk when one is configured, otherwise reset.
fn restart(world: &mut World, config: &Config) {
    if config.sandbox.level.is_some() {
        match load_configured_level(config).and_then(|level| World::from_level(level, config)) {
            Ok(fresh) => {
                *world = fresh;
                return;
            }
            Err(e) => warn!("reload failed, restarting current level: {e:#}"),
        }
    }
    world.restart();
}

fn describe(event: &MoveEvent) -> String {
    match event {
        MoveEvent::Bumped { direction } => format!("bumped {direction:?}"),
        MoveEvent::Wiggled { direction } => format!("wiggled {direction:?}"),
        MoveEvent::PushStarted { direction } => format!("pushing {direction:?}"),
        MoveEvent::BlockSlid { id, direction } => format!("block {} slid {direction:?}", id.0),
        MoveEvent::JumpStarted { direction } => format!("jump {direction:?}"),
        MoveEvent::JumpAborted => "jump aborted: nowhere to land".to_string(),
        MoveEvent::Landed { x, y } => format!("landed at ({x:.0}, {y:.0})"),
        MoveEvent::Damaged { amount } => format!("ouch: {amount} damage"),
        MoveEvent::ResolverFault { reason } => format!("fault: {reason}"),
    }
}
