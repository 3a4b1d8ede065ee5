use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::{SeedableRng, rngs::SmallRng};
use shambles::{config::GameConfig, game::Game, scr::Buttons};
use shambles_emu::{PlaceholderAssets, SimBus};
use tracing::{Level, info};
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Key {
    A,
    B,
    Select,
    Start,
    Right,
    Left,
    Up,
    Down,
    R,
    L,
}

impl From<Key> for Buttons {
    fn from(key: Key) -> Self {
        match key {
            Key::A => Buttons::A,
            Key::B => Buttons::B,
            Key::Select => Buttons::SELECT,
            Key::Start => Buttons::START,
            Key::Right => Buttons::RIGHT,
            Key::Left => Buttons::LEFT,
            Key::Up => Buttons::UP,
            Key::Down => Buttons::DOWN,
            Key::R => Buttons::R,
            Key::L => Buttons::L,
        }
    }
}

#[derive(Parser)]
#[command(name = "shambles-headless")]
#[command(version, about = "Run shambles against a simulated console, no display", long_about = None)]
struct Cli {
    /// Frames to run
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Seed for zombie placement
    #[arg(short, long, default_value_t = 0x5EED)]
    seed: u64,

    /// Buttons held for the whole run, comma separated
    #[arg(long, value_enum, value_delimiter = ',')]
    hold: Vec<Key>,

    /// Size of the zombie pool (1-127)
    #[arg(long)]
    max_zombies: Option<usize>,

    /// Reproduce the first cartridge release: one zombie slot, level vblank wait
    #[arg(long)]
    compat: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One more zombie per batch for every 30 seconds survived, one fewer per
/// life already lost.
fn summon(lives_remaining: i32, frames_survived: i32) -> i32 {
    let lost = (3 - lives_remaining).max(0);
    1 + frames_survived / 1800 - lost
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .compact()
        .finish()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = if cli.compat {
        GameConfig::hardware_compat()
    } else {
        GameConfig::default()
    };
    if let Some(max_zombies) = cli.max_zombies {
        config.max_zombies = max_zombies;
    }

    let mut bus = SimBus::new();
    bus.hold(cli.hold.iter().fold(Buttons::empty(), |held, &key| held | Buttons::from(key)));

    let assets = PlaceholderAssets::generate();
    let mut game = Game::boot(bus, config, &assets.as_game_assets(), summon, SmallRng::seed_from_u64(cli.seed))
        .context("failed to boot")?;
    info!("booted, running {} frames", cli.frames);

    let mut collisions = 0;
    let mut summoned = 0;
    for _ in 0..cli.frames {
        let report = game.step().context("frame failed")?;
        collisions += report.collisions;
        summoned += report.summoned;
    }

    let bus = &game.console.hw;
    println!("frames survived   {}", game.session.frames_alive);
    println!("lives remaining   {}", game.session.lives);
    println!("collisions        {}", collisions);
    println!("zombies summoned  {}", summoned);
    println!("zombies on screen {} / {}", game.horde.len(), game.horde.capacity());
    println!("survivor at       ({}, {})", game.survivor.x, game.survivor.y);
    println!("scroll            ({}, {})", game.scroll.x, game.scroll.y);
    println!("vblanks seen      {}", bus.vblanks);
    println!("dma transfers     {} ({} overlapping)", bus.transfers.len(), bus.overlapping_transfers);
    println!("delay ticks       {}", bus.delay_ticks);

    Ok(())
}
