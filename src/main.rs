//! River Run entry point
//!
//! The browser build is driven from JavaScript through `platform::web::WebGame`.
//! Natively this runs headless games with a simple dodging autopilot and
//! prints the leaderboard, which is handy for balancing tuning files.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use river_run::persistence::FileStorage;
    use river_run::platform::ManualClock;
    use river_run::scene::LogScene;
    use river_run::sim::{EntityKind, Key};
    use river_run::{GameResult, GameSession, SessionPhase, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "river-run", about = "Headless River Run simulator")]
    pub struct Args {
        /// Longest simulated time per run, in seconds
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,

        /// Number of runs to play
        #[arg(long, default_value_t = 1)]
        runs: u32,

        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// JSON file overriding tuning values
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Directory for leaderboard, unlocks and settings
        #[arg(long, default_value = "river-run-data")]
        data_dir: PathBuf,

        /// Name recorded on the leaderboard
        #[arg(long)]
        name: Option<String>,

        /// Clear the leaderboard before playing
        #[arg(long)]
        reset_leaderboard: bool,

        /// Simulated frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
    }

    type Session = GameSession<LogScene, FileStorage>;

    /// How far ahead (upstream) the autopilot looks for trouble
    const LOOKAHEAD: f32 = 25.0;
    /// Lateral clearance the autopilot keeps from obstacles
    const CLEARANCE: f32 = 3.5;

    /// Pick a lateral direction: dodge the nearest threat, else chase a collectible
    fn steer(session: &Session) -> Option<Key> {
        let player = session.player().pos;
        let bound = session.tuning().bound_x;

        let threat = session
            .registry()
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Obstacle(_)))
            .filter(|e| e.pos.y < player.y + 1.0 && player.y - e.pos.y < LOOKAHEAD)
            .filter(|e| (e.pos.x - player.x).abs() < CLEARANCE)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        if let Some(threat) = threat {
            let go_left = if player.x > bound - CLEARANCE {
                true
            } else if player.x < -bound + CLEARANCE {
                false
            } else {
                threat.pos.x >= player.x
            };
            return Some(if go_left { Key::Left } else { Key::Right });
        }

        let target = session
            .registry()
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Collectible(_)))
            .filter(|e| e.pos.y < player.y && player.y - e.pos.y < LOOKAHEAD)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

        let dx = target.pos.x - player.x;
        if dx.abs() < 0.5 {
            None
        } else if dx < 0.0 {
            Some(Key::Left)
        } else {
            Some(Key::Right)
        }
    }

    fn key_code(key: Key) -> &'static str {
        match key {
            Key::Up => "ArrowUp",
            Key::Down => "ArrowDown",
            Key::Left => "ArrowLeft",
            Key::Right => "ArrowRight",
        }
    }

    fn play_one(session: &mut Session, clock: &ManualClock, args: &Args) -> GameResult<()> {
        session.start()?;
        if let Some(name) = &args.name {
            session.set_player_name(name);
        }

        let dt = 1.0 / args.fps.max(1) as f64;
        let mut held: Option<Key> = None;

        while session.phase() == SessionPhase::Running && session.run().elapsed < args.seconds {
            let wanted = steer(session);
            if wanted != held {
                if let Some(key) = held {
                    session.key_up(key_code(key));
                }
                if let Some(key) = wanted {
                    session.key_down(key_code(key));
                }
                held = wanted;
            }

            clock.advance(dt);
            session.frame();

            for event in session.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        match session.phase() {
            SessionPhase::GameOver => {
                if let Some(record) = session.last_record() {
                    println!(
                        "Run over: {} scored {} (level {}, {}s)",
                        record.name, record.score, record.level, record.time
                    );
                }
                session.acknowledge();
            }
            _ => {
                let run = session.run();
                println!(
                    "Survived {:.0}s with {} lives left, score {} (not recorded)",
                    run.elapsed, run.lives, run.score
                );
                session.quit_to_menu();
            }
        }
        Ok(())
    }

    pub fn run() -> GameResult<()> {
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(river_run::persistence::StorageError::from)?;
                Tuning::from_json(&json)?
            }
            None => Tuning::default(),
        };
        let top = tuning.leaderboard_top;

        let seed = args.seed.unwrap_or_else(rand::random);
        log::info!("River Run (headless) seed={}", seed);

        let clock = ManualClock::new();
        let mut session = GameSession::new(
            LogScene::new(u64::from(args.fps.max(1)) * 5),
            FileStorage::new(&args.data_dir),
            Box::new(clock.clone()),
            tuning,
            seed,
        );

        if args.reset_leaderboard {
            session.reset_leaderboard()?;
            log::info!("Leaderboard cleared");
        }

        for _ in 0..args.runs {
            play_one(&mut session, &clock, &args)?;
        }

        println!("\nTop {}:", top);
        for (rank, record) in session.top_records().iter().enumerate() {
            println!(
                "{:>2}. {:<16} {:>6}  level {:>2}  {:>4}s",
                rank + 1,
                record.name,
                record.score,
                record.level,
                record.time
            );
        }

        let unlocks = session.unlocks();
        println!("Kayak: {}  Speedboat: {}", unlocks.kayak, unlocks.speedboat);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web, this is just to satisfy the compiler
}
