//! Heap Trace Replay CLI - Play an operation log in the terminal.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use rand::Rng;

use heap_trace_replay::{
    playback::{Clock, PlaybackDriver, Presenter, RenderHint, SystemClock},
    replay::{DataState, OperationLog, ReplayEngine, ReplayError},
    schema::PlaybackConfig,
    trace::heap_sort_trace,
};

/// Prints one line per rendered frame.
struct TerminalPresenter {
    labels: Vec<String>,
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, state: &DataState, position: usize, hint: RenderHint) {
        let label = self.labels.get(position).map(String::as_str).unwrap_or("");

        let mut cells = String::new();
        for (i, element) in state.elements().iter().enumerate() {
            if i == state.active_length() {
                cells.push_str(" |");
            }
            if state.is_focused(i) {
                cells.push_str(&format!(" [{}]", element.value));
            } else {
                cells.push_str(&format!(" {}", element.value));
            }
        }
        if state.active_length() == state.len() {
            cells.push_str(" |");
        }

        let marker = match hint {
            RenderHint::Animated(_) => "",
            RenderHint::Instant => " (instant)",
        };
        println!("  {:<32}{}{}", label, cells, marker);
    }

    fn fatal(&mut self, error: &ReplayError) {
        eprintln!("Fatal replay error: {}", error);
    }
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <log.json> [config.json]", args[0]);
        eprintln!("       {} --random <count> [config.json]", args[0]);
        eprintln!("       {} --example", args[0]);
        eprintln!();
        eprintln!("Replay a heap sort operation log in the terminal.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  log.json     Path to a JSON operation log");
        eprintln!("  config.json  Optional playback configuration");
        eprintln!("  --random N   Trace a heap sort of N random values");
        eprintln!("  --example    Print the example operation log");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_log();
        return;
    }

    let (log, config_arg) = if args[1] == "--random" {
        let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
            eprintln!("--random requires a value count");
            std::process::exit(1);
        });
        let mut rng = rand::thread_rng();
        let values: Vec<i64> = (0..count).map(|_| rng.gen_range(0..100)).collect();
        (heap_sort_trace(&values), args.get(3))
    } else {
        let log = OperationLog::from_path(PathBuf::from(&args[1])).unwrap_or_else(|e| {
            eprintln!("Error loading log: {}", e);
            std::process::exit(1);
        });
        (log, args.get(2))
    };

    let config = match config_arg {
        Some(path) => load_config(path),
        None => PlaybackConfig::default(),
    };

    println!("Heap Trace Replay");
    println!("=================");
    println!("Operations: {}", log.len());
    println!("Animation: {}ms", config.animation_duration_ms);
    println!();

    let presenter = TerminalPresenter {
        labels: log.labels(),
    };
    let engine = ReplayEngine::new(log).unwrap_or_else(|e| {
        eprintln!("Error initializing replay: {}", e);
        std::process::exit(1);
    });

    let clock = SystemClock::new();
    let mut driver =
        PlaybackDriver::new(engine, config, clock, presenter).unwrap_or_else(|e| {
            eprintln!("Invalid config: {}", e);
            std::process::exit(1);
        });

    let start = Instant::now();
    if let Err(e) = driver.play() {
        eprintln!("Error starting playback: {}", e);
        std::process::exit(1);
    }

    while driver.is_playing() {
        let wait = driver.next_deadline().saturating_sub(clock.now());
        thread::sleep(wait);
        if let Err(e) = driver.poll() {
            eprintln!("Replay stopped: {}", e);
            std::process::exit(1);
        }
    }

    let state = driver.snapshot();
    println!();
    println!("Final state: {:?}", state.values());
    println!("Position: {}/{}", driver.current_position(), driver.engine().log().last_position());
    println!("Time: {:.2}s", start.elapsed().as_secs_f32());
}

fn load_config(path: &str) -> PlaybackConfig {
    let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    })
}

fn print_example_log() {
    let log = heap_sort_trace(&[1, 3, 4, 0, 2, 5]);

    println!("Example operation log (log.json):");
    println!("{}", serde_json::to_string_pretty(log.as_slice()).unwrap());
    println!();
    println!("Example playback configuration (config.json):");
    println!(
        "{}",
        serde_json::to_string_pretty(&PlaybackConfig::default()).unwrap()
    );
}
