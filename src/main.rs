//! NetraRig - Camera render coordination daemon for simulated vehicles
//!
//! A fixed-step tick thread drives the render coordinator, simulated
//! cameras push frame records back to the main loop, and the ego
//! vehicle answers SIGHUP with a respawn at its captured spawn pose.

use netra_rig::app::RigApp;
use netra_rig::config::AppConfig;
use netra_rig::error::Result;

struct Args {
    config_path: Option<String>,
    mode: Option<i64>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args {
        config_path: None,
        mode: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    result.config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--mode" | "-m" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse::<i64>() {
                        Ok(mode) => result.mode = Some(mode),
                        Err(_) => {
                            eprintln!("Ignoring non-integer mode: {}", args[i + 1]);
                        }
                    }
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            // Unrecognized flags are skipped so the daemon can share a
            // command line with a host launcher.
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    result
}

fn print_help() {
    println!("netra-rig - Camera render coordination daemon for simulated vehicles");
    println!();
    println!("USAGE:");
    println!("    netra-rig [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Configuration file (default: netra-rig.toml)");
    println!("    -m, --mode <N>          Dispatch mode preset 0-7, overrides [rig] settings");
    println!("    -h, --help              Print help information");
    println!();
    println!("MODES:");
    println!("    0  sequential, blocking renders, frame-end waits");
    println!("    1  sequential, batched renders, frame-end waits");
    println!("    2  sequential, blocking renders, fixed-step waits");
    println!("    3  sequential, batched renders, fixed-step waits");
    println!("    4  sequential, deferred renders, fixed-step waits");
    println!("    5  concurrent, fire-and-forget renders");
    println!("    6  concurrent, batched fire-and-forget renders");
    println!("    7  same as mode 0");
    println!();
    println!("SIGNALS:");
    println!("    SIGINT, SIGTERM         Graceful shutdown");
    println!("    SIGHUP                  Respawn the ego vehicle at its spawn pose");
}

fn load_config(args: &Args) -> AppConfig {
    match &args.config_path {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Failed to load config {}: {}", path, e);
                AppConfig::sim_defaults()
            }
        },
        None => {
            // Try default paths
            for path in &["netra-rig.toml", "/etc/netra-rig.toml"] {
                if let Ok(config) = AppConfig::from_file(path) {
                    log::info!("Loaded config from {}", path);
                    return config;
                }
            }
            log::info!("No config file found, using simulation defaults");
            AppConfig::sim_defaults()
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("NetraRig v0.1.0 starting...");

    let args = parse_args();
    let mut config = load_config(&args);
    if let Some(mode) = args.mode {
        config.rig.apply_mode(mode);
    }
    config.validate()?;

    let mut app = RigApp::new(config)?;
    app.run()?;

    log::info!("NetraRig stopped");
    Ok(())
}
