//! Goldberg Machine entry point
//!
//! Runs the machine headless: builds the scene, drives the fixed-step frame
//! loop from a seeded scripted pointer and reports what happened.

use std::path::PathBuf;
use std::process::ExitCode;

use goldberg_machine::SceneError;
use goldberg_machine::consts::FPS;
use goldberg_machine::platform::ScriptedPointer;
use goldberg_machine::settings::SceneConfig;
use goldberg_machine::sim::{FrameControl, FrameInput, Simulation, load_holes};

const DEFAULT_HOLES: &str = "assets/holes.json";

const USAGE: &str = "usage: goldberg-machine [HOLES_JSON] [--scene FILE] [--frames N] \
                     [--seed S] [--spawn-every K] [--snapshot]";

/// Command line options
#[derive(Debug)]
struct Options {
    holes: PathBuf,
    scene: Option<PathBuf>,
    frames: u64,
    seed: u64,
    spawn_every: u64,
    snapshot: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            holes: PathBuf::from(DEFAULT_HOLES),
            scene: None,
            frames: 10 * FPS as u64,
            seed: 0,
            spawn_every: FPS as u64 / 2,
            snapshot: false,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut holes_given = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scene" => options.scene = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--frames" => options.frames = number(&mut args, &arg)?,
            "--seed" => options.seed = number(&mut args, &arg)?,
            "--spawn-every" => options.spawn_every = number(&mut args, &arg)?,
            "--snapshot" => options.snapshot = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            path if !holes_given => {
                options.holes = PathBuf::from(path);
                holes_given = true;
            }
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }
    Ok(options)
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn number(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<u64, String> {
    let raw = value(args, flag)?;
    raw.parse()
        .map_err(|_| format!("{flag} expects a non-negative integer, got '{raw}'"))
}

fn run(options: &Options) -> Result<(), SceneError> {
    let holes = load_holes(&options.holes)?;
    let config = match &options.scene {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    let mut sim = Simulation::new(config, &holes)?;
    let mut pointer = ScriptedPointer::new(options.seed, options.spawn_every, options.frames);
    log::info!(
        "Running {} frames (seed {}, spawn every {} frames)",
        options.frames,
        options.seed,
        options.spawn_every
    );

    loop {
        let input = FrameInput::new(pointer.poll());
        if sim.tick(&input)? == FrameControl::Quit {
            break;
        }
    }

    let world = sim.world();
    log::info!(
        "Finished after {} frames: {} dynamic bodies, {} colliders, {} spawns pending",
        sim.frames(),
        world.dynamic_body_count(),
        world.collider_count(),
        sim.pending_spawns()
    );

    if options.snapshot {
        let json = sim.snapshot().to_json().map_err(|e| SceneError::Io {
            path: PathBuf::from("<stdout>"),
            source: e.into(),
        })?;
        println!("{json}");
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Goldberg Machine (headless) starting...");

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() -> ExitCode {
    // The headless runner has nothing to drive in a browser
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_defaults() {
        let options = parse_args(args(&[])).unwrap();
        assert_eq!(options.holes, PathBuf::from(DEFAULT_HOLES));
        assert!(options.scene.is_none());
        assert!(!options.snapshot);
    }

    #[test]
    fn test_all_options() {
        let options = parse_args(args(&[
            "my_holes.json",
            "--scene",
            "scene.json",
            "--frames",
            "12",
            "--seed",
            "9",
            "--spawn-every",
            "3",
            "--snapshot",
        ]))
        .unwrap();
        assert_eq!(options.holes, PathBuf::from("my_holes.json"));
        assert_eq!(options.scene, Some(PathBuf::from("scene.json")));
        assert_eq!(options.frames, 12);
        assert_eq!(options.seed, 9);
        assert_eq!(options.spawn_every, 3);
        assert!(options.snapshot);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(args(&["--frames"])).is_err());
        assert!(parse_args(args(&["--frames", "-1"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["a.json", "b.json"])).is_err());
    }

    #[test]
    fn test_missing_holes_file_is_startup_error() {
        let options = Options {
            holes: PathBuf::from("/definitely/not/here/holes.json"),
            ..Options::default()
        };
        let err = run(&options).unwrap_err();
        assert!(matches!(err, SceneError::ConfigNotFound { .. }));
        assert!(err.is_startup_error());
    }

    #[test]
    fn test_short_run() {
        let options = Options {
            holes: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/holes.json")),
            frames: 20,
            spawn_every: 5,
            ..Options::default()
        };
        run(&options).unwrap();
    }
}
