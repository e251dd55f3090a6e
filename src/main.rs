//! Terrain car main entry point.
//!
//! Drive a two-wheeled car down a ramp and across the course to the finish
//! wall, built on:
//! - **rapier2d** for the rigid body simulation
//! - **bevy_ecs** for entity-component-system architecture
//! - **raylib** for windowing and drawing (feature `render`)
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing) and build the kernel
//! 2. Spawn the built-in scene plus an optional `--scene` JSON file
//! 3. Create the physics bodies and mount the wheels; abort on failure
//! 4. Run frames until quit: input, physics step, sync, update, render
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features render
//! cargo run --release -- --headless --frames 600
//! ```

// Do not create console on Windows
#![cfg_attr(
    all(target_os = "windows", feature = "render"),
    windows_subsystem = "windows"
)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

use terraincar::game;
use terraincar::kernel::Kernel;
use terraincar::resources::gameconfig::GameConfig;
use terraincar::resources::physicsworld::PhysicsWorld;
use terraincar::resources::racestate::RaceState;
use terraincar::scene::SceneDescription;

/// Car on terrain
#[derive(Parser)]
#[command(version, about = "Drive a motorized car across a physics-simulated course.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON scene file whose entities are added to the course.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Frames to simulate without a window.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Run without opening a window.
    #[arg(long)]
    headless: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }

    let mut kernel = Kernel::new(config.physics);
    let rig = game::install(&mut kernel, &config);

    if let Some(path) = &cli.scene {
        match SceneDescription::load_file(path) {
            Ok(scene) => {
                scene.spawn(kernel.world_mut());
            }
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    #[cfg(feature = "render")]
    if !cli.headless {
        return match window::run(kernel, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    #[cfg(not(feature = "render"))]
    if !cli.headless {
        info!("Built without the `render` feature, running headless");
    }

    if let Err(e) = kernel.initialize() {
        error!("Initialization failed: {}", e);
        return ExitCode::FAILURE;
    }

    let dt = config.physics.time_step;
    let mut frames = 0;
    while kernel.is_running() && frames < cli.frames {
        kernel.run_frame(dt);
        frames += 1;
        if frames % 60 == 0 {
            if let Some((pos, angle)) = kernel
                .world()
                .resource::<PhysicsWorld>()
                .entity_pose(rig.chassis)
            {
                info!(
                    "t={:.1}s car at ({:.2}, {:.2}) angle {:.2}",
                    frames as f32 * dt,
                    pos.x,
                    pos.y,
                    angle
                );
            }
        }
    }

    let race = *kernel.world().resource::<RaceState>();
    match race.finish_time {
        Some(t) => info!("Finished in {:.2}s", t),
        None => info!("Stopped after {} frames", frames),
    }
    ExitCode::SUCCESS
}

#[cfg(feature = "render")]
mod window {
    use log::info;
    use raylib::prelude::*;

    use terraincar::error::KernelError;
    use terraincar::kernel::{FrameSet, Kernel};
    use terraincar::resources::camera2d::Camera2DRes;
    use terraincar::resources::gameconfig::GameConfig;
    use terraincar::resources::input::InputState;
    use terraincar::resources::screensize::ScreenSize;
    use terraincar::systems::input::update_input_state;
    use terraincar::systems::render::render_system;

    pub fn run(mut kernel: Kernel, config: &GameConfig) -> Result<(), KernelError> {
        let (mut rl, thread) = raylib::init()
            .size(config.window_width as i32, config.window_height as i32)
            .resizable()
            .title("Terrain Car")
            .build();
        rl.set_target_fps(config.target_fps);
        // ESC goes through the input events like every other key.
        rl.set_exit_key(None);
        if config.fullscreen {
            rl.toggle_fullscreen();
        }

        let world = kernel.world_mut();
        world.insert_resource(ScreenSize {
            w: rl.get_screen_width(),
            h: rl.get_screen_height(),
        });
        world.insert_resource(Camera2DRes(Camera2D {
            offset: Vector2::zero(),
            target: Vector2::zero(),
            rotation: 0.0,
            zoom: 1.0,
        }));
        world.insert_resource(InputState::default());
        world.insert_non_send_resource(rl);
        world.insert_non_send_resource(thread);

        kernel.add_systems(FrameSet::Input, update_input_state);
        kernel.add_systems(FrameSet::Render, render_system);
        kernel.initialize()?;

        while kernel.is_running() {
            let (should_close, dt) = {
                let rl = kernel.world().non_send_resource::<RaylibHandle>();
                (rl.window_should_close(), rl.get_frame_time())
            };
            if should_close {
                kernel.stop();
                break;
            }
            kernel.run_frame(dt);
        }
        info!("Window closed");
        Ok(())
    }
}
