use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glcourse_camera::{Camera, CameraMovement};
use glcourse_common::AppConfig;
use glcourse_input::Action;
use glcourse_render::{HeadlessGl, ShaderProgram};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glcourse-cli", about = "Offline tools for the glcourse renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "glcourse.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Compile and link a shader pair without a display
    CheckShaders {
        /// Vertex shader source
        vertex: PathBuf,
        /// Fragment shader source
        fragment: PathBuf,
    },
    /// Replay scripted input on a camera and print where it ends up
    Camera {
        /// Number of mouse-look steps to the right
        #[arg(long, default_value = "9")]
        yaw_steps: u32,
        /// Cursor pixels per look step
        #[arg(long, default_value = "100")]
        step_pixels: f32,
        /// Seconds of forward movement after looking
        #[arg(long, default_value = "1.0")]
        forward: f32,
        /// Scroll-wheel ticks applied at the end
        #[arg(long, default_value = "0")]
        zoom: f32,
        /// Simulated frame time in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("glcourse-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", glcourse_common::crate_info());
            println!("camera: {}", glcourse_camera::crate_info());
            println!("input: {}", glcourse_input::crate_info());
            println!("render: {}", glcourse_render::crate_info());
        }
        Commands::CheckShaders { vertex, fragment } => {
            let uniforms = check_shaders(&vertex, &fragment)?;
            println!("OK: {} + {}", vertex.display(), fragment.display());
            if uniforms.is_empty() {
                println!("no active uniforms");
            }
            for (ty, name) in uniforms {
                println!("  uniform {ty} {name}");
            }
        }
        Commands::Camera {
            yaw_steps,
            step_pixels,
            forward,
            zoom,
            dt,
        } => {
            let config = AppConfig::load_or_default(&cli.config)
                .with_context(|| format!("loading {}", cli.config.display()))?;
            let mut camera = Camera::from_config(&config.camera)?;
            let script = Script {
                yaw_steps,
                step_pixels,
                forward_seconds: forward,
                zoom,
                dt,
            };
            let frames = script.replay(&mut camera);

            let (p, f) = (camera.position, camera.front());
            println!("frames: {frames}");
            println!("yaw: {:.2} pitch: {:.2}", camera.yaw(), camera.pitch());
            println!("position: ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
            println!("front: ({:.3}, {:.3}, {:.3})", f.x, f.y, f.z);
            println!("zoom: {:.1}", camera.zoom());
        }
    }

    Ok(())
}

/// Links the pair on a headless context and returns its active uniforms.
fn check_shaders(vertex: &Path, fragment: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let gl = Arc::new(HeadlessGl::new());
    let program = ShaderProgram::from_files(gl.clone(), vertex, fragment)
        .with_context(|| format!("checking {} + {}", vertex.display(), fragment.display()))?;
    Ok(gl.active_uniforms(program.id()))
}

/// Scripted input: look right in steps, walk forward, then scroll.
struct Script {
    yaw_steps: u32,
    step_pixels: f32,
    forward_seconds: f32,
    zoom: f32,
    dt: f32,
}

impl Script {
    fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = (0..self.yaw_steps)
            .map(|_| Action::Look {
                dx: self.step_pixels,
                dy: 0.0,
            })
            .collect();
        if self.dt > 0.0 {
            let frames = (self.forward_seconds / self.dt).round().max(0.0) as usize;
            actions.extend(std::iter::repeat_n(Action::Move(CameraMovement::Forward), frames));
        }
        if self.zoom != 0.0 {
            actions.push(Action::Zoom(self.zoom));
        }
        actions
    }

    /// Applies one action per frame and returns the number of frames.
    fn replay(&self, camera: &mut Camera) -> usize {
        let actions = self.actions();
        for action in &actions {
            action.apply_to_camera(camera, self.dt);
        }
        tracing::debug!("replayed {} actions", actions.len());
        actions.len()
    }
}
