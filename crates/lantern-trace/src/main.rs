use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use clap::Parser;
use lantern_gl::context::{Gl, RecordingApi};
use lantern_gl::logging::{init_logging, LoggingConfig};
use lantern_gl::{Renderer, RendererConfig};

mod scene;

use scene::{ColorCycle, QuadScene};

/// Replays the textured-quad scene against the recording backend and prints
/// every graphics call it issues.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Combined `#shader vertex` / `#shader fragment` file. Defaults to the built-in shader.
    #[arg(long)]
    shader: Option<PathBuf>,

    /// Image to texture the quad with. Defaults to a generated checkerboard.
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Number of frames to record.
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Uniform names the recorded program exposes. Anything else resolves to "not found".
    #[arg(long = "uniform", default_values = ["u_MVP", "u_Color", "u_Texture"])]
    uniforms: Vec<String>,

    /// Log filter, `env_logger` syntax. Falls back to `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..Default::default()
    });

    let api = Rc::new(RecordingApi::new().with_uniforms(args.uniforms.iter().cloned()));
    let gl = Gl::from_shared(api.clone());

    let renderer = Renderer::new(&gl, RendererConfig::default());
    let mut scene = QuadScene::build(&gl, args.shader.as_deref(), args.texture.as_deref())?;
    let mut colors = ColorCycle::default();

    for frame in 0..args.frames {
        let color = colors.next_color();
        log::info!("frame {frame}: u_Color = {color}");
        renderer.clear();
        scene.frame(&renderer, color);
    }

    for (i, call) in api.calls().iter().enumerate() {
        println!("{i:5}  {call:?}");
    }
    println!();
    println!(
        "{} calls, {} draws, {} live objects",
        api.calls().len(),
        api.draw_calls().len(),
        api.live_objects()
    );
    log::info!("recorded {} frames", args.frames);
    Ok(())
}
