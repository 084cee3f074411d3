use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridscene_common::{SceneConfig, TickInput};
use gridscene_render::{FrameSink, ProjectionConfig, RecordingSink, batch_draws};
use gridscene_scene::Scene;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridscene-cli", about = "CLI tool for gridscene operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default scene info
    Info,
    /// Print the slot layout and draw batches for a configuration
    Layout {
        /// Scene configuration file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<String>,
    },
    /// Tick a scene headlessly and record the submitted frames
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "10")]
        ticks: u64,
        /// Scene configuration file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<String>,
        /// Camera spin applied on every tick (horizontal mouse units)
        #[arg(long, default_value = "0")]
        spin: f32,
    },
}

fn load_config(path: Option<&str>) -> Result<SceneConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading scene config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing scene config {path}"))
        }
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("gridscene-cli v{}", env!("CARGO_PKG_VERSION"));
            let config = SceneConfig::default();
            println!(
                "default scene: {} entities in {} slots",
                config.total_entities(),
                config.capacity_slots.0
            );
            let scene = Scene::new(&config).context("building default scene")?;
            println!(
                "camera: ({:.1}, {:.1}, {:.1})",
                scene.camera().position.x,
                scene.camera().position.y,
                scene.camera().position.z
            );
        }
        Commands::Layout { config } => {
            let config = load_config(config.as_deref())?;
            let scene = Scene::new(&config).context("building scene")?;
            println!(
                "slots: {} used / {} capacity",
                scene.layout().total_slots(),
                scene.capacity()
            );
            for range in scene.layout().ranges() {
                println!(
                    "  {:?}: slots {}..{} ({} instances)",
                    range.kind,
                    range.base_slot,
                    range.end_slot(),
                    range.count
                );
            }
            println!("draw batches:");
            for draw in batch_draws(scene.layout()) {
                println!(
                    "  {:?}: {} vertices x {} instances, first_instance {}",
                    draw.kind, draw.vertex_count, draw.instance_count, draw.first_instance
                );
            }
        }
        Commands::Run {
            ticks,
            config,
            spin,
        } => {
            let config = load_config(config.as_deref())?;
            let mut scene = Scene::new(&config).context("building scene")?;
            let projection = ProjectionConfig::default();
            let mut sink = RecordingSink::default();

            for _ in 0..ticks {
                let input = TickInput {
                    spin_dx: spin,
                    ..TickInput::default()
                };
                let snapshot = scene.tick(input);
                sink.submit(&snapshot, &projection)
                    .context("recording frame")?;
            }

            println!("ran {ticks} ticks");
            if let Some(frame) = sink.last_frame() {
                println!(
                    "last frame: {} transform floats, {} draw calls",
                    frame.transform_floats,
                    frame.draws.len()
                );
                for draw in &frame.draws {
                    println!(
                        "  {:?}: {} vertices x {} instances, first_instance {}",
                        draw.kind, draw.vertex_count, draw.instance_count, draw.first_instance
                    );
                }
            }
            println!(
                "camera: ({:.2}, {:.2}, {:.2})",
                scene.camera().position.x,
                scene.camera().position.y,
                scene.camera().position.z
            );
        }
    }

    Ok(())
}
