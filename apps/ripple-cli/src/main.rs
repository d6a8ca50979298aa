use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use ripple_render::{DebugTextRenderer, MeshBuilder, RenderView, Renderer, grid_indices_u16};
use ripple_scene::{SceneConfig, WaterScene};
use ripple_tools::{FieldInspector, StepTimer};
use ripple_waves::{WaveField, WaveParams};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ripple-cli", about = "CLI tool for wave simulation runs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Scene overrides shared by the simulation commands.
#[derive(clap::Args)]
struct SceneArgs {
    /// YAML or JSON scene file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// RNG seed for the rain schedule
    #[arg(short, long)]
    seed: Option<u64>,
    /// Grid rows
    #[arg(long)]
    rows: Option<usize>,
    /// Grid columns
    #[arg(long)]
    cols: Option<usize>,
    /// Refuse parameters outside the stable regime
    #[arg(long)]
    strict: bool,
}

impl SceneArgs {
    fn load(&self) -> anyhow::Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.rain.seed = seed;
        }
        if let Some(rows) = self.rows {
            config.waves.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.waves.cols = cols;
        }
        if self.strict {
            config.waves.check_stability()?;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the rain scene for a number of frames and print the final state
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        frame_time: f32,
        /// Print an ASCII height map of the final state
        #[arg(long)]
        map: bool,
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Record a run, replay its commands, and compare the states
    Replay {
        /// Number of frames to run
        #[arg(short, long, default_value = "300")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        frame_time: f32,
        /// Write the recorded commands to this JSON file
        #[arg(long)]
        save: Option<PathBuf>,
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Print the vertex and index buffer layout of a grid
    Mesh {
        #[arg(long, default_value = "128")]
        rows: usize,
        #[arg(long, default_value = "128")]
        cols: usize,
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
            println!("ripple-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("waves: {}", ripple_waves::crate_info());
            println!("render: {}", ripple_render::crate_info());
            println!("scene: {}", ripple_scene::crate_info());
            println!("tools: {}", ripple_tools::crate_info());
        }
        Commands::Simulate {
            frames,
            frame_time,
            map,
            scene,
        } => {
            let config = scene.load()?;
            let waves = config.waves;
            println!(
                "Simulating {}x{} grid for {frames} frames of {frame_time}s (courant={:.3})",
                waves.rows,
                waves.cols,
                waves.courant_number()
            );

            let mut scene = WaterScene::new(config)?;
            let mut mesh = MeshBuilder::new(scene.field());
            let mut timer = StepTimer::new(scene.field(), 120);
            let mut drops = 0usize;
            for _ in 0..frames {
                let start = Instant::now();
                let report = scene.frame(frame_time);
                mesh.update(scene.field())?;
                timer.record(scene.field(), start.elapsed(), report.stepped);
                drops += usize::from(report.raindrop.is_some());
            }

            let field = scene.field();
            println!("{}", FieldInspector::summary(field));
            println!("Raindrops: {drops}, scene time: {:.2}s", scene.total_time());
            if let Some((row, col, y)) = FieldInspector::peak(field) {
                println!("Peak: ({row}, {col}) y={y:.4}");
            }
            println!("Timing: {timer}");
            println!(
                "Vertex buffer: {} bytes, state hash: {:#x}",
                mesh.mesh().vertex_bytes().len(),
                field.state_hash()
            );
            if map {
                print!("{}", DebugTextRenderer::new().render(field, &RenderView::default()));
            }
        }
        Commands::Replay {
            frames,
            frame_time,
            save,
            scene,
        } => {
            let mut config = scene.load()?;
            config.record_commands = true;
            println!("Deterministic replay: seed={}, frames={frames}", config.rain.seed);

            let mut scene = WaterScene::new(config)?;
            for _ in 0..frames {
                scene.frame(frame_time);
            }
            let replayed = scene.replay()?;

            let original = scene.field();
            println!(
                "Run:    steps={}, hash={:#x}",
                original.step_count(),
                original.state_hash()
            );
            println!(
                "Replay: steps={}, hash={:#x}",
                replayed.step_count(),
                replayed.state_hash()
            );
            println!(
                "Match: {}",
                if original.state_hash() == replayed.state_hash() {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );

            if let Some(path) = save {
                let commands = scene.take_commands();
                let file = std::fs::File::create(&path)?;
                serde_json::to_writer_pretty(file, &commands)?;
                tracing::info!(path = %path.display(), commands = commands.len(), "saved commands");
            }
        }
        Commands::Mesh { rows, cols } => {
            let field = WaveField::new(WaveParams {
                rows,
                cols,
                ..WaveParams::default()
            })?;
            let builder = MeshBuilder::new(&field);
            let indices = &builder.mesh().indices;
            println!(
                "Grid {}x{}: vertices={}, triangles={}, indices={}",
                field.row_count(),
                field.column_count(),
                field.vertex_count(),
                field.triangle_count(),
                indices.len()
            );
            println!(
                "Extent: {:.1} x {:.1}, index buffer: {} bytes (u32)",
                field.width(),
                field.depth(),
                builder.mesh().index_bytes().len()
            );
            match grid_indices_u16(rows, cols) {
                Ok(small) => println!("16-bit indices: ok ({} bytes)", small.len() * 2),
                Err(e) => println!("16-bit indices: {e}"),
            }
        }
    }

    Ok(())
}
