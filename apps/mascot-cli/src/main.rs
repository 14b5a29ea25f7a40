use std::io::{BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mascot_chat::{ChatEngine, CompletionClient, CompletionConfig, SpeechClient, SpeechConfig};
use mascot_common::Transform;
use mascot_guestbook::{GuestbookEntry, GuestbookStore};
use mascot_input::PointerState;
use mascot_pose::{AvatarFlags, AvatarPose, AvatarRig, Mood, RingField, ShapeField};
use mascot_render::{
    DebugTextRenderer, FrameComposition, OrbitCamera, Renderer, Wireframe2dRenderer, PALETTES,
};
use mascot_scene::SceneGraphBuilder;
use mascot_tools::{PoseInspector, SceneInspector};

#[derive(Parser)]
#[command(name = "mascot-cli", about = "CLI tool for mascot operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Simulate the avatar pose headlessly and print the final readout
    Pose {
        /// Number of frames to simulate at 60 Hz
        #[arg(short, long, default_value = "120")]
        frames: u32,
        /// Normalized pointer x in [-1, 1]
        #[arg(long, default_value = "0.0")]
        pointer_x: f32,
        /// Normalized pointer y in [-1, 1]
        #[arg(long, default_value = "0.0")]
        pointer_y: f32,
        /// Mood: idle, excited, thinking, talking
        #[arg(long, default_value = "idle")]
        mood: String,
        /// Trigger a wave at the start of the run
        #[arg(long)]
        wave: bool,
    },
    /// Project the ambient wireframe scene and print draw-list statistics
    Scene {
        /// Number of frames to simulate at 60 Hz
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seed for the shape and ring fields
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Palette index (clamped to the palette list)
        #[arg(short, long, default_value = "0")]
        palette: usize,
    },
    /// Chat with the assistant (offline fallback unless OPENAI_API_KEY is set)
    Chat {
        /// Send one message and exit instead of starting a REPL
        #[arg(short, long)]
        message: Option<String>,
        /// Write synthesized speech for each reply to this file
        /// (silently skipped when the speech service is unavailable)
        #[arg(long)]
        speak_out: Option<std::path::PathBuf>,
    },
    /// Guestbook operations
    Guestbook {
        /// Store file path
        #[arg(long, default_value = "./guestbook.jsonl")]
        path: std::path::PathBuf,
        #[command(subcommand)]
        action: GuestbookAction,
    },
}

#[derive(Subcommand)]
enum GuestbookAction {
    /// Append an entry
    Add {
        #[arg(long)]
        author: String,
        #[arg(long)]
        message: String,
    },
    /// List all entries in order
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("mascot-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("frame: {}", mascot_frame::crate_info());
            println!("input: {}", mascot_input::crate_info());
            println!("scene: {}", mascot_scene::crate_info());
            println!("geometry: {}", mascot_geometry::crate_info());
            println!("pose: {}", mascot_pose::crate_info());
            println!("render: {}", mascot_render::crate_info());
            println!("chat: {}", mascot_chat::crate_info());
            println!("guestbook: {}", mascot_guestbook::crate_info());
            println!("tools: {}", mascot_tools::crate_info());
        }
        Commands::Pose {
            frames,
            pointer_x,
            pointer_y,
            mood,
            wave,
        } => run_pose(frames, pointer_x, pointer_y, &mood, wave)?,
        Commands::Scene {
            frames,
            seed,
            palette,
        } => run_scene(frames, seed, palette)?,
        Commands::Chat { message, speak_out } => run_chat(message, speak_out)?,
        Commands::Guestbook { path, action } => run_guestbook(&path, action)?,
    }

    Ok(())
}

fn parse_mood(name: &str) -> Mood {
    match name {
        "excited" => Mood::Excited,
        "thinking" => Mood::Thinking,
        "talking" => Mood::Talking,
        _ => Mood::Idle,
    }
}

fn run_pose(frames: u32, pointer_x: f32, pointer_y: f32, mood: &str, wave: bool) -> Result<()> {
    let mut builder = SceneGraphBuilder::new();
    let rig = AvatarRig::build(&mut builder, None)?;
    let mut graph = builder.build()?;

    let mood = parse_mood(mood);
    let flags = AvatarFlags {
        mood,
        talking: mood == Mood::Talking,
    };
    let pointer = PointerState {
        x: pointer_x.clamp(-1.0, 1.0),
        y: pointer_y.clamp(-1.0, 1.0),
    };

    let mut pose = AvatarPose::new();
    if wave {
        pose.start_wave(1.5);
    }

    let dt = 1.0 / 60.0;
    for frame in 0..frames {
        pose.update(frame as f32 * dt, dt, pointer, flags);
    }
    pose.apply(&rig, &mut graph);
    graph.propagate();

    println!("{}", SceneInspector::summary(&graph));
    println!(
        "Simulated {frames} frames at 60 Hz, pointer=({:.2}, {:.2}), mood={mood:?}",
        pointer.x, pointer.y
    );
    println!("{}", PoseInspector::readout(&pose));
    Ok(())
}

fn run_scene(frames: u32, seed: u64, palette: usize) -> Result<()> {
    let palette = &PALETTES[palette.min(PALETTES.len() - 1)];

    let mut builder = SceneGraphBuilder::new();
    let root = builder.group(None, "field_root", Transform::default())?;
    let field = ShapeField::build(&mut builder, Some(root), 20, seed)?;
    let mut graph = builder.build()?;
    field.recolor(&palette.colors, &mut graph);

    let rings = RingField::new(&palette.colors, seed);
    let mut camera = OrbitCamera::default();
    let renderer = Wireframe2dRenderer::new();

    let dt = 1.0 / 60.0;
    let mut t = 0.0;
    let mut last_segments = 0;
    for _ in 0..frames {
        t += dt;
        camera.update(dt);
        field.update(t, &mut graph);
        graph.propagate();
        last_segments = renderer.render(&graph, &camera).len();
    }

    let segments = renderer.render(&graph, &camera);
    let frame = FrameComposition::compose(palette, segments, rings.strokes(t));
    println!("{}", DebugTextRenderer::new().render(&graph, &camera));
    println!(
        "Frame {frames}: {} stroked segments, {} ring strokes (was {last_segments} last frame)",
        frame.segments.len(),
        frame.rings.len()
    );
    Ok(())
}

fn run_chat(
    message: Option<String>,
    speak_out: Option<std::path::PathBuf>,
) -> Result<()> {
    let completion_key = std::env::var("OPENAI_API_KEY").ok();
    let completion = completion_key.map(|key| {
        CompletionClient::new(CompletionConfig {
            api_key: Some(key),
            ..CompletionConfig::default()
        })
    });
    let mut engine = ChatEngine::new(completion);

    let speech = SpeechClient::new(SpeechConfig {
        api_key: std::env::var("ELEVENLABS_API_KEY").ok(),
        ..SpeechConfig::default()
    });

    let handle_message = |engine: &mut ChatEngine, input: &str| -> Result<()> {
        let response = engine.respond(input);
        println!("assistant: {response}");
        if let Some(path) = &speak_out {
            if let Some(audio) = engine.speak(&speech, &response) {
                std::fs::write(path, audio)?;
                println!("(voice written to {})", path.display());
            }
            engine.finish_speaking();
        }
        Ok(())
    };

    if let Some(message) = message {
        return handle_message(&mut engine, &message);
    }

    println!("{}", engine.transcript()[0].text);
    println!("(type a question, or an empty line to quit)");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        handle_message(&mut engine, line)?;
    }
    Ok(())
}

fn run_guestbook(path: &std::path::Path, action: GuestbookAction) -> Result<()> {
    let mut store = GuestbookStore::open(path)?;
    match action {
        GuestbookAction::Add { author, message } => {
            let unix_time_ms = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            store.append(&GuestbookEntry {
                author,
                message,
                unix_time_ms,
            })?;
            println!("Signed. {} entries total.", store.len()?);
        }
        GuestbookAction::List => {
            let entries = store.load()?;
            if entries.is_empty() {
                println!("Guestbook is empty.");
            }
            for entry in entries {
                println!("[{}] {}: {}", entry.unix_time_ms, entry.author, entry.message);
            }
        }
    }
    Ok(())
}
