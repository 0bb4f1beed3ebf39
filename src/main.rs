use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use emotion_fusion::io::{format_score_bars, format_stats};
use emotion_fusion::{
    aggregate, distribution, parse_recording_file, parse_session_file, timeline,
    write_session_json, ChartRenderer, Clock, FileStore, FusionWeight, HistoryStore,
    ImmediateRefresh, IntervalRefresh, RefreshSignal, ReplayCapture, ReplayDetector,
    SamplerConfig, SamplingLoop, Settings, SteppedClock, SystemClock, TextChartRenderer,
};

const DEFAULT_STORE_DIR: &str = ".emotion-fusion";

#[derive(Parser)]
#[command(name = "emotion-fusion")]
#[command(author, version, about = "Multimodal emotion fusion over recorded capture sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded capture through the sampling loop
    Replay {
        /// Recorded capture file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Export the session history to this file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory holding the persisted session history
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,

        /// Audio share of the fusion in percent (clamped to 0-100)
        #[arg(long, default_value = "50", allow_negative_numbers = true)]
        audio_weight: i64,

        /// Do not read or write the persisted history
        #[arg(long)]
        privacy: bool,

        /// Replay at this display refresh rate instead of as fast as possible
        #[arg(long)]
        fps: Option<u32>,

        /// Stamp samples with a synthetic clock advancing by this many ms per tick
        #[arg(long)]
        frame_interval_ms: Option<i64>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize an exported session
    Analyze {
        /// Exported session file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Print timeline labels in UTC instead of local time
        #[arg(long)]
        utc: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete the persisted session history
    Reset {
        /// Directory holding the persisted session history
        #[arg(long, default_value = DEFAULT_STORE_DIR)]
        store: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            input,
            output,
            store,
            audio_weight,
            privacy,
            fps,
            frame_interval_ms,
            verbose,
        } => {
            setup_logging(verbose);
            let settings = Settings {
                audio_weight: FusionWeight::clamped(audio_weight),
                privacy_mode: privacy,
            };
            replay_session(input, output, store, settings, fps, frame_interval_ms).await
        }
        Commands::Analyze {
            input,
            utc,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_session(input, utc)
        }
        Commands::Reset { store } => {
            setup_logging(false);
            reset_store(store)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn replay_session(
    input: PathBuf,
    output: Option<PathBuf>,
    store_dir: PathBuf,
    settings: Settings,
    fps: Option<u32>,
    frame_interval_ms: Option<i64>,
) -> Result<()> {
    info!("Loading capture recording from {:?}", input);
    let recording =
        Arc::new(parse_recording_file(&input).context("Failed to parse capture recording")?);
    info!("Loaded {} frames", recording.frames.len());

    let storage = FileStore::open(&store_dir)
        .with_context(|| format!("Failed to open history store at {:?}", store_dir))?;
    let mut history = HistoryStore::open(storage, settings.privacy_mode);
    if !history.is_empty() {
        info!("Continuing session with {} stored samples", history.len());
    }

    let clock: Box<dyn Clock> = match frame_interval_ms {
        Some(step) => Box::new(SteppedClock::new(Utc::now().timestamp_millis(), step)),
        None => Box::new(SystemClock),
    };
    let mut refresh: Box<dyn RefreshSignal> = match fps {
        Some(fps) => Box::new(IntervalRefresh::new(fps)),
        None => Box::new(ImmediateRefresh),
    };

    let config = SamplerConfig {
        audio_weight: settings.audio_weight,
        ..Default::default()
    };
    let mut sampler = SamplingLoop::new(
        ReplayCapture::new(recording.clone()),
        ReplayDetector::new(recording),
        clock,
        config,
    );
    let (handle, mut commands) = sampler.handle();

    sampler.start().await.context("Failed to start sampling")?;

    let interrupt = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping sampling");
            interrupt.stop();
        }
    });

    let summary = sampler.run(&mut history, &mut refresh, &mut commands).await;
    info!(
        "Replayed {} frames into {} samples ({} discarded)",
        sampler.capture().frames_played(),
        summary.ticks,
        summary.discarded
    );

    println!("Session Statistics");
    println!("==================");
    print!("{}", format_stats(&aggregate(history.all())));
    println!();

    if let Some(current) = sampler.current() {
        println!(
            "Current Emotion: {} ({:.1}% confidence)",
            current.dominant_emotion,
            current.confidence * 100.0
        );
        print!("{}", format_score_bars(&current.scores));
        println!();
        println!("Visual Only");
        print!("{}", format_score_bars(&current.visual_scores));
        println!("Audio Only");
        print!("{}", format_score_bars(&current.audio_scores));
        println!();
    }

    let mut renderer = TextChartRenderer::new();
    renderer.render_distribution(&distribution(history.all()));
    println!("Emotion Distribution");
    println!("--------------------");
    print!("{}", renderer.output());

    if let Some(path) = output {
        write_session_json(history.all(), &path)?;
        info!("Session exported to {:?}", path);
    }

    Ok(())
}

fn analyze_session(input: PathBuf, utc: bool) -> Result<()> {
    info!("Analyzing session from {:?}", input);
    let samples = parse_session_file(&input).context("Failed to parse session file")?;

    println!("Session Analysis");
    println!("================");
    println!("Samples: {}", samples.len());
    print!("{}", format_stats(&aggregate(&samples)));
    println!();

    let points = if utc {
        timeline(&samples, &Utc)
    } else {
        timeline(&samples, &Local)
    };

    let mut renderer = TextChartRenderer::new();
    println!("Emotion Timeline (last {} samples)", points.len());
    println!("----------------------------------");
    renderer.render_timeline(&points);
    print!("{}", renderer.into_output());
    println!();

    let mut renderer = TextChartRenderer::new();
    println!("Emotion Distribution");
    println!("--------------------");
    renderer.render_distribution(&distribution(&samples));
    print!("{}", renderer.into_output());

    Ok(())
}

fn reset_store(store_dir: PathBuf) -> Result<()> {
    let storage = FileStore::open(&store_dir)
        .with_context(|| format!("Failed to open history store at {:?}", store_dir))?;
    let mut history = HistoryStore::open(storage, false);
    let cleared = history.len();
    history.reset();
    info!("Cleared {} samples from {:?}", cleared, store_dir);
    Ok(())
}
