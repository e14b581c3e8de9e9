use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use reelsmith::{
    AspectMode, BackgroundKind, EmojiMode, FontLibrary, FrameIndex, FrameRenderer, MusicChoice,
    NarrationMode, Pipeline, PipelineConfig, RenderRequest, SpeechConfig, TextAnimation,
    VisualStyle, VoiceGender,
};
use reelsmith_server::{AppState, AssetSweeper, ServerConfig, create_router};
use serde::de::DeserializeOwned;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "reelsmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Render a reel to an MP4 (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Bind host (overrides `HOST`).
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides `PORT`).
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ReelArgs {
    /// Caption text.
    #[arg(long)]
    text: String,

    /// Duration in seconds.
    #[arg(long, default_value_t = 6)]
    duration: i64,

    /// portrait | landscape
    #[arg(long, default_value = "portrait", value_parser = parse_choice::<AspectMode>)]
    aspect: AspectMode,

    /// inspirational | impactful | minimal
    #[arg(long, default_value = "inspirational", value_parser = parse_choice::<VisualStyle>)]
    style: VisualStyle,

    /// gradient | dark | light
    #[arg(long, default_value = "gradient", value_parser = parse_choice::<BackgroundKind>)]
    background: BackgroundKind,

    /// fade | slide | zoom
    #[arg(long, default_value = "fade", value_parser = parse_choice::<TextAnimation>)]
    animation: TextAnimation,

    /// auto | off
    #[arg(long, default_value = "auto", value_parser = parse_choice::<EmojiMode>)]
    emoji: EmojiMode,
}

impl ReelArgs {
    fn request(&self) -> RenderRequest {
        let mut req = RenderRequest::new(self.text.clone());
        req.duration = self.duration;
        req.aspect = self.aspect;
        req.style = self.style;
        req.background = self.background;
        req.animation = self.animation;
        req.emoji = self.emoji;
        req
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    reel: ReelArgs,

    /// none | narrator | narrator_character
    #[arg(long, default_value = "none", value_parser = parse_choice::<NarrationMode>)]
    narration: NarrationMode,

    /// female | male
    #[arg(long, default_value = "female", value_parser = parse_choice::<VoiceGender>)]
    voice_gender: VoiceGender,

    /// Language tag for voices and the character line.
    #[arg(long, default_value = "es")]
    language: String,

    /// none | soft | cinematic | happy
    #[arg(long, default_value = "none", value_parser = parse_choice::<MusicChoice>)]
    music: MusicChoice,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    reel: ReelArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn parse_choice<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).map_err(|e| e.to_string())
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reelsmith=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Render(args) => cmd_render(args).await,
        Command::Frame(args) => cmd_frame(args),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let pipeline = Pipeline::from_configs(PipelineConfig::from_env(), SpeechConfig::from_env())
        .context("initialise pipeline")?;
    tokio::fs::create_dir_all(&pipeline.config().output_dir)
        .await
        .with_context(|| {
            format!(
                "create output dir '{}'",
                pipeline.config().output_dir.display()
            )
        })?;
    if !pipeline.speech_available() {
        tracing::warn!("OPENAI_API_KEY is not set; narrated endpoints will fail");
    }
    let sweeper = tokio::spawn(
        AssetSweeper::new(pipeline.config().output_dir.clone(), config.asset_ttl).run(),
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    let app = create_router(AppState::new(config, pipeline));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    sweeper.abort();
    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut req = args.reel.request();
    req.narration = args.narration;
    req.voice_gender = args.voice_gender;
    req.language = args.language;
    req.music = args.music;
    let spec = req.validate()?;

    let pipeline = Pipeline::from_configs(PipelineConfig::from_env(), SpeechConfig::from_env())?;
    let asset = pipeline.run(&spec, None).await?;

    reelsmith::ensure_parent_dir(&args.out)?;
    reelsmith::move_file(&asset.path, &args.out).await?;
    eprintln!(
        "wrote {} ({:?}, {})",
        args.out.display(),
        asset.audio,
        asset
            .duration_secs
            .map(|d| format!("{d:.2}s"))
            .unwrap_or_else(|| "duration unknown".to_string())
    );
    for note in &asset.degraded {
        eprintln!("degraded: {note}");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let spec = args.reel.request().validate()?;
    let font = FontLibrary::new(PipelineConfig::from_env().font_dir).resolve(spec.style)?;
    let renderer = FrameRenderer::new(&spec, &font)?;
    let frame = renderer.render(FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
