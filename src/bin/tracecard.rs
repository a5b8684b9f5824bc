use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tracecard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Render a single submission JSON to a PNG file.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Listen port (overrides `PORT`).
    #[arg(long)]
    port: Option<u16>,

    /// Completion webhook URL (overrides `WEBHOOK_URL`).
    #[arg(long)]
    webhook_url: Option<String>,

    /// Public origin for artifact URLs (overrides `SELF_URL`).
    #[arg(long)]
    self_url: Option<String>,

    /// Artifact directory (overrides `EXPORT_DIR`).
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Asset root directory (overrides `ASSETS_DIR`).
    #[arg(long)]
    assets_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input submission JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Asset root directory.
    #[arg(long, default_value = ".")]
    assets_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = tracecard::ServerConfig::from_env();
    if let Some(port) = args.port {
        // The default public origin follows the port.
        if config.self_url == format!("http://localhost:{}", config.port) {
            config.self_url = format!("http://localhost:{port}");
        }
        config.port = port;
    }
    if let Some(url) = args.webhook_url {
        config.webhook_url = Some(url);
    }
    if let Some(url) = args.self_url {
        config.self_url = url;
    }
    if let Some(dir) = args.export_dir {
        config.export_dir = dir;
    }
    if let Some(dir) = args.assets_dir {
        config.assets_dir = dir;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(tracecard::server::serve(config))?;
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let raw = std::fs::read(&args.in_path)
        .with_context(|| format!("read submission '{}'", args.in_path.display()))?;
    let submission: tracecard::Submission = serde_json::from_slice(&raw)
        .with_context(|| format!("parse submission '{}'", args.in_path.display()))?;
    let job = tracecard::RenderJob::from_submission(submission)?;

    let assets = tracecard::CardAssets::load(&args.assets_dir, &tracecard::AssetPaths::default())?;
    let compositor =
        tracecard::LayerCompositor::new(tracecard::CardLayout::default(), Arc::new(assets))?;
    let surface = compositor.render(&job)?;
    let png = tracecard::encode_png(&surface)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
