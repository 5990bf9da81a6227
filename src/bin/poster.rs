use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poster", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster document to PNG.
    Render(RenderArgs),
    /// Parse and validate a poster document without loading any resource.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input poster document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input poster document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Check(args) => cmd_check(args),
    }
}

fn document_root(in_path: &Path) -> &Path {
    in_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let doc = poster_render::PosterDocument::from_path(&args.in_path)?;
    let mut engine = doc.engine(document_root(&args.in_path))?;
    doc.apply(&mut engine);
    let png = engine.render().await?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let doc = poster_render::PosterDocument::from_path(&args.in_path)?;
    let mut engine = doc.engine(document_root(&args.in_path))?;
    let queued = doc.apply(&mut engine);
    let (w, h) = doc.canvas.device_size()?;
    println!(
        "ok: {} items, {queued} descriptors, {w}x{h} device px",
        doc.items.len()
    );
    Ok(())
}
