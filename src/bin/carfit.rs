use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use carfit::{
    Catalog, Configurator, EngineConfig, FsAssetSource, GeneratedImage, GenerationOutcome,
    GenerationState, Photo, SelectionMode, transport_for,
};
use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "carfit", version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Engine config JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog JSON. Defaults to the built-in catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory overlay references are resolved against.
    #[arg(long, global = true)]
    assets_root: Option<PathBuf>,

    /// Generation endpoint URL. Without one the demo transport answers.
    #[arg(long, global = true, env = "CARFIT_ENDPOINT")]
    endpoint: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List categories and parts.
    Catalog,
    /// Render a preview of a selection over a photo.
    Preview(PreviewArgs),
    /// Submit one generation attempt.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// Vehicle photo.
    #[arg(long)]
    photo: PathBuf,

    /// Toggle `CATEGORY:PART`, applied in order. Repeatable.
    #[arg(long = "select", value_parser = parse_selection)]
    select: Vec<(String, String)>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Flatten the layered preview instead of the anchor-placed raster.
    #[arg(long, default_value_t = false)]
    live: bool,

    /// Downscale the raster preview to at most this width.
    #[arg(long)]
    max_width: Option<u32>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Where to write an inline result image.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_selection(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((cat, part)) if !cat.trim().is_empty() && !part.trim().is_empty() => {
            Ok((cat.trim().to_string(), part.trim().to_string()))
        }
        _ => Err(format!("expected CATEGORY:PART, got '{raw}'")),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let config = load_config(&cli.global)?;
    let catalog = Arc::new(load_catalog(&cli.global)?);
    match cli.cmd {
        Command::Catalog => cmd_catalog(&catalog),
        Command::Preview(args) => cmd_preview(&config, catalog, args),
        Command::Generate(args) => cmd_generate(&config, catalog, args),
    }
}

fn load_config(global: &GlobalArgs) -> anyhow::Result<EngineConfig> {
    let mut config = match &global.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    if let Some(root) = &global.assets_root {
        config.assets_root = root.clone();
    } else if config.assets_root.as_os_str().is_empty() {
        config.assets_root = global
            .catalog
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
    }
    if let Some(endpoint) = &global.endpoint {
        config.provider.endpoint = Some(endpoint.clone());
    }

    config.validate()?;
    Ok(config)
}

fn load_catalog(global: &GlobalArgs) -> anyhow::Result<Catalog> {
    let catalog = match &global.catalog {
        Some(path) => Catalog::from_json_file(path)?,
        None => Catalog::builtin()?,
    };
    Ok(catalog)
}

fn session(
    config: &EngineConfig,
    catalog: Arc<Catalog>,
    args: &SelectionArgs,
) -> anyhow::Result<Configurator> {
    let source = Arc::new(FsAssetSource::new(config.assets_root.clone()));
    let mut cfg = Configurator::new(catalog, source, config);

    let photo = Photo::from_path(&args.photo)?;
    cfg.set_photo(photo);
    for (cat, part) in &args.select {
        cfg.toggle(cat, part)
            .with_context(|| format!("select {cat}:{part}"))?;
    }

    eprintln!(
        "{} part(s) selected, total {}",
        cfg.selection_count(),
        cfg.total_price()
    );
    Ok(cfg)
}

fn cmd_catalog(catalog: &Catalog) -> anyhow::Result<()> {
    for cat in catalog.categories() {
        let mode = match cat.selection_mode {
            SelectionMode::Exclusive => "pick one",
            SelectionMode::Additive => "pick any",
        };
        println!("{} {} ({}, {mode})", cat.icon, cat.label, cat.id);
        for part in catalog.parts_in(cat.id.as_str()) {
            println!("    {:<28} {:>6}  {}", part.id, part.price, part.name);
        }
    }
    Ok(())
}

fn cmd_preview(
    config: &EngineConfig,
    catalog: Arc<Catalog>,
    args: PreviewArgs,
) -> anyhow::Result<()> {
    let mut cfg = session(config, catalog, &args.selection)?;

    let frame = if args.live {
        let preview = cfg
            .live_preview()?
            .context("no photo loaded for the live preview")?;
        for skipped in &preview.skipped {
            eprintln!("skipped {}: {}", skipped.part_id, skipped.reason);
        }
        preview.flatten()?
    } else {
        let preview = match args.max_width {
            Some(w) => cfg.resize(Some(w))?,
            None => cfg.raster_preview()?,
        }
        .context("no photo loaded for the raster preview")?;
        for skipped in &preview.skipped {
            eprintln!("skipped {}: {}", skipped.part_id, skipped.reason);
        }
        preview.frame
    };

    let png = frame.encode_png()?;
    write_output(&args.out, &png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_generate(
    config: &EngineConfig,
    catalog: Arc<Catalog>,
    args: GenerateArgs,
) -> anyhow::Result<()> {
    let mut cfg = session(config, catalog, &args.selection)?;
    let transport = transport_for(&config.provider).context("build generation transport")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let state = runtime.block_on(cfg.generate(transport.as_ref())).clone();

    let outcome = match state {
        GenerationState::Complete(outcome) => outcome,
        other => anyhow::bail!("no generation attempt was made (state: {other:?})"),
    };

    println!("status: {}", outcome.kind());
    if let Some(message) = outcome.message() {
        println!("message: {message}");
    }
    if let Some(url) = outcome.display_url() {
        println!("image: {url}");
    }
    if let GenerationOutcome::Success {
        image: GeneratedImage::Inline { mime_type, bytes },
        ..
    } = &outcome
    {
        match &args.out {
            Some(out) => {
                write_output(out, bytes)?;
                eprintln!("wrote {} ({mime_type})", out.display());
            }
            None => eprintln!("inline {mime_type} image received; pass --out to save it"),
        }
    }
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
