use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{Level as LogLevel, info};

use polyedit::config::{ConfigError, EditorConfig};
use polyedit::converter::{Converter, ConverterError, ProcessConverter};
use polyedit::discovery::{self, DiscoveryError, Level};
use polyedit::session::{self, SessionError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Converter(#[from] ConverterError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("there are no levels to edit in {0}")]
    NoLevels(String),
    #[error("level `{0}` not found; available: {1}")]
    UnknownLevel(String, String),
    #[error("several levels found, choose one with --level: {0}")]
    AmbiguousLevel(String),
    #[error("cannot open event script {path}: {source}")]
    EventScript { path: String, source: io::Error },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "polyedit", about = "Edit custom shapes in a level layout")]
struct Cli {
    #[arg(long, env = "POLYEDIT_LEVEL_DIR", default_value = ".")]
    dir: PathBuf,

    #[arg(long, env = "POLYEDIT_LEVEL", help = "Level name, without extension")]
    level: Option<String>,

    #[arg(long, env = "POLYEDIT_EVENTS", default_value = "-", help = "Event script path, or - for stdin")]
    events: String,

    #[arg(long, env = "POLYEDIT_SNAPSHOT", help = "Write a PNG of the final frame here")]
    snapshot: Option<PathBuf>,

    #[arg(long, help = "Converter executable; overrides POLYEDIT_CONVERTER")]
    converter: Option<String>,

    #[arg(long, help = "Skip the startup converter check")]
    no_probe: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { LogLevel::DEBUG } else { LogLevel::INFO })
        .with_writer(io::stderr)
        .init();

    let mut config = EditorConfig::from_env()?;
    if let Some(program) = cli.converter.clone() {
        config.converter = program;
    }
    info!(converter = %config.converter, dir = %cli.dir.display(), fps = config.fps, "starting editor");

    let converter = ProcessConverter::new(&config.converter);
    if !cli.no_probe {
        converter.probe()?;
    }

    let levels = discovery::discover_levels(&cli.dir)?;
    let name = pick_level(&levels, cli.level.as_deref(), &cli.dir)?;
    let level = Level::new(&cli.dir, name);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let viewport = (config.viewport_width, config.viewport_height);
    let mut session = session::open_level(level, &converter, viewport, &mut out)?;
    info!(level = session.level().name(), shapes = session.ctx.scene.shape_count(), "editing");

    let input = open_events(&cli.events)?;
    session.run(input, &mut out)?;
    out.flush()?;

    if let Some(path) = &cli.snapshot {
        session.snapshot(config.viewport_width, config.viewport_height, path)?;
        info!(path = %path.display(), "snapshot written");
    }
    Ok(())
}

fn pick_level(levels: &[String], requested: Option<&str>, dir: &std::path::Path) -> Result<String, CliError> {
    match (requested, levels) {
        (_, []) => Err(CliError::NoLevels(dir.display().to_string())),
        (Some(name), _) if levels.iter().any(|l| l == name) => Ok(name.to_owned()),
        (Some(name), _) => Err(CliError::UnknownLevel(name.to_owned(), levels.join(", "))),
        (None, [only]) => Ok(only.clone()),
        (None, _) => Err(CliError::AmbiguousLevel(levels.join(", "))),
    }
}

fn open_events(path: &str) -> Result<Box<dyn BufRead>, CliError> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).map_err(|source| CliError::EventScript { path: path.to_owned(), source })?;
    Ok(Box::new(BufReader::new(file)))
}
