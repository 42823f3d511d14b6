use std::io::Write;
use std::path::Path;

use bytesize::ByteSize;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::args::{CheckArgs, Cli, Commands, StatArgs, WalkArgs};
use remotefs::config::{paths, AppConfig, Verbosity};
use remotefs::{
    create_filesystem, create_filesystem_for, parse_remote_url, FileSystem, FsError,
    RemoteFileSystem,
};

fn main() {
    let cli = Cli::parse();

    // Convert CLI flags to verbosity level
    let verbosity = Verbosity::from((cli.quiet, cli.verbose));

    // RUST_LOG env var overrides CLI flags
    let filter = verbosity.as_tracing_filter();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr) // Keep stdout clean for output
        .init();

    tracing::debug!("Verbosity level: {:?}", verbosity);

    if let Err(err) = run(cli) {
        display_error(&err);
        std::process::exit(1);
    }
}

/// Execute the dispatched command.
fn run(cli: Cli) -> Result<(), FsError> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Walk(args) => walk(args, config),
        Commands::Stat(args) => stat(args, config),
        Commands::Check(args) => check(args, config),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<AppConfig, FsError> {
    match explicit {
        Some(path) if !path.exists() => Err(FsError::NotFound {
            path: path.display().to_string(),
        }),
        Some(path) => AppConfig::load(path),
        None => match paths::default_config_file() {
            Ok(path) => AppConfig::load(&path),
            Err(e) => {
                tracing::debug!("{}; using defaults", e);
                Ok(AppConfig::default())
            }
        },
    }
}

/// Resolve the backend and the path to operate on.
///
/// A URL selects its own backend. Anything else is a path on the backend
/// named by the config file; without one, the backend's default root.
fn open_backend(
    location: Option<&str>,
    config: Option<&Path>,
) -> Result<(FileSystem, String), FsError> {
    if let Some(raw) = location {
        let parsed = parse_remote_url(raw);
        if !parsed.is_local() {
            let fs = create_filesystem_for(&parsed)?;
            return Ok((fs, parsed.path().to_string()));
        }
    }

    let app_config = load_config(config)?;
    let fs = create_filesystem(app_config.remote_fs())?;
    let root = match location {
        Some(path) => path.to_string(),
        None => fs.default_root().to_string(),
    };
    Ok((fs, root))
}

fn walk(args: WalkArgs, config: Option<&Path>) -> Result<(), FsError> {
    let (mut fs, root) = open_backend(args.location.as_deref(), config)?;
    tracing::info!(backend = fs.name(), root = %root, "Walk started");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut dir_count = 0usize;
    let mut file_count = 0usize;

    for entry in fs.walk(&root) {
        let entry = entry?;
        dir_count += 1;
        file_count += entry.filenames.len();

        if args.json {
            serde_json::to_writer(&mut out, &entry).map_err(std::io::Error::from)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", entry.dirpath)?;
            for name in &entry.dirnames {
                writeln!(out, "  {}/", name)?;
            }
            for name in &entry.filenames {
                writeln!(out, "  {}", name)?;
            }
        }
    }
    out.flush()?;

    tracing::info!("Walked {} directories, {} files", dir_count, file_count);
    fs.close();
    Ok(())
}

fn stat(args: StatArgs, config: Option<&Path>) -> Result<(), FsError> {
    let (mut fs, path) = open_backend(Some(&args.location), config)?;

    let exists = fs.exists(&path);
    let is_dir = exists && fs.is_dir(&path);
    let size = if exists && !is_dir { fs.get_size(&path) } else { 0 };

    println!("backend: {}", fs.name());
    println!("path: {}", path);
    println!("exists: {}", exists);
    println!("is_dir: {}", is_dir);
    println!("size: {} ({})", size, ByteSize::b(size));

    fs.close();
    Ok(())
}

fn check(args: CheckArgs, config: Option<&Path>) -> Result<(), FsError> {
    let (mut fs, root) = open_backend(args.location.as_deref(), config)?;

    fs.connect()?;
    println!("{} backend connected", fs.name());

    let root_ok = fs.is_dir(&root);
    fs.close();

    if root_ok {
        println!("root {} is a directory", root);
        Ok(())
    } else {
        Err(FsError::NotFound { path: root })
    }
}

/// Display an FsError with optional suggestion hint to stderr.
fn display_error(err: &FsError) {
    eprintln!("error: {}", err);
    if let Some(suggestion) = err.suggestion() {
        eprintln!("  hint: {}", suggestion);
    }
}
