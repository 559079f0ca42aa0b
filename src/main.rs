#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use hollowfs::cache::{Cache, OpenFlags};
use hollowfs::collaborators::{InMemoryInodeRegistry, InMemoryStateStore, NullRanker, NullRemote};
use hollowfs::config::CacheConfig;
use hollowfs::output::{self, OutputArgs};
use hollowfs::prelude::Result;

/// Drives a [`Cache`] directly from the command line, against a local cache
/// root. There is no kernel-filesystem adapter here -- mounting is the
/// concern of whatever binds this crate to `fuser` or an equivalent, which
/// this crate deliberately does not include.
#[derive(Parser)]
#[command(author, version, about)]
struct Opt {
    /// Cache root directory. Defaults to the platform cache directory.
    #[arg(long)]
    cache_root: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List entries under a logical directory path.
    List { path: String },
    /// Print a file's serialized stat dictionary.
    Stat { path: String },
    /// Create a file and write the given bytes to it at offset 0.
    Put { path: String, contents: String },
    /// Read a file's full contents and print them to stdout.
    Cat { path: String },
    /// Remove a file.
    Rm { path: String },
    /// Create a directory.
    Mkdir { path: String },
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    output::init(&opt.output);

    let config = match &opt.cache_root {
        Some(root) => CacheConfig::new(root.clone()),
        None => CacheConfig::default(),
    };
    std::fs::create_dir_all(&config.cache_root)?;

    let registry = InMemoryInodeRegistry::new();
    let states = InMemoryStateStore::new();
    let ranker = NullRanker;
    let remote = NullRemote;
    let cache = Cache::new(&config, &registry, &states, &ranker, &remote);

    match opt.command {
        Command::List { path } => {
            for name in cache.list(&path, None)? {
                println!("{name}");
            }
        }
        Command::Stat { path } => {
            let stat = cache.getattributes(&path)?;
            println!("{stat:#?}");
        }
        Command::Put { path, contents } => {
            let file = cache.create(&path, 0o644)?;
            cache.write(&path, contents.as_bytes(), 0, &file)?;
        }
        Command::Cat { path } => {
            let file = cache.open(&path, OpenFlags { read: true, ..Default::default() })?;
            let stat = cache.getattributes(&path)?;
            let bytes = cache.read(&path, stat.st_size as usize, 0, &file)?;
            std::io::Write::write_all(&mut std::io::stdout(), &bytes)?;
        }
        Command::Rm { path } => {
            cache.unlink(&path)?;
        }
        Command::Mkdir { path } => {
            cache.mkdir(&path, 0o755)?;
        }
    }

    Ok(())
}
