mod check;
mod refs;

use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Subcommand;
use hxls_conf::Settings;
use hxls_index::HandlerIndex;
use hxls_index::IndexOptions;
use hxls_index::IndexStats;

use crate::args::Args;
use crate::exit::Exit;

pub trait Command {
    fn execute(&self, args: &Args) -> Result<Exit>;
}

#[derive(Debug, Subcommand)]
pub enum HxlsCommand {
    /// Report undefined, unused and duplicate handlers
    Check(self::check::Check),
    /// Show where a handler is defined and every template that uses it
    Refs(self::refs::Refs),
}

impl Command for HxlsCommand {
    fn execute(&self, args: &Args) -> Result<Exit> {
        match self {
            HxlsCommand::Check(cmd) => cmd.execute(args),
            HxlsCommand::Refs(cmd) => cmd.execute(args),
        }
    }
}

/// An indexed workspace, ready to query.
struct Project {
    root: Utf8PathBuf,
    settings: Settings,
    index: HandlerIndex,
    stats: IndexStats,
}

impl Project {
    /// Load settings for `root` (or the current directory), start logging and
    /// build the index.
    fn load(root: Option<&Utf8Path>, args: &Args) -> Result<Self> {
        let root = match root {
            Some(root) => root.to_owned(),
            None => current_dir()?,
        };

        let settings = Settings::new(root.as_std_path()).context("Failed to load settings")?;
        crate::logging::init(&args.global, settings.debug);

        let index = HandlerIndex::with_options(IndexOptions::from(&settings));
        let stats = index
            .build_full_index(&root)
            .with_context(|| format!("Failed to index {root}"))?;

        Ok(Self {
            root,
            settings,
            index,
            stats,
        })
    }

    /// `path` relative to the workspace root when it lies inside it.
    fn display_path<'a>(&self, path: &'a Utf8Path) -> &'a Utf8Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|_| anyhow::anyhow!("Current directory is not valid UTF-8"))
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}
