use camino::Utf8Path;
use camino::Utf8PathBuf;
use hxls_conf::Settings;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;

/// Options controlling how `walk_files` traverses a workspace.
#[derive(Clone, Debug, Default)]
pub struct WalkOptions {
    /// Include hidden files and directories (those starting with `.`).
    pub hidden: bool,
    /// Gitignore-style glob patterns excluded from the walk.
    pub exclude: Vec<String>,
    /// Disable all ignore files (`.gitignore`, `.ignore`, etc.).
    pub no_ignore: bool,
}

impl From<&Settings> for WalkOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            hidden: settings.hidden,
            exclude: settings.exclude.clone(),
            no_ignore: settings.no_ignore,
        }
    }
}

/// Walk `root` and collect files that pass `predicate`.
///
/// Hidden entries are skipped and `.gitignore` rules are respected unless
/// `options` says otherwise. Paths are `root` joined with the entry's relative
/// path, not canonicalized, so they compare equal to paths a caller builds the
/// same way. Returns a sorted, deduplicated list.
#[must_use]
pub fn walk_files(
    root: &Utf8Path,
    predicate: impl Fn(&Utf8Path) -> bool,
    options: &WalkOptions,
) -> Vec<Utf8PathBuf> {
    if root.is_file() {
        return if predicate(root) {
            vec![root.to_owned()]
        } else {
            Vec::new()
        };
    }

    let mut builder = WalkBuilder::new(root.as_std_path());
    builder
        .standard_filters(!options.no_ignore)
        .hidden(!options.hidden);

    if !options.exclude.is_empty() {
        let mut overrides = OverrideBuilder::new(root.as_std_path());
        for glob in &options.exclude {
            if let Err(error) = overrides.add(&format!("!{glob}")) {
                tracing::warn!(%glob, %error, "Skipping invalid exclude glob");
            }
        }
        match overrides.build() {
            Ok(built) => {
                builder.overrides(built);
            }
            Err(error) => tracing::warn!(%error, "Ignoring exclude globs"),
        }
    }

    let mut files: Vec<Utf8PathBuf> = builder
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::debug!(%error, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
        .filter(|path| predicate(path))
        .collect();

    files.sort();
    files.dedup();
    tracing::debug!(%root, count = files.len(), "Walked workspace");
    files
}
