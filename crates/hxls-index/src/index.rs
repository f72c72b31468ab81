use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::sync::Mutex;
use std::sync::MutexGuard;

use camino::Utf8Path;
use camino::Utf8PathBuf;
use hxls_python::parse_definitions_with;
use hxls_python::HandlerDefinition;
use hxls_source::FileKind;
use hxls_templates::parse_references;
use hxls_templates::HandlerReference;
use hxls_workspace::walk_files;
use rayon::prelude::*;

use crate::error::IndexError;
use crate::options::IndexOptions;
use crate::state::IndexState;
use crate::types::DuplicateDefinition;
use crate::types::IndexStats;

/// Cross-reference between handler definitions and the template tags that
/// name them.
///
/// All reads and writes go through one mutex. Parsing happens before the
/// lock is taken, so a writer only holds it while splicing its results in and
/// a reader never sees half of a file's update.
#[derive(Debug, Default)]
pub struct HandlerIndex {
    options: IndexOptions,
    state: Mutex<IndexState>,
}

/// One file's parse results, produced outside the lock.
struct ParsedFile {
    path: Utf8PathBuf,
    kind: FileKind,
    definitions: Vec<HandlerDefinition>,
    references: Vec<HandlerReference>,
}

impl HandlerIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: IndexOptions) -> Self {
        Self {
            options,
            state: Mutex::default(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    fn state(&self) -> MutexGuard<'_, IndexState> {
        self.state.lock().expect("Handler index mutex poisoned")
    }

    fn parse(&self, path: &Utf8Path, kind: FileKind, content: &str) -> ParsedFile {
        let (definitions, references) = match kind {
            FileKind::Python => (
                parse_definitions_with(content, path, &self.options.base_rules),
                Vec::new(),
            ),
            FileKind::Template => (Vec::new(), parse_references(content, path)),
            FileKind::Other => (Vec::new(), Vec::new()),
        };
        tracing::debug!(
            %path,
            ?kind,
            definitions = definitions.len(),
            references = references.len(),
            "Parsed file"
        );
        ParsedFile {
            path: path.to_owned(),
            kind,
            definitions,
            references,
        }
    }

    /// Rebuild the index from every source and template file under `root`.
    ///
    /// Walking, reading and parsing happen in parallel before the lock is
    /// taken; the old state is then replaced in a single critical section.
    /// Files that cannot be read are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist, is not a directory, or
    /// cannot be listed. The index is left untouched in that case.
    ///
    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    pub fn build_full_index(&self, root: &Utf8Path) -> Result<IndexStats, IndexError> {
        check_root(root)?;

        let conventions = &self.options.conventions;
        let paths = walk_files(
            root,
            |path| conventions.classify_in(root, path).is_indexed(),
            &self.options.walk,
        );

        let parsed: Vec<Option<ParsedFile>> = paths
            .into_par_iter()
            .map(|path| {
                let kind = conventions.classify_in(root, &path);
                match fs::read_to_string(&path) {
                    Ok(content) => Some(self.parse(&path, kind, &content)),
                    Err(error) => {
                        tracing::warn!(%path, %error, "Skipping unreadable file");
                        None
                    }
                }
            })
            .collect();

        let mut stats = IndexStats::default();
        {
            let mut state = self.state();
            state.reset(root.to_owned());
            for file in parsed {
                let Some(file) = file else {
                    stats.skipped_files += 1;
                    continue;
                };
                match file.kind {
                    FileKind::Python => stats.source_files += 1,
                    FileKind::Template => stats.template_files += 1,
                    FileKind::Other => {}
                }
                state.replace_file(file.path, file.definitions, file.references);
            }
            stats.definitions = state.definition_count();
            stats.usages = state.usage_count();
        }

        tracing::info!(
            %root,
            source_files = stats.source_files,
            template_files = stats.template_files,
            skipped_files = stats.skipped_files,
            definitions = stats.definitions,
            usages = stats.usages,
            "Built handler index"
        );
        Ok(stats)
    }

    /// Re-parse one file from `content` and swap its contributions in.
    ///
    /// Paths that are neither handler modules nor templates are ignored; a
    /// path the index has not seen before is added. After a full build,
    /// `path` is classified relative to that build's root.
    ///
    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    pub fn update_file(&self, path: &Utf8Path, content: &str) {
        let root = self.state().root().map(Utf8Path::to_owned);
        let kind = match &root {
            Some(root) => self.options.conventions.classify_in(root, path),
            None => self.options.conventions.classify(path),
        };
        if !kind.is_indexed() {
            tracing::debug!(%path, "Ignoring update for unindexed file");
            return;
        }

        let parsed = self.parse(path, kind, content);
        self.state()
            .replace_file(parsed.path, parsed.definitions, parsed.references);
    }

    /// Drop everything `path` contributed. Unknown paths are a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    pub fn remove_file(&self, path: &Utf8Path) {
        if self.state().remove_file(path) {
            tracing::debug!(%path, "Removed file from index");
        }
    }

    /// The current definition of `name`. When several files declare it, the
    /// one indexed most recently wins.
    ///
    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn get_definition(&self, name: &str) -> Option<HandlerDefinition> {
        self.state().definition(name).cloned()
    }

    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn get_all_definition_names(&self) -> BTreeSet<String> {
        self.state()
            .definition_names()
            .map(ToString::to_string)
            .collect()
    }

    /// Every reference to `name`, variables included, in file processing
    /// order and then source order.
    ///
    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn get_usages(&self, name: &str) -> Vec<HandlerReference> {
        self.state().usages(name).to_vec()
    }

    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn get_definitions_in_file(&self, path: &Utf8Path) -> Vec<HandlerDefinition> {
        self.state()
            .file(path)
            .map(|entry| entry.definitions.clone())
            .unwrap_or_default()
    }

    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn get_usages_in_file(&self, path: &Utf8Path) -> Vec<HandlerReference> {
        self.state()
            .file(path)
            .map(|entry| entry.references.clone())
            .unwrap_or_default()
    }

    /// Literal references whose name has no definition, sorted by file, line
    /// and column.
    ///
    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn find_undefined_usages(&self) -> Vec<HandlerReference> {
        self.state().undefined_usages()
    }

    /// Definitions that no literal reference names, sorted by file and line.
    ///
    /// A definition reached only through template variables is reported,
    /// since its use cannot be proven.
    ///
    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn find_unused_definitions(&self) -> Vec<HandlerDefinition> {
        self.state().unused_definitions()
    }

    /// Names declared in more than one file, sorted by name.
    ///
    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn find_duplicate_definitions(&self) -> Vec<DuplicateDefinition> {
        self.state().duplicate_definitions()
    }

    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn indexed_files(&self) -> Vec<Utf8PathBuf> {
        let mut files: Vec<Utf8PathBuf> = self.state().files().cloned().collect();
        files.sort();
        files
    }

    /// Number of indexed files.
    ///
    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn len(&self) -> usize {
        self.state().file_count()
    }

    /// # Panics
    ///
    /// Panics if the index mutex is poisoned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_root(root: &Utf8Path) -> Result<(), IndexError> {
    let metadata = fs::metadata(root).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            IndexError::RootNotFound {
                path: root.to_owned(),
            }
        } else {
            IndexError::Io {
                path: root.to_owned(),
                source,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(IndexError::NotADirectory {
            path: root.to_owned(),
        });
    }

    fs::read_dir(root).map_err(|source| IndexError::Io {
        path: root.to_owned(),
        source,
    })?;

    Ok(())
}
