use camino::Utf8Path;
use camino::Utf8PathBuf;
use hxls_python::HandlerDefinition;
use hxls_templates::HandlerReference;
use rustc_hash::FxHashMap;

use crate::types::DuplicateDefinition;

/// Everything one file contributed to the index.
#[derive(Debug, Default)]
pub(crate) struct FileEntry {
    pub(crate) definitions: Vec<HandlerDefinition>,
    pub(crate) references: Vec<HandlerReference>,
    /// Insertion order, used to pick the winning definition of a name.
    seq: u64,
}

impl FileEntry {
    fn last_definition_of(&self, name: &str) -> Option<&HandlerDefinition> {
        self.definitions.iter().rev().find(|def| def.name == name)
    }
}

/// The mutable part of the index. Always accessed under the index mutex.
///
/// `definitions` and `usages` are derived from `files` and are kept in step
/// with it by `insert_file` and `remove_file`.
#[derive(Debug, Default)]
pub(crate) struct IndexState {
    files: FxHashMap<Utf8PathBuf, FileEntry>,
    definitions: FxHashMap<String, HandlerDefinition>,
    usages: FxHashMap<String, Vec<HandlerReference>>,
    next_seq: u64,
    /// Root of the last full build.
    root: Option<Utf8PathBuf>,
}

impl IndexState {
    /// Forget every file and start over under `root`.
    pub(crate) fn reset(&mut self, root: Utf8PathBuf) {
        *self = Self {
            root: Some(root),
            ..Self::default()
        };
    }

    pub(crate) fn root(&self) -> Option<&Utf8Path> {
        self.root.as_deref()
    }

    /// Drop whatever `path` contributed and record its new contents.
    pub(crate) fn replace_file(
        &mut self,
        path: Utf8PathBuf,
        definitions: Vec<HandlerDefinition>,
        references: Vec<HandlerReference>,
    ) {
        self.remove_file(&path);
        self.insert_file(path, definitions, references);
    }

    fn insert_file(
        &mut self,
        path: Utf8PathBuf,
        definitions: Vec<HandlerDefinition>,
        references: Vec<HandlerReference>,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;

        for definition in &definitions {
            if let Some(previous) = self.definitions.get(&definition.name) {
                if previous.file != path {
                    tracing::warn!(
                        name = %definition.name,
                        previous = %previous.file,
                        file = %path,
                        "Handler name defined in more than one file, latest wins"
                    );
                }
            }
            self.definitions
                .insert(definition.name.clone(), definition.clone());
        }

        for reference in &references {
            self.usages
                .entry(reference.name.clone())
                .or_default()
                .push(reference.clone());
        }

        self.files.insert(
            path,
            FileEntry {
                definitions,
                references,
                seq,
            },
        );
    }

    /// Returns `false` when `path` was never indexed.
    pub(crate) fn remove_file(&mut self, path: &Utf8Path) -> bool {
        let Some(entry) = self.files.remove(path) else {
            return false;
        };

        for reference in &entry.references {
            if let Some(usages) = self.usages.get_mut(&reference.name) {
                usages.retain(|usage| usage.file.as_path() != path);
                if usages.is_empty() {
                    self.usages.remove(&reference.name);
                }
            }
        }

        for definition in &entry.definitions {
            let owned = self
                .definitions
                .get(&definition.name)
                .is_some_and(|current| current.file.as_path() == path);
            if !owned {
                continue;
            }

            let fallback = self.latest_definition_of(&definition.name).cloned();
            match fallback {
                Some(fallback) => {
                    tracing::debug!(
                        name = %definition.name,
                        file = %fallback.file,
                        "Restored shadowed handler definition"
                    );
                    self.definitions.insert(definition.name.clone(), fallback);
                }
                None => {
                    self.definitions.remove(&definition.name);
                }
            }
        }

        true
    }

    fn latest_definition_of(&self, name: &str) -> Option<&HandlerDefinition> {
        self.files
            .values()
            .filter_map(|entry| entry.last_definition_of(name).map(|def| (entry.seq, def)))
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, def)| def)
    }

    pub(crate) fn definition(&self, name: &str) -> Option<&HandlerDefinition> {
        self.definitions.get(name)
    }

    pub(crate) fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub(crate) fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    pub(crate) fn usages(&self, name: &str) -> &[HandlerReference] {
        self.usages.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn usage_count(&self) -> usize {
        self.usages.values().map(Vec::len).sum()
    }

    pub(crate) fn file(&self, path: &Utf8Path) -> Option<&FileEntry> {
        self.files.get(path)
    }

    pub(crate) fn files(&self) -> impl Iterator<Item = &Utf8PathBuf> {
        self.files.keys()
    }

    pub(crate) fn file_count(&self) -> usize {
        self.files.len()
    }

    pub(crate) fn undefined_usages(&self) -> Vec<HandlerReference> {
        let mut undefined: Vec<HandlerReference> = self
            .usages
            .values()
            .flatten()
            .filter(|usage| !usage.is_variable && !self.definitions.contains_key(&usage.name))
            .cloned()
            .collect();
        undefined.sort_by(|a, b| {
            (&a.file, a.line_number, a.column).cmp(&(&b.file, b.line_number, b.column))
        });
        undefined
    }

    pub(crate) fn unused_definitions(&self) -> Vec<HandlerDefinition> {
        let mut unused: Vec<HandlerDefinition> = self
            .definitions
            .values()
            .filter(|def| self.usages(&def.name).iter().all(|usage| usage.is_variable))
            .cloned()
            .collect();
        unused.sort_by(|a, b| {
            (&a.file, a.line_number, &a.name).cmp(&(&b.file, b.line_number, &b.name))
        });
        unused
    }

    pub(crate) fn duplicate_definitions(&self) -> Vec<DuplicateDefinition> {
        let mut duplicates: Vec<DuplicateDefinition> = self
            .definitions
            .values()
            .filter_map(|winner| {
                let mut shadowed: Vec<(u64, &HandlerDefinition)> = self
                    .files
                    .iter()
                    .filter(|(path, _)| **path != winner.file)
                    .filter_map(|(_, entry)| {
                        entry
                            .last_definition_of(&winner.name)
                            .map(|def| (entry.seq, def))
                    })
                    .collect();
                if shadowed.is_empty() {
                    return None;
                }
                shadowed.sort_by(|a, b| b.0.cmp(&a.0));
                Some(DuplicateDefinition {
                    name: winner.name.clone(),
                    winner: winner.clone(),
                    shadowed: shadowed.into_iter().map(|(_, def)| def.clone()).collect(),
                })
            })
            .collect();
        duplicates.sort_by(|a, b| a.name.cmp(&b.name));
        duplicates
    }
}
