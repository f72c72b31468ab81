use camino::Utf8Path;
use hxls_conf::Settings;
use hxls_source::FileKind;

/// Filename rules that decide which parser, if any, a file goes to.
///
/// Classification never looks at file content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileConventions {
    source_markers: Vec<String>,
    template_extensions: Vec<String>,
}

impl Default for FileConventions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for FileConventions {
    fn from(settings: &Settings) -> Self {
        Self::new(
            settings.source_markers.clone(),
            settings.template_extensions.clone(),
        )
    }
}

impl FileConventions {
    /// `source_markers` name the module stems or package directories that
    /// hold handlers; an empty list accepts every `.py` file.
    #[must_use]
    pub fn new(source_markers: Vec<String>, template_extensions: Vec<String>) -> Self {
        let template_extensions = template_extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        Self {
            source_markers,
            template_extensions,
        }
    }

    #[must_use]
    pub fn classify(&self, path: &Utf8Path) -> FileKind {
        let Some(extension) = path.extension() else {
            return FileKind::Other;
        };

        if extension == "py" {
            return if self.is_handler_module(path) {
                FileKind::Python
            } else {
                FileKind::Other
            };
        }

        let extension = extension.to_ascii_lowercase();
        if self.template_extensions.iter().any(|ext| *ext == extension) {
            FileKind::Template
        } else {
            FileKind::Other
        }
    }

    /// Classify `path` using only the components below `root`, so
    /// directories above the workspace never act as package markers.
    /// A path outside `root` is classified as given.
    #[must_use]
    pub fn classify_in(&self, root: &Utf8Path, path: &Utf8Path) -> FileKind {
        self.classify(path.strip_prefix(root).unwrap_or(path))
    }

    fn is_handler_module(&self, path: &Utf8Path) -> bool {
        if self.source_markers.is_empty() {
            return true;
        }

        let stem_matches = path
            .file_stem()
            .is_some_and(|stem| self.source_markers.iter().any(|marker| marker == stem));

        stem_matches
            || path
                .parent()
                .into_iter()
                .flat_map(Utf8Path::components)
                .any(|component| {
                    self.source_markers
                        .iter()
                        .any(|marker| marker == component.as_str())
                })
    }
}
