mod diagnostics;

use std::fs;
use std::path::Path;

use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

pub use crate::diagnostics::DiagnosticSeverity;
pub use crate::diagnostics::DiagnosticsConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
    #[error("Failed to read pyproject.toml")]
    PyprojectIo(#[from] std::io::Error),
    #[error("Failed to parse pyproject.toml TOML")]
    PyprojectParse(#[from] toml::de::Error),
    #[error("Failed to serialize extracted pyproject data")]
    PyprojectSerialize(#[from] toml::ser::Error),
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct Settings {
    pub debug: bool,
    /// A `.py` file is a handler module when its stem or any ancestor
    /// directory matches one of these names. Empty means every `.py` file.
    pub source_markers: Vec<String>,
    /// Extensions (without the dot) of files scanned as templates.
    pub template_extensions: Vec<String>,
    /// Base class names recognized as handlers in addition to the built-in
    /// rule table.
    pub extra_base_classes: Vec<String>,
    /// Walk hidden files and directories.
    pub hidden: bool,
    /// Ignore `.gitignore` and friends while walking.
    pub no_ignore: bool,
    /// Gitignore-style globs excluded from the walk.
    pub exclude: Vec<String>,
    pub diagnostics: DiagnosticsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            source_markers: vec!["hx_requests".to_string()],
            template_extensions: vec!["html".to_string(), "htm".to_string(), "txt".to_string()],
            extra_base_classes: Vec::new(),
            hidden: false,
            no_ignore: false,
            exclude: Vec::new(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl Settings {
    pub fn new(project_root: &Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("com.github", "hx-requests", "hxls")
            .map(|proj_dirs| proj_dirs.config_dir().join("hxls.toml"));

        Self::load_from_paths(project_root, user_config_file.as_deref())
    }

    fn load_from_paths(
        project_root: &Path,
        user_config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let pyproject_path = project_root.join("pyproject.toml");
        if pyproject_path.exists() {
            let content = fs::read_to_string(&pyproject_path)?;
            let document: toml::Table = toml::from_str(&content)?;

            let hxls_table = document
                .get("tool")
                .and_then(|tool| tool.get("hxls"))
                .and_then(toml::Value::as_table);

            if let Some(table) = hxls_table {
                let hxls_toml_string = toml::to_string(table)?;
                builder = builder.add_source(File::from_str(&hxls_toml_string, FileFormat::Toml));
            }
        }

        builder = builder.add_source(
            File::from(project_root.join(".hxls.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        builder = builder.add_source(
            File::from(project_root.join("hxls.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;
        tracing::debug!(?settings, root = %project_root.display(), "Loaded settings");
        Ok(settings)
    }
}
