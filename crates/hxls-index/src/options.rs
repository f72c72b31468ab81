use hxls_conf::Settings;
use hxls_python::BaseClassRules;
use hxls_workspace::FileConventions;
use hxls_workspace::WalkOptions;

/// How an index classifies, parses and walks files.
#[derive(Clone, Debug, Default)]
pub struct IndexOptions {
    pub conventions: FileConventions,
    pub base_rules: BaseClassRules,
    pub walk: WalkOptions,
}

impl From<&Settings> for IndexOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            conventions: FileConventions::from(settings),
            base_rules: BaseClassRules::with_extra_names(settings.extra_base_classes.iter()),
            walk: WalkOptions::from(settings),
        }
    }
}
