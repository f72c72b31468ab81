/// Base classes shipped by `hx_requests` that mark a handler.
const KNOWN_BASES: &[&str] = &[
    "BaseHxRequest",
    "FormHxRequest",
    "ModalHxRequest",
    "FormModalHxRequest",
    "DeleteHxRequest",
    "BaseTabsRouter",
];

/// Any base whose name ends with one of these is treated as a handler base,
/// which covers project-local intermediate classes like `CustomBaseHxRequest`.
const KNOWN_SUFFIXES: &[&str] = &["HxRequest"];

/// Lexical rule table deciding whether a class is a candidate handler.
///
/// A base matches when its last dotted segment equals one of `names` or ends
/// with one of `suffixes`. Nothing is resolved: a local class that merely
/// follows the naming convention counts, and an alias imported under another
/// name does not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseClassRules {
    names: Vec<String>,
    suffixes: Vec<String>,
}

impl Default for BaseClassRules {
    fn default() -> Self {
        Self {
            names: KNOWN_BASES.iter().map(ToString::to_string).collect(),
            suffixes: KNOWN_SUFFIXES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl BaseClassRules {
    /// The built-in table extended with extra exact base names.
    #[must_use]
    pub fn with_extra_names<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rules = Self::default();
        for name in extra {
            let name = name.into();
            if !name.is_empty() && !rules.names.contains(&name) {
                rules.names.push(name);
            }
        }
        rules
    }

    /// Test a single base as written, e.g. `BaseHxRequest` or
    /// `hx_requests.BaseHxRequest`.
    #[must_use]
    pub fn matches(&self, base: &str) -> bool {
        let last = base.rsplit('.').next().unwrap_or(base);
        if last.is_empty() {
            return false;
        }
        self.names.iter().any(|name| name == last)
            || self.suffixes.iter().any(|suffix| last.ends_with(suffix.as_str()))
    }

    #[must_use]
    pub fn is_candidate<'a>(&self, mut bases: impl Iterator<Item = &'a str>) -> bool {
        bases.any(|base| self.matches(base))
    }
}
