use serde::Deserialize;

/// Severity a diagnostic is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Off,
    Error,
    Warning,
    Info,
}

impl DiagnosticSeverity {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        self != DiagnosticSeverity::Off
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticSeverity::Off => "off",
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        }
    }
}

/// Severity per index diagnostic.
///
/// Example configuration:
/// ```toml
/// [tool.hxls.diagnostics]
/// undefined = "error"
/// unused = "off"
/// duplicate = "warning"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// A template references a name no handler defines.
    pub undefined: DiagnosticSeverity,
    /// A handler is never referenced by a literal name.
    pub unused: DiagnosticSeverity,
    /// More than one file defines the same handler name.
    pub duplicate: DiagnosticSeverity,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            undefined: DiagnosticSeverity::Error,
            unused: DiagnosticSeverity::Warning,
            duplicate: DiagnosticSeverity::Warning,
        }
    }
}
