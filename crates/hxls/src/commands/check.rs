use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use clap::ValueEnum;
use hxls_conf::DiagnosticSeverity;
use hxls_index::IndexStats;
use serde::Serialize;

use super::plural;
use super::Project;
use crate::args::Args;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Check {
    /// Workspace root to index. Defaults to the current directory.
    root: Option<Utf8PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum FindingKind {
    Undefined,
    Unused,
    Duplicate,
}

#[derive(Debug, Serialize)]
struct Finding {
    kind: FindingKind,
    severity: &'static str,
    name: String,
    file: Utf8PathBuf,
    /// 1-based.
    line: usize,
    /// 1-based; only references carry a column.
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<usize>,
    message: String,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    stats: IndexStats,
    findings: &'a [Finding],
}

impl Command for Check {
    fn execute(&self, args: &Args) -> Result<Exit> {
        let project = Project::load(self.root.as_deref(), args)?;
        let findings = collect_findings(&project);

        if !args.global.quiet {
            match self.format {
                Format::Text => {
                    for finding in &findings {
                        println!("{}", render_text(finding));
                    }
                }
                Format::Json => {
                    let report = Report {
                        stats: project.stats,
                        findings: &findings,
                    };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }

        let summary = summary(&findings);
        let exit = if count_severity(&findings, DiagnosticSeverity::Error) > 0 {
            Exit::error()
        } else {
            Exit::success()
        };
        Ok(match summary {
            Some(summary) => exit.with_message(summary),
            None => exit,
        })
    }
}

fn count_severity(findings: &[Finding], severity: DiagnosticSeverity) -> usize {
    findings
        .iter()
        .filter(|finding| finding.severity == severity.as_str())
        .count()
}

/// "Found 1 error and 2 warnings." Severities with no findings are left out.
fn summary(findings: &[Finding]) -> Option<String> {
    let parts: Vec<String> = [
        (DiagnosticSeverity::Error, "error"),
        (DiagnosticSeverity::Warning, "warning"),
        (DiagnosticSeverity::Info, "info message"),
    ]
    .into_iter()
    .map(|(severity, word)| (count_severity(findings, severity), word))
    .filter(|(count, _)| *count > 0)
    .map(|(count, word)| plural(count, word))
    .collect();

    let (last, rest) = parts.split_last()?;
    if rest.is_empty() {
        Some(format!("Found {last}."))
    } else {
        Some(format!("Found {} and {last}.", rest.join(", ")))
    }
}

fn collect_findings(project: &Project) -> Vec<Finding> {
    let diagnostics = &project.settings.diagnostics;
    let index = &project.index;
    let mut findings = Vec::new();

    if diagnostics.undefined.is_enabled() {
        findings.extend(index.find_undefined_usages().into_iter().map(|usage| Finding {
            kind: FindingKind::Undefined,
            severity: diagnostics.undefined.as_str(),
            message: format!("`{}` references undefined handler `{}`", usage.tag_type, usage.name),
            file: project.display_path(&usage.file).to_owned(),
            line: usage.line_number,
            column: Some(usage.column + 1),
            name: usage.name,
        }));
    }

    if diagnostics.unused.is_enabled() {
        findings.extend(index.find_unused_definitions().into_iter().map(|definition| Finding {
            kind: FindingKind::Unused,
            severity: diagnostics.unused.as_str(),
            message: format!(
                "handler `{}` ({}) is never referenced",
                definition.name, definition.class_name
            ),
            file: project.display_path(&definition.file).to_owned(),
            line: definition.line_number,
            column: None,
            name: definition.name,
        }));
    }

    if diagnostics.duplicate.is_enabled() {
        for duplicate in index.find_duplicate_definitions() {
            let winner = project.display_path(&duplicate.winner.file);
            findings.extend(duplicate.shadowed.iter().map(|shadowed| Finding {
                kind: FindingKind::Duplicate,
                severity: diagnostics.duplicate.as_str(),
                name: duplicate.name.clone(),
                file: project.display_path(&shadowed.file).to_owned(),
                line: shadowed.line_number,
                column: None,
                message: format!(
                    "handler `{}` is also defined in {}:{}, which takes precedence",
                    duplicate.name, winner, duplicate.winner.line_number
                ),
            }));
        }
    }

    findings
}

fn render_text(finding: &Finding) -> String {
    let location = location(&finding.file, finding.line, finding.column);
    format!("{location}: {}: {}", finding.severity, finding.message)
}

fn location(file: &Utf8Path, line: usize, column: Option<usize>) -> String {
    match column {
        Some(column) => format!("{file}:{line}:{column}"),
        None => format!("{file}:{line}"),
    }
}
