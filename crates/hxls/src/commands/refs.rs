use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;

use super::plural;
use super::Project;
use crate::args::Args;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Refs {
    /// Handler name, as passed to `hx_get`, `hx_post` and friends.
    name: String,

    /// Workspace root to index. Defaults to the current directory.
    root: Option<Utf8PathBuf>,
}

impl Command for Refs {
    fn execute(&self, args: &Args) -> Result<Exit> {
        let project = Project::load(self.root.as_deref(), args)?;
        let definition = project.index.get_definition(&self.name);
        let usages = project.index.get_usages(&self.name);

        if definition.is_none() && usages.is_empty() {
            return Ok(Exit::error().with_message(format!("No handler named `{}`.", self.name)));
        }

        if !args.global.quiet {
            match &definition {
                Some(definition) => {
                    println!(
                        "{}:{}: class {}({})",
                        project.display_path(&definition.file),
                        definition.line_number,
                        definition.class_name,
                        definition.base_classes.join(", ")
                    );
                    if let Some(docstring) = &definition.docstring {
                        for line in docstring.lines() {
                            println!("    {line}");
                        }
                    }
                }
                None => println!("{}: not defined", self.name),
            }

            for usage in &usages {
                let variable = if usage.is_variable { " (variable)" } else { "" };
                println!(
                    "{}:{}:{}: {}{variable}",
                    project.display_path(&usage.file),
                    usage.line_number,
                    usage.column + 1,
                    usage.tag_type,
                );
            }
        }

        Ok(Exit::success().with_message(format!("Found {}.", plural(usages.len(), "usage"))))
    }
}
