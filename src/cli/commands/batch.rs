use super::{open_store, CommandHandler};
use crate::cli::app::{parse_key_value, ListFormat, ShowFormat};
use crate::cli::session::Session;
use crate::config::ResolvedConfig;
use crate::store::{RecordId, RecordPatch};
use crate::{CatalogError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Handler for the `batch` command
pub struct BatchCommand {
    pub resolved: ResolvedConfig,
    pub script: PathBuf,
}

impl CommandHandler for BatchCommand {
    fn execute(&self) -> Result<()> {
        let script = fs::read_to_string(&self.script).map_err(|e| {
            CatalogError::Cli(format!(
                "Failed to read script {}: {}",
                self.script.display(),
                e
            ))
        })?;

        let store = open_store(&self.resolved)?;
        let mut session = Session::new(store, io::stdout().lock());
        run_script(&mut session, &script)?;

        if session.store().is_dirty() {
            tracing::warn!(
                "Script {} ended without saving its changes",
                self.script.display()
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "batch"
    }
}

impl BatchCommand {
    /// Create new batch command
    pub fn new(resolved: ResolvedConfig, script: PathBuf) -> Self {
        Self { resolved, script }
    }
}

/// Run every line of `script` against the session.
///
/// Lines are split with shell quoting rules; blank lines and `#` comments
/// are skipped. The first failing line stops the script and the error names
/// its line number.
pub fn run_script<W: Write>(session: &mut Session<W>, script: &str) -> Result<()> {
    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let words = shell_words::split(trimmed)
            .map_err(|e| CatalogError::Cli(format!("line {}: {}", line_no, e)))?;

        tracing::debug!("batch line {}: {:?}", line_no, words);
        run_line(session, &words)
            .map_err(|e| CatalogError::Cli(format!("line {}: {}", line_no, e)))?;
    }
    Ok(())
}

fn run_line<W: Write>(session: &mut Session<W>, words: &[String]) -> Result<()> {
    let (command, args) = match words.split_first() {
        Some((command, args)) => (command.as_str(), args),
        None => return Ok(()),
    };

    match command {
        "list" => {
            expect_args(command, args, 0, 0)?;
            session.view_all(ListFormat::Table)
        }
        "show" => {
            expect_args(command, args, 1, 1)?;
            session.view_one(parse_id(&args[0])?, ShowFormat::Text)
        }
        "add" => {
            expect_args(command, args, 1, usize::MAX)?;
            let id = if args[0] == "auto" {
                None
            } else {
                Some(parse_id(&args[0])?)
            };
            let record = session.build_record(id, &args[1..], &[])?;
            session.add(record)
        }
        "edit" => {
            expect_args(command, args, 2, usize::MAX)?;
            let id = parse_id(&args[0])?;
            let mut patch = RecordPatch::new();
            for arg in &args[1..] {
                let (field, value) = parse_key_value(arg).map_err(CatalogError::Cli)?;
                patch.set(field, value);
            }
            session.edit(id, &patch)
        }
        "delete" => {
            expect_args(command, args, 1, 1)?;
            session.delete(parse_id(&args[0])?)
        }
        "search" => session.search(&args.join(" "), false),
        "save" => {
            expect_args(command, args, 0, 0)?;
            session.save()
        }
        "echo" => {
            writeln!(session.out(), "{}", args.join(" "))?;
            Ok(())
        }
        other => Err(CatalogError::Cli(format!("unknown command '{}'", other))),
    }
}

fn parse_id(text: &str) -> Result<RecordId> {
    text.trim()
        .parse()
        .map_err(|_| CatalogError::Cli(format!("'{}' is not a numeric ID", text)))
}

fn expect_args(command: &str, args: &[String], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        let expected = match (min, max) {
            (a, b) if a == b => format!("{}", a),
            (a, usize::MAX) => format!("at least {}", a),
            (a, b) => format!("{} to {}", a, b),
        };
        return Err(CatalogError::Cli(format!(
            "'{}' takes {} argument(s), got {}",
            command,
            expected,
            args.len()
        )));
    }
    Ok(())
}
