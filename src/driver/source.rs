use crate::driver::error::MapsugarError;
use crate::syntax::ast::Form;
use crate::syntax::error::ReadError;
use crate::syntax::read;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term::emit;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream};
use std::fs;
use std::io::{self, Read};
use tracing::debug;

/// Name under which standard input is reported
pub const STDIN: &str = "<stdin>";

/// A loader for units of forms that keeps the text for error
/// reporting
pub struct SourceLoader {
    /// Access to source text
    files: SimpleFiles<String, String>,
}

impl Default for SourceLoader {
    fn default() -> Self {
        SourceLoader {
            files: SimpleFiles::new(),
        }
    }
}

impl SourceLoader {
    pub fn new() -> Self {
        SourceLoader::default()
    }

    /// Read text from a file, or stdin when `path` is `None`
    pub fn load(&mut self, path: Option<&str>) -> Result<usize, MapsugarError> {
        let (name, text) = match path {
            Some(p) => (
                p.to_string(),
                fs::read_to_string(p)
                    .map_err(|_| MapsugarError::FileCouldNotBeRead(p.to_string()))?,
            ),
            None => (STDIN.to_string(), self.read_stdin()?),
        };
        debug!(input = %name, bytes = text.len(), "loaded");
        Ok(self.add(name, text))
    }

    /// Register text under a name
    pub fn add<S: Into<String>, T: Into<String>>(&mut self, name: S, text: T) -> usize {
        self.files.add(name.into(), text.into())
    }

    /// Read the forms of a loaded file
    pub fn forms(&self, file_id: usize) -> Result<Vec<Form>, MapsugarError> {
        let text = self
            .files
            .get(file_id)
            .map_err(|_| MapsugarError::FileCouldNotBeRead(file_id.to_string()))?
            .source();
        Ok(read::read_unit(text)?)
    }

    /// Name a loaded file was registered under
    pub fn name(&self, file_id: usize) -> Option<&str> {
        self.files.get(file_id).ok().map(|f| f.name().as_str())
    }

    /// Read source from stdin
    fn read_stdin(&mut self) -> Result<String, MapsugarError> {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }

    /// Diagnostic for an error, labelled with the offending position
    /// in `file_id` where the error carries one
    pub fn diagnostic(&self, file_id: Option<usize>, error: &MapsugarError) -> Diagnostic<usize> {
        let diag = error.to_diagnostic();
        match (file_id, error) {
            (Some(id), MapsugarError::Read(ReadError::Json(e))) => {
                match self.offset(id, e.line(), e.column()) {
                    Some(pos) => {
                        diag.with_labels(vec![Label::primary(id, pos..pos).with_message("here")])
                    }
                    None => diag,
                }
            }
            _ => diag,
        }
    }

    /// Byte offset of a one-based line and column
    fn offset(&self, file_id: usize, line: usize, column: usize) -> Option<usize> {
        let range = self.files.line_range(file_id, line.checked_sub(1)?).ok()?;
        Some((range.start + column.saturating_sub(1)).min(range.end))
    }

    /// Print a diagnostic to stderr
    pub fn diagnose_to_stderr(&self, diag: &Diagnostic<usize>) {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();
        let mut lock = writer.lock();
        if let Err(e) = emit(&mut lock, &config, &self.files, diag) {
            eprintln!("{}", e);
        }
    }

    pub fn diagnose_to_string(&self, diag: &Diagnostic<usize>) -> String {
        let mut s: Vec<u8> = Vec::new();
        {
            let mut writer = NoColor::new(&mut s);
            let config = codespan_reporting::term::Config::default();
            if let Err(e) = emit(&mut writer, &config, &self.files, diag) {
                return format!("{}", e);
            }
        }
        String::from_utf8_lossy(&s).into_owned()
    }
}
