//! Read a unit, rewrite it and write it out
use crate::core::desugar::Rewriter;
use crate::driver::error::MapsugarError;
use crate::driver::options::{ExportFormat, MapsugarOptions};
use crate::driver::source::{SourceLoader, STDIN};
use crate::driver::statistics::Timings;
use crate::syntax::ast::Form;
use crate::syntax::export::{json, pretty};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Load the input named by the options, returning its file id
pub fn load(
    opt: &MapsugarOptions,
    loader: &mut SourceLoader,
    stats: &mut Timings,
) -> Result<usize, MapsugarError> {
    stats.time("load", || loader.load(opt.input()))
}

/// Read the forms of a loaded input, rewrite them (unless dumping)
/// and write them out in the selected format
pub fn process(
    opt: &MapsugarOptions,
    loader: &SourceLoader,
    file_id: usize,
    stats: &mut Timings,
) -> Result<(), MapsugarError> {
    let forms = stats.time("read", || loader.forms(file_id))?;

    let forms = if opt.dump() {
        forms
    } else {
        let name = loader.name(file_id).unwrap_or(STDIN);
        stats.time("rewrite", || Rewriter::for_file(name).transform(forms))?
    };

    let text = stats.time("render", || render(&forms, opt.format()))?;
    stats.time("write", || write(opt.output().map(|p| p.as_path()), &text))?;
    info!(forms = forms.len(), "done");
    Ok(())
}

/// Rewrite JSON text naming a unit and render it in `format`
pub fn rewrite_text(name: &str, text: &str, format: ExportFormat) -> Result<String, MapsugarError> {
    let mut loader = SourceLoader::new();
    let file_id = loader.add(name, text);
    let forms = Rewriter::for_file(name).transform(loader.forms(file_id)?)?;
    render(&forms, format)
}

/// Render forms as text
pub fn render(forms: &[Form], format: ExportFormat) -> Result<String, MapsugarError> {
    Ok(match format {
        ExportFormat::Json => {
            let mut text = json::unit_to_string(forms)?;
            text.push('\n');
            text
        }
        ExportFormat::Pretty => pretty::express_unit(forms),
    })
}

fn write(output: Option<&Path>, text: &str) -> Result<(), MapsugarError> {
    match output {
        Some(path) => fs::write(path, text)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(text.as_bytes())?;
            handle.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::error::TransformError;

    const UNIT: &str = r#"[
      {"form": "file", "loc": 1, "file": "m.src", "line": 1},
      {"form": "function", "loc": 3, "name": "f", "arity": 0, "clauses": [
        {"loc": 3, "patterns": [], "guards": [], "body": [
          {"node": "map", "loc": 3, "base": null, "entries": [
            {"loc": 3, "key": "a", "value": {"node": "integer", "loc": 3, "value": 1}}
          ]}
        ]}
      ]},
      {"form": "eof", "loc": 4}
    ]"#;

    #[test]
    pub fn test_rewrite_to_pretty() {
        let out = rewrite_text("m.json", UNIT, ExportFormat::Pretty).unwrap();
        assert!(out.contains("f() ->\n    orddict:store(a, 1, orddict:new())."));
    }

    #[test]
    pub fn test_rewrite_to_json() {
        let out = rewrite_text("m.json", UNIT, ExportFormat::Json).unwrap();
        assert!(out.contains("\"store\""));
        assert!(!out.contains("\"map\""));
        assert!(out.ends_with("]\n"));
    }

    #[test]
    pub fn test_failure_names_file() {
        let unit = r#"[
          {"form": "function", "loc": 3, "name": "f", "arity": 0, "clauses": [
            {"loc": 3, "patterns": [], "body": [{"node": "zorg", "loc": 3}]}
          ]}
        ]"#;
        match rewrite_text("in.json", unit, ExportFormat::Json) {
            Err(MapsugarError::Transform(e @ TransformError::MissingRule { .. })) => {
                assert_eq!(e.file(), "in.json")
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
