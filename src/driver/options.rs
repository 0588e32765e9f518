//! Command line argument handling with clap v4 and subcommands.

use crate::driver::error::MapsugarError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// mapsugar - desugar aggregate syntax in compiler forms
#[derive(Parser, Debug, Clone)]
#[command(name = "mapsugar")]
#[command(about = "Desugar aggregate literals and field access into orddict calls")]
#[command(version)]
pub struct MapsugarCli {
    /// Print phase timings to stderr before exiting
    #[arg(short = 'S', long = "statistics", global = true)]
    pub statistics: bool,

    /// Enable verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Set log level (overrides --verbose / --quiet)
    #[arg(long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rewrite a unit of forms
    Rewrite(RewriteArgs),
    /// Pretty print a unit of forms without rewriting
    Dump(DumpArgs),
    /// Explain what would be done
    Explain(RewriteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RewriteArgs {
    /// Output file (default stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Format to write output in (json or pretty)
    #[arg(short = 'x', long = "export")]
    pub export_type: Option<String>,

    /// Forms to read, as JSON (`-` or absent for stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
    /// Forms to read, as JSON (`-` or absent for stdin)
    #[arg(value_name = "FILE")]
    pub file: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Output formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON forms as read
    #[default]
    Json,
    /// Source-like text
    Pretty,
}

impl std::str::FromStr for ExportFormat {
    type Err = MapsugarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "pretty" | "text" | "erl" => Ok(ExportFormat::Pretty),
            other => Err(MapsugarError::UnknownFormat(other.to_string())),
        }
    }
}

/// Flattened options as used by the driver
#[derive(Debug, Clone, Default)]
pub struct MapsugarOptions {
    pub statistics: bool,
    pub verbose: u8,
    pub quiet: bool,
    pub log_level: Option<LogLevel>,

    pub explain: bool,
    pub dump: bool,

    pub input: Option<String>,
    pub output: Option<PathBuf>,
    pub export_type: Option<String>,
    pub format: ExportFormat,
}

impl From<MapsugarCli> for MapsugarOptions {
    fn from(cli: MapsugarCli) -> Self {
        let mut options = MapsugarOptions {
            statistics: cli.statistics,
            verbose: cli.verbose,
            quiet: cli.quiet,
            log_level: cli.log_level,
            ..Default::default()
        };

        match cli.command {
            Commands::Rewrite(args) => {
                options.input = args.file;
                options.output = args.output;
                options.export_type = args.export_type;
            }
            Commands::Explain(args) => {
                options.explain = true;
                options.input = args.file;
                options.output = args.output;
                options.export_type = args.export_type;
            }
            Commands::Dump(args) => {
                options.dump = true;
                options.input = args.file;
            }
        }

        options
    }
}

impl MapsugarOptions {
    /// Parse the process arguments
    pub fn from_args() -> Self {
        MapsugarOptions::from(MapsugarCli::parse())
    }

    pub fn explain(&self) -> bool {
        self.explain
    }

    pub fn dump(&self) -> bool {
        self.dump
    }

    pub fn statistics(&self) -> bool {
        self.statistics
    }

    /// Input path, `None` for stdin
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref().filter(|i| *i != "-")
    }

    pub fn output(&self) -> Option<&PathBuf> {
        self.output.as_ref()
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Filter directive for the log subscriber
    pub fn log_filter(&self) -> &'static str {
        if let Some(level) = self.log_level {
            level.as_str()
        } else if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn with_input<S: Into<String>>(mut self, input: S) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_export_type<S: Into<String>>(mut self, format: S) -> Self {
        self.export_type = Some(format.into());
        self
    }

    pub fn with_dump(mut self) -> Self {
        self.dump = true;
        self
    }

    pub fn build(mut self) -> Result<Self, MapsugarError> {
        self.process_defaults()?;
        Ok(self)
    }

    /// Reconcile the export format with the output file
    pub fn process_defaults(&mut self) -> Result<(), MapsugarError> {
        // if an output file is specified, default an export type if
        // not set
        if let Some(outfile) = self.output() {
            if self.export_type.is_none() {
                self.export_type = match outfile.extension().and_then(|s| s.to_str()) {
                    Some("json") => Some("json".to_string()),
                    Some("erl") | Some("txt") => Some("pretty".to_string()),
                    _ => None,
                };
            }
        }

        self.format = if self.dump {
            ExportFormat::Pretty
        } else {
            match &self.export_type {
                Some(format) => format.parse()?,
                None => ExportFormat::default(),
            }
        };

        Ok(())
    }

    /// Produce a dry run explanation of the selected options
    pub fn explanation(&self) -> String {
        let mut explanation = String::new();

        explanation.push_str("mapsugar will ");
        if self.dump {
            explanation.push_str("read the forms and pretty print them unchanged");
        } else {
            explanation.push_str(
                "read the forms, desugar aggregate literals, updates and field access into orddict calls, and write the result",
            );
        }
        explanation.push_str("\n\n");

        let i = self.input().unwrap_or("stdin");
        explanation.push_str(&format!("Input: {i}\n"));

        let o = self
            .output
            .as_ref()
            .and_then(|p| p.to_str())
            .unwrap_or("stdout");
        let f = match self.format {
            ExportFormat::Json => "json",
            ExportFormat::Pretty => "pretty",
        };
        explanation.push_str(&format!("Output: {f} to {o}\n"));

        explanation
    }
}
