//! Command-line interface for namecheck.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::check::{ModelSummary, RunContext};
use crate::config::{self, CliPatterns, ConfigSource};
use crate::model::{self, DumpFile};
use crate::report::{AnyReporter, JsonReporter, Reporter, TextReporter};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Naming convention checker for cppcheck dump files.
///
/// Run `cppcheck --dump` first, then pass the resulting `.dump` files (or
/// directories containing them). Example: variables must start lowercase,
/// functions uppercase:
///
///   namecheck --var='[a-z].*' --function='[A-Z].*' src/*.dump
#[derive(Parser, Debug)]
#[command(name = "namecheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dump files or directories to check; files without a .dump extension are ignored
    pub paths: Vec<PathBuf>,

    /// Pattern for local variable names
    #[arg(long, value_name = "REGEX")]
    pub var: Option<String>,

    /// Pattern for public and protected member variable names
    #[arg(long, value_name = "REGEX")]
    pub memvar: Option<String>,

    /// Pattern for global and namespace variable names
    #[arg(long, value_name = "REGEX")]
    pub gvar: Option<String>,

    /// Pattern for class names
    #[arg(long, value_name = "REGEX")]
    pub class: Option<String>,

    /// Pattern for constant names (private constants excluded)
    #[arg(long = "const", value_name = "REGEX")]
    pub constant: Option<String>,

    /// Pattern for private member variable names
    #[arg(long, value_name = "REGEX")]
    pub private_member_variable: Option<String>,

    /// Pattern for function names
    #[arg(long, value_name = "REGEX")]
    pub function: Option<String>,

    /// JSON configuration file; replaces every pattern flag above
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Emit findings as JSON lines on stdout (cppcheck addon protocol)
    #[arg(long)]
    pub cli: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Pattern flags as given on the command line.
    pub fn patterns(&self) -> CliPatterns {
        CliPatterns {
            var: self.var.clone(),
            memvar: self.memvar.clone(),
            gvar: self.gvar.clone(),
            class: self.class.clone(),
            constant: self.constant.clone(),
            private_member_variable: self.private_member_variable.clone(),
            function: self.function.clone(),
        }
    }
}

/// Collect dump files from the given paths, walking directories.
pub fn collect_dump_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
            {
                let entry = entry?;
                if entry.file_type().is_file() && model::is_dump_file(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if model::is_dump_file(path) {
            files.push(path.clone());
        } else {
            tracing::debug!(path = %path.display(), "not a dump file, ignoring");
        }
    }

    Ok(files)
}

/// Run a check over all inputs and return the process exit code.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    // Resolve policy before touching any input
    let (policy, source) = match config::resolve(cli.patterns(), cli.json.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    match &source {
        ConfigSource::Json(path) => {
            tracing::debug!(path = %path.display(), "using JSON configuration")
        }
        ConfigSource::CommandLine => tracing::debug!("using command-line patterns"),
    }
    if policy.is_empty() {
        tracing::warn!("no naming pattern configured, nothing will be reported");
    }

    let files = collect_dump_files(&cli.paths)?;
    if files.is_empty() {
        tracing::warn!("no dump files to check");
        return Ok(EXIT_SUCCESS);
    }

    let out: Box<dyn Write> = if cli.cli {
        Box::new(std::io::stdout())
    } else {
        Box::new(std::io::stderr())
    };
    let reporter = if cli.cli {
        AnyReporter::Json(JsonReporter::new(out))
    } else {
        AnyReporter::Text(TextReporter::new(out))
    };

    let mut ctx = RunContext::new(policy, reporter);
    let summary = check_files(&mut ctx, &files)?;
    tracing::debug!(
        files = files.len(),
        symbols = summary.symbols,
        forwarded = summary.forwarded,
        "run complete"
    );

    if ctx.any_reported() {
        Ok(EXIT_FINDINGS)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Load and check each dump file in order.
pub fn check_files<R: Reporter>(
    ctx: &mut RunContext<R>,
    files: &[PathBuf],
) -> anyhow::Result<ModelSummary> {
    let mut summary = ModelSummary::default();
    for file in files {
        summary.merge(check_file(ctx, file)?);
    }
    Ok(summary)
}

fn check_file<R: Reporter>(ctx: &mut RunContext<R>, file: &Path) -> anyhow::Result<ModelSummary> {
    tracing::debug!(path = %file.display(), "checking dump file");
    let dump = DumpFile::parse_file(file)
        .with_context(|| format!("loading dump file {}", file.display()))?;
    let summary = ctx
        .check_dump(&dump)
        .with_context(|| format!("checking {}", file.display()))?;
    Ok(summary)
}
