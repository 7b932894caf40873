//! The `candc` driver.
//!
//! Runs the orchestrator on a root file, parses the flattened token
//! stream, and prints the CST to standard output. Any error aborts the
//! build with a non-zero status and a single diagnostic on standard
//! error; parse errors are rendered against the originating file's
//! text.

use std::path::PathBuf;
use std::process::ExitCode;

use ariadne::{Config, Label, Report, ReportKind, Source};
use clap::Parser;

use cand_build::{build, FlatSource};
use cand_parser::parse_tokens;

#[derive(Parser)]
#[command(name = "candc", version, about = "The C& compiler front-end")]
struct Cli {
    /// Root source file of the build (a `.cand` file).
    root: PathBuf,

    /// Print the flattened token stream as JSON instead of parsing.
    #[arg(long)]
    tokens: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let flat = build(&cli.root).map_err(|e| format!("error[build]: {e}"))?;

    if cli.tokens {
        return serde_json::to_string_pretty(&flat.tokens)
            .map_err(|e| format!("error[build]: {e}"));
    }

    match parse_tokens(&flat.tokens) {
        Ok(parse) => Ok(parse.debug_tree()),
        Err(err) => Err(render_parse_error(&flat, &err)),
    }
}

/// Render a parse error as an ariadne report against the file the
/// offending token came from. Errors without a usable file fall back
/// to a plain line.
fn render_parse_error(flat: &FlatSource, err: &cand_parser::ParseError) -> String {
    let Some(file) = flat.file(err.span.file) else {
        return format!("error[parse]: {err}");
    };

    let len = file.text.len();
    let start = (err.span.start as usize).min(len);
    let end = (err.span.end as usize).clamp(start, len);
    // Ariadne needs a non-empty span.
    let range = if start == end {
        start..(start + 1).min(len.max(1))
    } else {
        start..end
    };

    let mut buf = Vec::new();
    let report = Report::build(ReportKind::Error, range.clone())
        .with_message(err.kind.to_string())
        .with_config(Config::default().with_color(false))
        .with_label(Label::new(range).with_message(err.kind.to_string()))
        .finish();

    match report.write(Source::from(file.text.as_str()), &mut buf) {
        Ok(()) => format!(
            "error[parse]: {}:{}:{}\n{}",
            file.path.display(),
            err.span.line,
            err.span.col,
            String::from_utf8_lossy(&buf)
        ),
        Err(_) => format!("error[parse]: {err}"),
    }
}
