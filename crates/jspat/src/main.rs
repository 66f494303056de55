//! `jspat` — inspect how JavaScript code templates parse.
//!
//! `jspat parse` prints the tree for a file, `jspat tokens` its token stream,
//! and `jspat superset` checks that enabling the capture extension leaves
//! ordinary code untouched.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jspat_core::ParserOptions;
use jspat_core::parser::ast::{Program, SourceType};
use jspat_core::parser::plugin::PluginSet;
use jspat_core::parser::scanner::{Scanner, Span};
use jspat_core::plugins::capture;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "jspat", version)]
#[command(about = "Parse JavaScript code templates with {{capture}} placeholders")]
struct Cli {
    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a file and print its syntax tree
    Parse {
        /// Source file, or `-` for stdin
        file: PathBuf,
        /// Parse with the module goal
        #[arg(long)]
        module: bool,
        /// Install a plugin by name (repeatable)
        #[arg(long = "plugin", value_name = "NAME")]
        plugins: Vec<String>,
        /// Print JSON instead of the debug form
        #[arg(long)]
        json: bool,
    },
    /// Print the token stream of a file
    Tokens {
        /// Source file, or `-` for stdin
        file: PathBuf,
        /// Install a plugin by name (repeatable)
        #[arg(long = "plugin", value_name = "NAME")]
        plugins: Vec<String>,
    },
    /// Check that the capture plugin changes no capture-free parse
    Superset {
        /// Files or directories to scan for `.js` / `.mjs` sources
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Parse with the module goal
        #[arg(long)]
        module: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("jspat=debug,jspat_core=debug"),
        _ => EnvFilter::new("jspat=trace,jspat_core=trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Run one subcommand.  `Ok(false)` means the input was rejected or a check
/// failed, as opposed to an I/O or usage error.
fn run(command: Command) -> Result<bool> {
    match command {
        Command::Parse {
            file,
            module,
            plugins,
            json,
        } => {
            let source = read_source(&file)?;
            let options = options(module, &plugins)?;
            match jspat_core::parse(&source, &options) {
                Ok(program) => {
                    println!("{}", render(&program, json)?);
                    Ok(true)
                }
                Err(err) => {
                    eprintln!("{}: {err}", file.display());
                    Ok(false)
                }
            }
        }
        Command::Tokens { file, plugins } => {
            let source = read_source(&file)?;
            let set = plugins
                .iter()
                .map(|name| jspat_core::plugins::lookup(name))
                .try_fold(PluginSet::default(), |set, plugin| {
                    plugin.map(|plugin| set.with_rc(plugin))
                })?;
            match Scanner::with_plugins(&source, set).collect_tokens() {
                Ok(tokens) => {
                    for token in tokens {
                        let Span { start, end } = token.span;
                        println!(
                            "{}:{}-{}:{}\t{:?}\t{}",
                            start.line,
                            start.column,
                            end.line,
                            end.column,
                            token.kind,
                            token.span.text(&source),
                        );
                    }
                    Ok(true)
                }
                Err(err) => {
                    eprintln!("{}: {err}", file.display());
                    Ok(false)
                }
            }
        }
        Command::Superset { paths, module } => {
            let mut files = Vec::new();
            for path in &paths {
                collect_sources(path, &mut files)?;
            }
            info!(count = files.len(), "checking sources");
            let mut regressions = 0usize;
            for file in &files {
                let source = fs::read_to_string(file)
                    .with_context(|| format!("reading {}", file.display()))?;
                match compare(&source, module)? {
                    Verdict::Same => debug!(file = %file.display(), "same"),
                    Verdict::Invalid => {
                        println!("{}: not valid JavaScript, skipped", file.display());
                    }
                    Verdict::CaptureSyntax => {
                        println!("{}: capture syntax present", file.display());
                    }
                    Verdict::Differs => {
                        regressions += 1;
                        println!("{}: parse differs with capture plugin", file.display());
                    }
                }
            }
            if regressions > 0 {
                warn!(regressions, "capture plugin changed ordinary parses");
            }
            Ok(regressions == 0)
        }
    }
}

fn options(module: bool, plugins: &[String]) -> Result<ParserOptions> {
    let source_type = if module {
        SourceType::Module
    } else {
        SourceType::Script
    };
    let names: Vec<&str> = plugins.iter().map(String::as_str).collect();
    Ok(ParserOptions::default()
        .with_source_type(source_type)
        .with_plugin_names(&names)?)
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("reading stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn render(program: &Program, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(program)?);
    }
    Ok(format!("{program:#?}"))
}

/// Gather `.js` / `.mjs` files under `path`, in a stable order.
fn collect_sources(path: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    if path.is_file() {
        out.push(path.to_path_buf());
        return Ok(());
    }
    let mut entries = fs::read_dir(path)
        .with_context(|| format!("reading directory {}", path.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();
    for entry in entries {
        if entry.is_dir() {
            collect_sources(&entry, out)?;
        } else if matches!(
            entry.extension().and_then(|e| e.to_str()),
            Some("js" | "mjs")
        ) {
            out.push(entry);
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Same,
    /// The base grammar rejects the file.
    Invalid,
    CaptureSyntax,
    Differs,
}

/// Parse `source` with and without the capture plugin.  Source the base
/// grammar accepts must produce the same tree both times; source it rejects
/// is not checked.
fn compare(source: &str, module: bool) -> Result<Verdict> {
    if source.contains("{{") {
        return Ok(Verdict::CaptureSyntax);
    }
    let Ok(plain) = jspat_core::parse(source, &options(module, &[])?) else {
        return Ok(Verdict::Invalid);
    };
    let extended = jspat_core::parse(source, &options(module, &[capture::NAME.to_string()])?);
    Ok(match extended {
        Ok(extended) if format!("{plain:?}") == format!("{extended:?}") => Verdict::Same,
        _ => Verdict::Differs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_plain_code() {
        assert_eq!(compare("a = {}; { {} }", false).unwrap(), Verdict::Same);
        assert_eq!(compare("var yield = 1; yield;", false).unwrap(), Verdict::Same);
        assert_eq!(compare("let x = ;", false).unwrap(), Verdict::Invalid);
    }

    #[test]
    fn test_compare_reports_capture_syntax() {
        assert_eq!(compare("f({{x}})", false).unwrap(), Verdict::CaptureSyntax);
    }

    #[test]
    fn test_options_reject_unknown_plugin() {
        let err = options(false, &["typescript".into()]).unwrap_err();
        assert_eq!(err.to_string(), "unknown parser plugin 'typescript'");
    }

    #[test]
    fn test_render_json_has_capture_fields() {
        let options = options(false, &["capture".into()]).unwrap();
        let program = jspat_core::parse("{{x}};", &options).unwrap();
        let json = render(&program, true).unwrap();
        assert!(json.contains(r#""name": "x""#));
        assert!(json.contains(r#""is_list_capture": false"#));
    }

    #[test]
    fn test_cli_parses_repeated_plugins() {
        let cli = Cli::try_parse_from(["jspat", "parse", "-", "--plugin", "capture", "--json"]).unwrap();
        let Command::Parse { plugins, json, .. } = cli.command else {
            panic!("expected parse");
        };
        assert_eq!(plugins, vec!["capture"]);
        assert!(json);
    }
}
