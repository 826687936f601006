mod position;

use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use position::Position;
use tidal_db::{Diagnostic, File, LineIndex, TextRange, TextSize};
use tidal_errors::Renderer;
use tidal_ide::{Analysis, FilePosition};
use tidal_parse::Parse;
use tidal_tokenizer::tokenize;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "tidal", about = "Inspect tidal source files")]
struct Options {
    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// When to colour diagnostics
    #[arg(long, value_enum, default_value_t = Color::Auto, global = true)]
    color: Color,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report lexical and syntax errors
    Check {
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,
    },
    /// Print every token with its range
    Tokens { path: Utf8PathBuf },
    /// Print the syntax tree
    Tree { path: Utf8PathBuf },
    /// Find the declaration a reference resolves to
    Resolve {
        path: Utf8PathBuf,
        /// Byte offset, or 1-based `line:column`
        position: Position,
    },
    /// Rename a declaration and its references
    Rename {
        path: Utf8PathBuf,
        /// Byte offset, or 1-based `line:column`
        position: Position,
        new_name: String,
        /// Overwrite the file instead of printing the result
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Color {
    Auto,
    Always,
    Never,
}

fn main() -> anyhow::Result<ExitCode> {
    let options = Options::parse();
    init_logging(options.verbose);

    let renderer = match options.color {
        Color::Always => Renderer::styled(),
        Color::Auto if std::io::stderr().is_terminal() => Renderer::styled(),
        Color::Auto | Color::Never => Renderer::plain(),
    };

    match options.command {
        Command::Check { paths } => {
            let analysis = Analysis::default();
            let mut errors = 0;

            for path in paths {
                let text = read(&path)?;
                let file = analysis.add_file(path, text);
                let diagnostics = tidal_db::diagnostics(analysis.db(), file);
                errors += diagnostics.len();
                tracing::debug!(path = %file.path(analysis.db()), errors = diagnostics.len(), "checked");
                report(&renderer, file.path(analysis.db()), file.text(analysis.db()), &diagnostics);
            }

            if errors == 0 {
                return Ok(ExitCode::SUCCESS);
            }
            eprintln!("found {errors} error{}", if errors == 1 { "" } else { "s" });
            Ok(ExitCode::FAILURE)
        }
        Command::Tokens { path } => {
            let text = read(&path)?;
            for token in tokenize(&text) {
                println!("{:?}@{:?} {:?}", token.kind, token.range, token.text(&text));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Tree { path } => {
            let text = read(&path)?;
            let parse = tidal_parse::parse(&text);
            print!("{}", parse.tree().debug_dump());
            Ok(exit_code(&renderer, &path, &text, &parse))
        }
        Command::Resolve { path, position } => {
            let analysis = Analysis::default();
            let file_position = load(&analysis, path, position)?;
            let file = file_position.file;
            let line_index = file.line_index(analysis.db());

            let (reference, declaration) = analysis
                .goto_definition(file_position)
                .with_context(|| format!("no resolvable reference at {position}"))?;
            let text = file.text(analysis.db());
            println!(
                "`{}` at {} -> {}",
                &text[reference],
                describe(line_index, reference),
                describe(line_index, declaration)
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Rename { path, position, new_name, write } => {
            let analysis = Analysis::default();
            let file_position = load(&analysis, path.clone(), position)?;
            let renamed = analysis.rename(file_position, &new_name)?;

            if write {
                std::fs::write(&path, renamed).with_context(|| format!("failed to write `{path}`"))?;
            } else {
                print!("{renamed}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))
}

fn load(analysis: &Analysis, path: Utf8PathBuf, position: Position) -> anyhow::Result<FilePosition> {
    let text = read(&path)?;
    let file: File = analysis.add_file(path, text);
    let db = analysis.db();

    let offset = position
        .to_offset(file.line_index(db), TextSize::of(file.text(db)))
        .with_context(|| format!("position {position} is outside of `{}`", file.path(db)))?;
    Ok(FilePosition { file, offset })
}

fn report(renderer: &Renderer, path: &Utf8Path, text: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.render(renderer, path.as_str(), text));
    }
}

fn exit_code(renderer: &Renderer, path: &Utf8Path, text: &str, parse: &Parse) -> ExitCode {
    report(renderer, path, text, parse.diagnostics());
    if parse.diagnostics().is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn describe(line_index: &LineIndex, range: TextRange) -> String {
    let start = line_index.line_col(range.start());
    format!("{}:{}", start.line + 1, start.col + 1)
}
