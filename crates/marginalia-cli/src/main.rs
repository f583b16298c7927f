use anyhow::{Context, Result, bail};
use marginalia_config::Config;
use marginalia_engine::{
    EditorState, Highlight, HighlightKind, Redraw, TextRange, add_highlight, io,
    redraw_highlights,
};
use relative_path::RelativePathBuf;
use std::path::{Path, PathBuf};
use std::{env, process};

const USAGE: &str = "Usage: marginalia-cli [document.toml] [comment|annotate <range> <message>]";

/// A highlight to store before rendering
struct NewHighlight {
    kind: HighlightKind,
    range: TextRange,
    message: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config_path = Config::config_path();
    let config = Config::load_or_default()
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let args: Vec<String> = env::args().skip(1).collect();
    let (document_path, new_highlight) = match parse_args(&args, &config) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            eprintln!(
                "Or set document_path in the config file at {}",
                config_path.display()
            );
            process::exit(1);
        }
    };

    let (root, relative) = split_document_path(&document_path)?;
    let mut state = io::load_document(&relative, &root)
        .with_context(|| format!("Failed to load {}", document_path.display()))?
        .with_undo_limit(config.undo_limit);

    if let Some(new) = new_highlight {
        let highlight = Highlight::new(
            new.kind,
            config.author.clone().unwrap_or_else(|| "anonymous".to_string()),
            config.email.clone().unwrap_or_default(),
            new.message,
        );
        state = add_highlight(&state, new.range, highlight)?;
        io::save_document(&relative, &root, &state)?;
    }

    let redraw = redraw_highlights(&state)?;
    print_document(&redraw);
    Ok(())
}

fn parse_args(args: &[String], config: &Config) -> Result<(PathBuf, Option<NewHighlight>)> {
    let (path, rest) = match args {
        [] => (None, args),
        [first, rest @ ..] if !is_highlight_command(first) => (Some(PathBuf::from(first)), rest),
        _ => (None, args),
    };

    let document_path = match path.or_else(|| config.document_path.clone()) {
        Some(path) => path,
        None => bail!("No document path provided and none configured"),
    };
    log::info!("Using document {}", document_path.display());

    let new_highlight = match rest {
        [] => None,
        [command, range, message] => {
            let kind = match command.as_str() {
                "comment" => HighlightKind::Comment,
                "annotate" => HighlightKind::Annotation,
                other => bail!("Unknown command '{other}'"),
            };
            let range: TextRange = range.parse()?;
            Some(NewHighlight {
                kind,
                range,
                message: message.clone(),
            })
        }
        _ => bail!("Expected: comment|annotate <range> <message>"),
    };

    Ok((document_path, new_highlight))
}

fn is_highlight_command(arg: &str) -> bool {
    matches!(arg, "comment" | "annotate")
}

/// Split a document path into the directory it lives in and its file name
fn split_document_path(path: &Path) -> Result<(PathBuf, RelativePathBuf)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("{} is not a file path", path.display()))?;
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((root, RelativePathBuf::from(file_name.to_string_lossy().into_owned())))
}

fn print_document(redraw: &Redraw) {
    let state: &EditorState = &redraw.state;
    for block in state.content().blocks() {
        println!("{}", block.key());
        for run in block.style_runs() {
            let text = block.slice(run.range.clone());
            if run.styles.is_empty() {
                println!("  {text:?}");
            } else {
                let styles: Vec<&str> = run.styles.iter().map(|style| style.name()).collect();
                println!("  {text:?} [{}]", styles.join(", "));
            }
        }
    }

    match &redraw.active {
        Some(active) => {
            let highlight = &active.highlight;
            println!();
            println!("Active {} on {}", highlight.kind, active.range);
            println!("  {} <{}>: {}", highlight.author, highlight.email, highlight.message);
        }
        None => log::info!("No highlight under the cursor"),
    }
}
