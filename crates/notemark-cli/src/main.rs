use std::{env, fs, path::PathBuf, process};

use anyhow::{Context, Result};
use notemark_config::Config;
use notemark_engine::markup::outline::outline;
use notemark_engine::{TitleIndex, io, parse_note};
use tracing::debug;

mod render;

const USAGE: &str = "usage: notemark [--outline] [NOTE]

NOTE is a note identifier under the configured notes directory, or a path
to a note file. With no NOTE, the configured default_note is opened.
--outline prints the parsed tree instead of HTML.";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut want_outline = false;
    let mut target: Option<String> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--outline" => want_outline = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                return Ok(());
            }
            other if other.starts_with('-') => {
                eprintln!("unknown option: {other}\n{USAGE}");
                process::exit(2);
            }
            other => target = Some(other.to_string()),
        }
    }

    let (text, resolver) = load(target.as_deref())?;
    let doc = parse_note(&text, &resolver).context("parsing note")?;

    if want_outline {
        print!("{}", outline(&doc));
    } else {
        print!("{}", render::to_html(&doc));
    }
    Ok(())
}

/// Fetch the note text and build the title index it resolves against.
fn load(target: Option<&str>) -> Result<(String, TitleIndex)> {
    // A direct file path bypasses config and identifier lookup; sibling
    // notes still feed the title index so cross-references resolve.
    if let Some(t) = target {
        let path = PathBuf::from(t);
        if path.is_file() {
            let text =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            let resolver = match path.parent() {
                Some(dir) if dir.as_os_str().is_empty() => io::build_title_index(&PathBuf::from(".")),
                Some(dir) => io::build_title_index(dir),
                None => Ok(TitleIndex::new()),
            }
            .unwrap_or_else(|e| {
                debug!("no title index: {e}");
                TitleIndex::new()
            });
            return Ok((text, resolver));
        }
    }

    let config = Config::load()
        .context("reading config")?
        .context("no config file; create ~/.config/notemark/config.toml with a notes_path")?;
    let id = target
        .map(str::to_string)
        .or_else(|| config.default_note.clone())
        .context("no note given and no default_note configured")?;
    debug!("opening note {id} from {}", config.notes_path.display());

    let resolver = io::build_title_index(&config.notes_path)?;
    let text = io::read_note(&id, &config.notes_path)?;
    Ok((text, resolver))
}
