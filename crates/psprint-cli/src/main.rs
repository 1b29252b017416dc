//! `psprint` command: print text behind a styled mark.
//!
//! ```text
//! psprint -m warn "disk almost full"
//! psprint --mark 5 --short failed
//! psprint --pref otf --pref-color r --text-bgcol lg "on the fly"
//! psprint --list
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use psprint::{Call, MarkRef, MarkSpec, PrintSpace};
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(name = "psprint", version, about = "Print text behind a styled mark")]
struct Cli {
    /// Mark name or index
    #[arg(short, long, value_name = "NAME|INDEX")]
    mark: Option<String>,

    /// Pad prefixes so text lines up
    #[arg(long)]
    pad: bool,

    /// Use the one-character prefix
    #[arg(long)]
    short: bool,

    /// No colors or styles
    #[arg(long)]
    bland: bool,

    /// Print the text as is
    #[arg(long)]
    disabled: bool,

    /// Long prefix for this line
    #[arg(long)]
    pref: Option<String>,

    /// Short prefix for this line
    #[arg(long)]
    pref_s: Option<String>,

    #[arg(long, value_name = "COLOR")]
    pref_color: Option<String>,

    #[arg(long, value_name = "GLOSS")]
    pref_gloss: Option<String>,

    #[arg(long, value_name = "COLOR")]
    pref_bgcol: Option<String>,

    #[arg(long, value_name = "COLOR")]
    text_color: Option<String>,

    #[arg(long, value_name = "GLOSS")]
    text_gloss: Option<String>,

    #[arg(long, value_name = "COLOR")]
    text_bgcol: Option<String>,

    /// Extra configuration file, applied after the discovered ones
    #[arg(short, long, value_name = "PATH")]
    config: Vec<PathBuf>,

    /// Separator between TEXT arguments
    #[arg(long)]
    sep: Option<String>,

    /// List the available marks and exit
    #[arg(long)]
    list: bool,

    /// Log configuration loading to stderr
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    text: Vec<String>,
}

impl Cli {
    fn mark_ref(&self) -> MarkRef {
        match self.mark.as_deref() {
            None => MarkRef::None,
            Some(raw) => raw
                .parse::<i64>()
                .map_or_else(|_| MarkRef::from(raw), MarkRef::Index),
        }
    }

    fn style(&self) -> MarkSpec {
        MarkSpec {
            pref: self.pref.clone(),
            pref_s: self.pref_s.clone(),
            pref_color: self.pref_color.clone().map(Into::into),
            pref_gloss: self.pref_gloss.clone().map(Into::into),
            pref_bgcol: self.pref_bgcol.clone().map(Into::into),
            text_color: self.text_color.clone().map(Into::into),
            text_gloss: self.text_gloss.clone().map(Into::into),
            text_bgcol: self.text_bgcol.clone().map(Into::into),
        }
    }

    fn call(&self) -> Call {
        let mut call = Call::new().mark(self.mark_ref()).style(self.style());
        call.pad = self.pad.then_some(true);
        call.short = self.short.then_some(true);
        call.bland = self.bland.then_some(true);
        call.disabled = self.disabled.then_some(true);
        call.sep.clone_from(&self.sep);
        call
    }

    fn space(&self) -> Result<PrintSpace> {
        let mut space = PrintSpace::discover().context("failed to load psprint configuration")?;
        for path in &self.config {
            space
                .load_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
        }
        Ok(space)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let space = cli.space()?;
    if cli.list {
        println!("{}", space);
        return Ok(());
    }
    space.psprint(&cli.text, &cli.call())?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}
