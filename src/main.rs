use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use dock::config::load_config;
use dock::feed::Dock;
use dock::sources::desktop::DesktopCatalog;
use dock::sources::pins::MemoryPinStore;
use dock::state::LauncherList;
use dock::ui::render::JsonPrinter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read events from this file instead of stdin
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Launcher to pin at startup; replaces the configured list
    #[arg(short, long = "pin")]
    pin: Vec<String>,

    /// Print the whole list before handling any event
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // 1. Load Config
    let config = load_config(args.config.as_deref()).context("load config")?;
    let seed = if args.pin.is_empty() {
        config.launcher.pinned.clone()
    } else {
        args.pin.clone()
    };

    // 2. Build the list
    let catalog = DesktopCatalog::new(&config.apps);
    info!("Dock: {} configured apps, {} pinned launchers", catalog.len(), seed.len());
    let list = LauncherList::new(&seed, catalog, MemoryPinStore::new(&seed));
    let mut dock = Dock::new(list, JsonPrinter::stdout());
    if args.dump {
        dock.dump();
    }

    // 3. Feed events through the loop that owns the list
    let source: Box<dyn Read + Send> = match &args.events {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(io::stdin()),
    };
    dock.run(source).context("run event feed")?;

    Ok(())
}
