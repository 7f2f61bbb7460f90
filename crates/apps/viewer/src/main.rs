mod app;
mod cli;
mod config;
mod content;
mod host;
mod script;

use anyhow::Context;
use clap::Parser;
use formats::{AssetPackage, HierarchyDocument};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::app::{FrameLoop, GlobeApp};
use crate::cli::Args;
use crate::config::ViewerConfig;
use crate::content::ContentSlot;
use crate::script::InputScript;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if args.seed.is_some() {
        config.sparks.seed = args.seed;
        config.notes.seed = args.seed;
    }

    let document = match &args.hierarchy {
        Some(path) => HierarchyDocument::load(path)?,
        None => AssetPackage::load(&args.assets)?.hierarchy().clone(),
    };
    let hierarchy = document
        .build(config.globe.radius)
        .context("building node hierarchy")?;
    info!(nodes = hierarchy.len(), "hierarchy ready");

    let projects = args
        .projects
        .clone()
        .unwrap_or_else(|| args.assets.join(formats::PROJECTS_FILE_NAME));
    let about = args
        .about
        .clone()
        .unwrap_or_else(|| args.assets.join(formats::ABOUT_FILE_NAME));
    let mut content = ContentSlot::spawn(projects, about);
    if args.wait_content {
        content.wait();
    }
    if content.is_pending() {
        info!("content still loading; overlays stay empty until it lands");
    }

    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::entrance_only(),
    };
    info!(steps = script.len(), frames = args.frames, "starting frame loop");

    let app = GlobeApp::new(&config, hierarchy, content);
    let mut frames = FrameLoop::new(app, script, args.dt, args.strict);
    frames.run(args.frames)?;

    frames.app().metrics().log_summary();
    let dropped = frames.app().events().dropped();
    for event in frames.app_mut().drain_events() {
        debug!(frame = event.frame_index, payload = ?event.payload, "event");
    }
    if dropped > 0 {
        debug!(dropped, "older events were not kept");
    }
    Ok(())
}
