use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless memory globe driver")]
pub struct Args {
    /// Viewer config file (JSON). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding hierarchy.json, projects.json and about.json
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Hierarchy document, overriding the one in --assets
    #[arg(long)]
    pub hierarchy: Option<PathBuf>,

    /// Project cards document, overriding the one in --assets
    #[arg(long)]
    pub projects: Option<PathBuf>,

    /// About document, overriding the one in --assets
    #[arg(long)]
    pub about: Option<PathBuf>,

    /// Input script to play back. Without one the viewer only flies in.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f64,

    /// Fixed particle seed (sparks and notes) for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Block until content has loaded before the first frame
    #[arg(long)]
    pub wait_content: bool,

    /// Stop on the first rejected intent
    #[arg(long)]
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "viewer", "--frames", "10", "--seed", "4", "--strict", "--script", "s.json",
        ])
        .expect("parse");
        assert_eq!(args.frames, 10);
        assert_eq!(args.seed, Some(4));
        assert!(args.strict);
        assert!(!args.wait_content);
        assert_eq!(args.script, Some(PathBuf::from("s.json")));
        assert_eq!(args.assets, PathBuf::from("assets"));
    }
}
