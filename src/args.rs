use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments parser
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the Java Edition world to render (required unless stitching or precaching)
    #[arg(long, env = "ANVILMAP_WORLD")]
    pub world: Option<PathBuf>,

    /// Directory that receives the rendered region tiles and the map (optional)
    #[arg(long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Path to a render config JSON file (optional)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only render regions whose tile is missing, then patch the map (optional)
    #[arg(long)]
    pub incremental: bool,

    /// Keep running and re-render regions as the game saves them (optional)
    #[arg(long)]
    pub watch: bool,

    /// Skip rendering and only stitch existing tiles into the map (optional)
    #[arg(long)]
    pub stitch_only: bool,

    /// Build the texture color cache from a directory of block textures (optional)
    #[arg(long, value_name = "DIR")]
    pub precache_textures: Option<PathBuf>,
}

/// Validates CLI arguments after parsing.
/// Rendering and watching need an existing world with a `region/` directory;
/// `--stitch-only` and `--precache-textures` run without one.
pub fn validate_args(args: &Args) -> Result<(), String> {
    if args.precache_textures.is_some() {
        if args.watch || args.stitch_only || args.incremental {
            return Err("--precache-textures cannot be combined with other modes.".to_string());
        }
        return Ok(());
    }

    if args.stitch_only {
        if args.watch {
            return Err("--stitch-only and --watch are mutually exclusive.".to_string());
        }
        return Ok(());
    }

    match &args.world {
        None => Err(
            "The --world argument is required. Provide the path to a Java Edition world."
                .to_string(),
        ),
        Some(world) => {
            if !world.exists() {
                return Err(format!("World path does not exist: {}", world.display()));
            }
            if !world.is_dir() {
                return Err(format!("World path is not a directory: {}", world.display()));
            }
            let region_dir = world.join("region");
            if !region_dir.is_dir() {
                return Err(format!(
                    "No region directory found at {}. Is this a Java Edition world?",
                    region_dir.display()
                ));
            }
            Ok(())
        }
    }
}
