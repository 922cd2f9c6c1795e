//! Renders top-down shaded maps from Minecraft Java Edition region files.

mod args;
mod blend;
mod block_colors;
mod colors;
mod column_map;
mod config;
mod nbt;
mod palette;
mod precache;
mod region;
mod renderer;
mod stitch;
#[cfg(test)]
mod test_utilities;
mod watch;
mod worker_pool;

use args::{validate_args, Args};
use clap::Parser;
use colored::*;
use flate2::read::GzDecoder;
use nbt::Tag;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};
use worker_pool::{run_worker_pool, Task, WorkerInit};

fn print_banner() {
    let version: &str = env!("CARGO_PKG_VERSION");
    let repository: &str = env!("CARGO_PKG_REPOSITORY");
    println!(
        r#"
     █████╗ ███╗   ██╗██╗   ██╗██╗██╗     ███╗   ███╗ █████╗ ██████╗
    ██╔══██╗████╗  ██║██║   ██║██║██║     ████╗ ████║██╔══██╗██╔══██╗
    ███████║██╔██╗ ██║██║   ██║██║██║     ██╔████╔██║███████║██████╔╝
    ██╔══██║██║╚██╗██║╚██╗ ██╔╝██║██║     ██║╚██╔╝██║██╔══██║██╔═══╝
    ██║  ██║██║ ╚████║ ╚████╔╝ ██║███████╗██║ ╚═╝ ██║██║  ██║██║
    ╚═╝  ╚═╝╚═╝  ╚═══╝  ╚═══╝  ╚═╝╚══════╝╚═╝     ╚═╝╚═╝  ╚═╝╚═╝

                          version {}
                {}
        "#,
        version,
        repository.bright_white().bold()
    );
}

fn main() {
    env_logger::init();
    let args: Args = Args::parse();
    print_banner();

    if let Err(e) = validate_args(&args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
    if let Err(e) = run(&args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let project_root: PathBuf =
        env::current_dir().map_err(|e| format!("Failed to resolve the working directory: {e}"))?;
    let cache_path = project_root.join(renderer::TEXTURE_CACHE_FILE);

    if let Some(assets_dir) = &args.precache_textures {
        precache::build_texture_cache(assets_dir, &cache_path)?;
        return Ok(());
    }

    let map_path = args.out_dir.join(stitch::MAP_FILE);
    if args.stitch_only {
        return stitch::stitch_images(&args.out_dir, &map_path, None);
    }

    // validate_args already required a world for the remaining modes
    let Some(world) = &args.world else {
        return Err("The --world argument is required.".to_string());
    };

    if !cache_path.exists() {
        return Err(format!(
            "No texture cache found at {}. Run with --precache-textures <DIR> first.",
            cache_path.display()
        ));
    }
    let texture_cache = renderer::load_texture_cache(&cache_path)?;

    inspect_world(world);

    let config = config::load(args.config.as_deref())?;
    let init = WorkerInit {
        out_dir: args.out_dir.clone(),
        config,
        texture_cache: Arc::new(texture_cache),
    };

    if args.watch {
        render_world(world, &map_path, &init, args.incremental)?;
        return watch::watch_world(world, &map_path, &init);
    }
    render_world(world, &map_path, &init, args.incremental)
}

/// Prints the world's DataVersion and warns when the world looks open in the
/// game. Neither stops the render.
fn inspect_world(world: &Path) {
    match read_data_version(&world.join("level.dat")) {
        Ok(Some(version)) => println!("Found level.dat. DataVersion: {version}"),
        Ok(None) => println!("{}", "! level.dat has no DataVersion field.".yellow()),
        Err(e) => println!("{}", format!("! Could not read level.dat: {e}").yellow()),
    }

    let session_lock = world.join("session.lock");
    if session_lock.exists() {
        if let Ok(file) = fs::File::open(&session_lock) {
            if fs2::FileExt::try_lock_shared(&file).is_err() {
                println!(
                    "{}",
                    "! The world is currently open in the game. Region files may change while rendering."
                        .yellow()
                );
            } else {
                let _ = fs2::FileExt::unlock(&file);
            }
        }
    }
}

fn read_data_version(path: &Path) -> Result<Option<i64>, String> {
    let file = fs::File::open(path).map_err(|e| e.to_string())?;
    let mut decoder = GzDecoder::new(file);
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| format!("Failed to decompress level.dat: {e}"))?;
    let root = nbt::decode(&bytes).map_err(|e| format!("Failed to parse level.dat: {e}"))?;
    Ok(root
        .get("Data")
        .and_then(|data| data.get("DataVersion"))
        .and_then(Tag::as_int))
}

fn collect_tasks(region_dir: &Path) -> Result<Vec<Task>, String> {
    let entries = fs::read_dir(region_dir)
        .map_err(|e| format!("Failed to read {}: {}", region_dir.display(), e))?;
    let mut tasks = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {e}"))?;
        if let Some(task) = Task::from_region_file(&entry.path()) {
            tasks.push(task);
        }
    }
    tasks.sort_by_key(|task| (task.region_x, task.region_z));
    Ok(tasks)
}

fn tile_name(task: &Task) -> String {
    format!("r.{}.{}.png", task.region_x, task.region_z)
}

fn render_world(
    world: &Path,
    map_path: &Path,
    init: &WorkerInit,
    incremental: bool,
) -> Result<(), String> {
    println!("{} Scanning region files...", "[1/3]".bold());
    let mut tasks = collect_tasks(&world.join("region"))?;

    if incremental {
        let total = tasks.len();
        tasks.retain(|task| !init.out_dir.join(tile_name(task)).exists());
        println!(
            "{}",
            format!(
                "Incremental mode: {} of {} regions need rendering.",
                tasks.len(),
                total
            )
            .cyan()
        );
    } else if init.out_dir.exists() {
        println!("{}", "Performing a full render...".cyan());
        fs::remove_dir_all(&init.out_dir)
            .map_err(|e| format!("Failed to clear {}: {}", init.out_dir.display(), e))?;
    }
    fs::create_dir_all(&init.out_dir)
        .map_err(|e| format!("Failed to create {}: {}", init.out_dir.display(), e))?;

    println!("{} Rendering {} regions...", "[2/3]".bold(), tasks.len());
    let done = if tasks.is_empty() {
        println!("{}", "✓ No new regions to process.".green());
        Vec::new()
    } else {
        run_worker_pool(tasks, init)?
    };

    if incremental && done.is_empty() && map_path.exists() {
        return Ok(());
    }
    println!("{} Stitching the map...", "[3/3]".bold());
    if incremental {
        let updated: Vec<String> = done.iter().map(tile_name).collect();
        stitch::stitch_images(&init.out_dir, map_path, Some(&updated))
    } else {
        stitch::stitch_images(&init.out_dir, map_path, None)
    }
}
