//! Re-renders regions as the game saves them.
//!
//! Region files are rewritten in bursts while a world is open, so changes
//! are debounced: the first change of a batch starts a drain tick, and
//! everything that lands before the tick fires renders together.

use colored::Colorize;
use fnv::FnvHashMap;
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::stitch::stitch_images;
use crate::worker_pool::{run_worker_pool, Task, WorkerInit};

/// Queues a changed file, returning its name the first time it lands in the
/// current batch. Files that are not region files queue nothing.
fn enqueue(queue: &mut FnvHashMap<PathBuf, Task>, path: &Path) -> Option<String> {
    let task = Task::from_region_file(path)?;
    let name = path.file_name()?.to_string_lossy().into_owned();
    match queue.insert(task.file_path.clone(), task) {
        Some(_) => None,
        None => Some(name),
    }
}

fn render_batch(tasks: Vec<Task>, map_path: &Path, init: &WorkerInit) {
    match run_worker_pool(tasks, init) {
        Ok(done) if !done.is_empty() => {
            println!("{}", "Stitching updated images...".cyan());
            let updated: Vec<String> = done
                .iter()
                .map(|task| format!("r.{}.{}.png", task.region_x, task.region_z))
                .collect();
            if let Err(e) = stitch_images(&init.out_dir, map_path, Some(&updated)) {
                log::error!("stitching failed: {e}");
            }
        }
        Ok(_) => {
            println!(
                "{}",
                "! No tasks were successfully processed in this batch.".yellow()
            );
        }
        Err(e) => log::error!("batch render failed: {e}"),
    }
}

/// Watches the world's `region/` directory and re-renders changed regions
/// until the process is interrupted.
pub fn watch_world(world_dir: &Path, map_path: &Path, init: &WorkerInit) -> Result<(), String> {
    let (sender, receiver) = mpsc::channel::<PathBuf>();
    let mut watcher = notify::recommended_watcher(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                match event.kind {
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Any => {
                        for path in event.paths {
                            if path.extension().and_then(|e| e.to_str()) == Some("mca") {
                                let _ = sender.send(path);
                            }
                        }
                    }
                    _ => {}
                }
            }
        },
    )
    .map_err(|e| format!("Failed to create the file watcher: {e}"))?;

    let region_dir = world_dir.join("region");
    watcher
        .watch(&region_dir, RecursiveMode::NonRecursive)
        .map_err(|e| format!("Failed to watch {}: {}", region_dir.display(), e))?;

    println!(
        "{}",
        format!(
            "Watching {} for changes. Press Ctrl+C to stop.",
            region_dir.display()
        )
        .cyan()
    );

    let debounce = Duration::from_secs(init.config.watch_debounce_seconds.max(1));
    loop {
        let tasks = next_batch(&receiver, debounce)?;
        render_batch(tasks, map_path, init);
        println!("\n{}", "Watching for changes...".cyan());
    }
}

/// Collects changed regions until the next drain tick and returns them sorted
/// by coordinates. The tick is anchored to the first change of the batch;
/// later changes inside the window join it without pushing the tick back, so
/// a steady stream of saves still renders every `debounce`.
fn next_batch(
    receiver: &mpsc::Receiver<PathBuf>,
    debounce: Duration,
) -> Result<Vec<Task>, String> {
    let mut queue: FnvHashMap<PathBuf, Task> = FnvHashMap::default();
    let mut deadline = Instant::now();
    loop {
        if queue.is_empty() {
            let path = receiver
                .recv()
                .map_err(|_| "The file watcher stopped unexpectedly.".to_string())?;
            if let Some(name) = enqueue(&mut queue, &path) {
                println!("{}", format!("! Change detected: {name}").yellow());
                deadline = Instant::now() + debounce;
            }
            continue;
        }
        match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(path) => {
                if let Some(name) = enqueue(&mut queue, &path) {
                    println!("{}", format!("! Change detected: {name}").yellow());
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let mut tasks: Vec<Task> = queue.drain().map(|(_, task)| task).collect();
                tasks.sort_by_key(|task| (task.region_x, task.region_z));
                return Ok(tasks);
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err("The file watcher stopped unexpectedly.".to_string());
            }
        }
    }
}
