//! Spreads region rendering across a pool of worker threads.
//!
//! Each worker owns a [`RegionRenderer`] so name tables and texture lookups
//! are reused across every region file the worker touches. The manager hands
//! out one task at a time and reports progress on a single bar.

use colored::Colorize;
use fnv::FnvHashMap;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::colors::Color;
use crate::config::RenderConfig;
use crate::region;
use crate::renderer::{RegionRenderer, RegionStatus};

/// One region file to render, with its coordinates parsed from the name.
#[derive(Debug, Clone)]
pub struct Task {
    pub file_path: PathBuf,
    pub region_x: i32,
    pub region_z: i32,
}

impl Task {
    pub fn from_region_file(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let (region_x, region_z) = region::parse_region_name(name, ".mca")?;
        Some(Self {
            file_path: path.to_path_buf(),
            region_x,
            region_z,
        })
    }
}

/// Everything a worker needs before it can accept tasks. The texture cache
/// is parsed once up front and shared across the pool.
#[derive(Debug, Clone)]
pub struct WorkerInit {
    pub out_dir: PathBuf,
    pub config: RenderConfig,
    pub texture_cache: Arc<FnvHashMap<String, Color>>,
}

enum ManagerMessage {
    Init(Box<WorkerInit>),
    Task(Task),
    Exit,
}

enum WorkerMessage {
    Ready,
    Done(Task),
    Skip { file: PathBuf },
    Error { file: PathBuf, message: Option<String> },
}

fn file_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

/// Formats whole seconds as HH:MM:SS.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = seconds % 3600 / 60;
    let seconds = seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn worker_loop(
    index: usize,
    receiver: &Receiver<ManagerMessage>,
    sender: &Sender<(usize, WorkerMessage)>,
) {
    let mut processor: Option<RegionRenderer> = None;
    while let Ok(message) = receiver.recv() {
        match message {
            ManagerMessage::Init(init) => {
                processor = Some(RegionRenderer::new(&init));
                if sender.send((index, WorkerMessage::Ready)).is_err() {
                    break;
                }
            }
            ManagerMessage::Task(task) => {
                let reply = match processor.as_mut() {
                    None => WorkerMessage::Error {
                        file: task.file_path.clone(),
                        message: Some(
                            "Worker received a task before it was initialized.".to_string(),
                        ),
                    },
                    Some(renderer) => match renderer.process_region_file(&task) {
                        Ok(RegionStatus::Rendered) => WorkerMessage::Done(task),
                        Ok(RegionStatus::Skipped) => WorkerMessage::Skip {
                            file: task.file_path,
                        },
                        Err(e) => WorkerMessage::Error {
                            file: task.file_path,
                            message: Some(e.to_string()),
                        },
                    },
                };
                if sender.send((index, reply)).is_err() {
                    break;
                }
            }
            ManagerMessage::Exit => break,
        }
    }
}

/// Renders every task and returns the ones that produced a tile.
pub fn run_worker_pool(tasks: Vec<Task>, init: &WorkerInit) -> Result<Vec<Task>, String> {
    let total = tasks.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let started = Instant::now();
    let worker_count = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(total);

    let (reply_sender, reply_receiver) = mpsc::channel::<(usize, WorkerMessage)>();
    let mut senders: Vec<Sender<ManagerMessage>> = Vec::with_capacity(worker_count);
    let mut handles = Vec::with_capacity(worker_count);
    for index in 0..worker_count {
        let (sender, receiver) = mpsc::channel::<ManagerMessage>();
        senders.push(sender);
        let reply_sender = reply_sender.clone();
        let handle = thread::Builder::new()
            .name(format!("render-worker-{index}"))
            .spawn(move || worker_loop(index, &receiver, &reply_sender))
            .map_err(|e| format!("Failed to spawn worker thread: {e}"))?;
        handles.push(handle);
    }
    // The manager's own sender must go away or the reply loop would block
    // forever after a worker dies.
    drop(reply_sender);

    let mut queue: VecDeque<Task> = tasks.into();
    for sender in &senders {
        sender
            .send(ManagerMessage::Init(Box::new(init.clone())))
            .map_err(|_| "A worker exited before initialization.".to_string())?;
        if let Some(task) = queue.pop_front() {
            sender
                .send(ManagerMessage::Task(task))
                .map_err(|_| "A worker exited before accepting tasks.".to_string())?;
        }
    }

    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:45}] {pos}/{len} regions ({eta})")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let mut done: Vec<Task> = Vec::new();
    let mut completed = 0usize;
    while completed < total {
        let (worker_index, message) = reply_receiver
            .recv()
            .map_err(|_| "All workers exited before the queue was drained.".to_string())?;
        match message {
            WorkerMessage::Ready => continue,
            WorkerMessage::Done(task) => {
                completed += 1;
                progress.inc(1);
                progress.println(format!(
                    "{} {} ({}/{})",
                    "✓ Processed:".green(),
                    file_name(&task.file_path),
                    completed,
                    total
                ));
                done.push(task);
            }
            WorkerMessage::Skip { file } => {
                completed += 1;
                progress.inc(1);
                progress.println(format!(
                    "{} {} ({}/{})",
                    "! Skipped empty region:".yellow(),
                    file_name(&file),
                    completed,
                    total
                ));
            }
            WorkerMessage::Error { file, message } => {
                completed += 1;
                progress.inc(1);
                progress.println(format!(
                    "{} {} - {}",
                    "✗ Error:".red(),
                    file_name(&file),
                    message.as_deref().unwrap_or("Unknown error")
                ));
            }
        }
        let next = match queue.pop_front() {
            Some(task) => ManagerMessage::Task(task),
            None => ManagerMessage::Exit,
        };
        senders[worker_index]
            .send(next)
            .map_err(|_| "A worker exited while tasks were pending.".to_string())?;
    }
    progress.finish_and_clear();

    for handle in handles {
        handle
            .join()
            .map_err(|_| "A render worker panicked.".to_string())?;
    }

    println!(
        "{}",
        format!(
            "✓ All tasks completed in {}.",
            format_duration(started.elapsed().as_secs())
        )
        .green()
    );
    Ok(done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{region_with_chunk, region_with_sections, SectionSpec};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_duration_pads_fields() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(59), "00:00:59");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(360_000), "100:00:00");
    }

    #[test]
    fn test_task_parses_region_coordinates() {
        let task = Task::from_region_file(Path::new("/tmp/region/r.-3.7.mca")).unwrap();
        assert_eq!(task.region_x, -3);
        assert_eq!(task.region_z, 7);
        assert!(Task::from_region_file(Path::new("/tmp/region/level.dat")).is_none());
        assert!(Task::from_region_file(Path::new("/tmp/region/r.1.2.png")).is_none());
    }

    #[test]
    fn test_empty_queue_returns_immediately() {
        let init = WorkerInit {
            out_dir: PathBuf::from("/nonexistent/out"),
            config: RenderConfig::default(),
            texture_cache: Arc::new(FnvHashMap::default()),
        };
        assert!(run_worker_pool(Vec::new(), &init).unwrap().is_empty());
    }

    #[test]
    fn test_pool_renders_skips_and_reports_errors() {
        let dir = TempDir::new().unwrap();
        let renderable = region_with_sections(&[SectionSpec {
            y: 0,
            block_palette: &["minecraft:stone"],
            block_data: None,
            biome_palette: &["minecraft:plains"],
            biome_data: None,
        }]);
        fs::write(dir.path().join("r.0.0.mca"), renderable).unwrap();
        fs::write(dir.path().join("r.1.0.mca"), region_with_chunk(0, 2, b"garbage")).unwrap();

        let init = WorkerInit {
            out_dir: dir.path().join("out"),
            config: RenderConfig::default(),
            texture_cache: Arc::new(FnvHashMap::default()),
        };
        let tasks = vec![
            Task::from_region_file(&dir.path().join("r.0.0.mca")).unwrap(),
            Task::from_region_file(&dir.path().join("r.1.0.mca")).unwrap(),
            // Never written, so the worker reports a read error.
            Task {
                file_path: dir.path().join("r.9.9.mca"),
                region_x: 9,
                region_z: 9,
            },
        ];
        let done = run_worker_pool(tasks, &init).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!((done[0].region_x, done[0].region_z), (0, 0));
        assert!(dir.path().join("out/r.0.0.png").exists());
        assert!(!dir.path().join("out/r.1.0.png").exists());
    }
}
