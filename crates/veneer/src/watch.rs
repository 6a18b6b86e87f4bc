//! Watch mode: debounced rebuild-on-change.
//!
//! Filesystem events map to rebuild targets (one brand, or everything
//! when a shared input changes), collect in a [`RebuildQueue`], and flush
//! after a quiet window. The queue is a two-state machine:
//!
//! ```text
//! Idle     + request -> Building (request taken up)
//! Building + request -> Building (request queued)
//! Building + done    -> Idle, or straight back to Building when
//!                       requests arrived mid-build
//! ```
//!
//! At most one build is in flight and builds always run to completion; a
//! change landing mid-build is deferred, never cancelled into. Events
//! under the output directory are ignored, so writing sheets does not
//! feed the watcher a rebuild of its own making.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::Context;
use console::style;

use crate::build::{self, BuildOptions, Selection};

/// What a filesystem change asks to be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Target {
    /// A shared input changed (global manifest, config file): every
    /// brand is stale.
    All,
    /// One brand's own manifest changed.
    Brand(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Building,
}

/// The rebuild state machine.
#[derive(Debug)]
pub struct RebuildQueue {
    state: State,
    pending: BTreeSet<Target>,
}

impl Default for RebuildQueue {
    fn default() -> Self {
        RebuildQueue::new()
    }
}

impl RebuildQueue {
    pub fn new() -> RebuildQueue {
        RebuildQueue {
            state: State::Idle,
            pending: BTreeSet::new(),
        }
    }

    /// Records a rebuild request. Returns `true` when the queue was idle
    /// and the caller should start a build; `false` when a build is in
    /// flight and the request was queued behind it.
    pub fn request(&mut self, target: Target) -> bool {
        // `All` subsumes every brand-level request.
        if !self.pending.contains(&Target::All) {
            if target == Target::All {
                self.pending.clear();
            }
            self.pending.insert(target);
        }
        self.state == State::Idle
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Enters the building state and takes the accumulated targets.
    pub fn begin(&mut self) -> BTreeSet<Target> {
        self.state = State::Building;
        std::mem::take(&mut self.pending)
    }

    /// Marks the in-flight build complete. Returns `true` when requests
    /// arrived mid-build and the caller should immediately build again;
    /// otherwise the queue returns to idle.
    pub fn complete(&mut self) -> bool {
        if self.pending.is_empty() {
            self.state = State::Idle;
            false
        } else {
            true
        }
    }
}

/// Watch-loop settings beyond the build options themselves.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub debounce: Duration,
    /// Use the polling watcher instead of the platform's native one.
    pub poll: bool,
    /// The config file being used, watched for changes like any other
    /// shared input.
    pub config_path: Option<PathBuf>,
}

/// Classifies one event path into a rebuild target.
///
/// `None` means the change is not an input: anything under the output
/// directory, and non-JSON files inside the themes tree. The config file
/// and the shared global manifest invalidate every brand; a JSON file
/// inside a brand directory invalidates just that brand.
pub fn classify(
    path: &Path,
    themes_dir: &Path,
    out_dir: &Path,
    config_path: Option<&Path>,
) -> Option<Target> {
    if path.starts_with(out_dir) {
        return None;
    }
    if config_path.is_some_and(|config| path == config) {
        return Some(Target::All);
    }

    let relative = path.strip_prefix(themes_dir).ok()?;
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return None;
    }

    let mut components = relative.components();
    let first = components.next()?.as_os_str().to_string_lossy().into_owned();
    if components.next().is_some() {
        // themes/<brand>/...json
        Some(Target::Brand(first))
    } else {
        // A JSON file at the themes root is shared, like the global
        // manifest; every brand merges from it.
        Some(Target::All)
    }
}

/// Narrows the run's base selection to what a flush actually touched.
///
/// A single-brand watch always rebuilds that brand. An all-brands watch
/// rebuilds everything when any shared input changed, otherwise just the
/// brands whose files moved.
fn selection_for(targets: &BTreeSet<Target>, base: &Selection) -> Selection {
    match base {
        Selection::Brands(_) => base.clone(),
        Selection::All => {
            if targets.contains(&Target::All) {
                Selection::All
            } else {
                let brands = targets
                    .iter()
                    .filter_map(|target| match target {
                        Target::Brand(brand) => Some(brand.clone()),
                        Target::All => None,
                    })
                    .collect();
                Selection::Brands(brands)
            }
        }
    }
}

/// Absolute form of a path, falling back to the path as given when it
/// cannot be resolved (not created yet).
fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Runs the watch loop: an initial full build, then debounced rebuilds
/// until the watcher channel closes.
pub fn run(
    options: &BuildOptions,
    base: &Selection,
    watch_options: &WatchOptions,
) -> anyhow::Result<()> {
    build::run(options, base)?;

    // Event paths arrive absolute; classification needs the roots in the
    // same form.
    let mut options = options.clone();
    options.themes_dir = canonical(&options.themes_dir);
    options.out_dir = canonical(&options.out_dir);
    let mut watch_options = watch_options.clone();
    watch_options.config_path = watch_options.config_path.as_deref().map(canonical);
    let options = &options;
    let watch_options = &watch_options;

    let (tx, rx) = channel();
    let mut watcher: Box<dyn notify::Watcher> = if watch_options.poll {
        Box::new(
            notify::PollWatcher::new(
                tx,
                notify::Config::default().with_poll_interval(watch_options.debounce),
            )
            .context("failed to start poll watcher")?,
        )
    } else {
        Box::new(notify::recommended_watcher(tx).context("failed to start watcher")?)
    };

    watcher
        .watch(&options.themes_dir, notify::RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", options.themes_dir.display()))?;
    if let Some(config) = &watch_options.config_path {
        if config.is_file() {
            watcher
                .watch(config, notify::RecursiveMode::NonRecursive)
                .with_context(|| format!("failed to watch {}", config.display()))?;
        }
    }

    eprintln!("watching for changes (press Ctrl+C to stop)...");
    watch_loop(&rx, options, base, watch_options)
}

fn watch_loop(
    rx: &Receiver<notify::Result<notify::Event>>,
    options: &BuildOptions,
    base: &Selection,
    watch_options: &WatchOptions,
) -> anyhow::Result<()> {
    let debounce = watch_options.debounce;
    let tick = debounce.max(Duration::from_millis(25));
    let config_path = watch_options.config_path.as_deref();

    let mut queue = RebuildQueue::new();
    let mut last_request = Instant::now();

    loop {
        match rx.recv_timeout(tick) {
            Ok(Ok(event)) => {
                for path in &event.paths {
                    let target = classify(path, &options.themes_dir, &options.out_dir, config_path);
                    if let Some(target) = target {
                        queue.request(target);
                        last_request = Instant::now();
                    }
                }
            }
            Ok(Err(err)) => {
                eprintln!("{} watch error: {}", style("warning:").yellow().bold(), err);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }

        if !queue.has_pending() || last_request.elapsed() < debounce {
            continue;
        }

        loop {
            let targets = queue.begin();
            let selection = selection_for(&targets, base);
            eprintln!("change detected, rebuilding...");
            if let Err(err) = build::run(options, &selection) {
                eprintln!("{} rebuild failed: {:#}", style("error:").red().bold(), err);
            }

            // Changes that landed mid-build were deferred; pick them up
            // before deciding whether to go idle.
            while let Ok(message) = rx.try_recv() {
                if let Ok(event) = message {
                    for path in &event.paths {
                        let target =
                            classify(path, &options.themes_dir, &options.out_dir, config_path);
                        if let Some(target) = target {
                            queue.request(target);
                        }
                    }
                }
            }
            if !queue.complete() {
                break;
            }
        }
    }
}
