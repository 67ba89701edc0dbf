//! The handinfs mount binary.
//!
//! Mounts a course dataset as a read-only filesystem. The dataset is
//! expected at `<cache_dir>/assignments.json`, produced ahead of time
//! by a separate acquisition step; attachment content is downloaded
//! into the same cache directory the first time a file is read.
//!
//! Usage:
//!   handinfs <mountpoint> [--cache <dir>]
//!
//! The mount is served until the process receives Ctrl+C.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use handinfs_model::Assignment;
use handinfs_vfs::{build_namespace, ContentCache, HandinFs, HttpStore, UnpackLog};

/// Mount a course's assignment handins as a read-only filesystem
#[derive(Parser, Debug)]
#[command(name = "handinfs")]
#[command(about = "Mount a course's assignment handins as a read-only filesystem")]
struct Args {
    /// Directory to mount the filesystem at
    mount: PathBuf,

    /// Cache directory holding the dataset and downloaded content
    #[arg(short, long, default_value = ".cache")]
    cache: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args: Args = Args::parse();
    tracing_subscriber::fmt::init();

    std::fs::create_dir_all(&args.cache).with_context(|| {
        format!("failed to create cache directory {}", args.cache.display())
    })?;

    let dataset_path: PathBuf = args.cache.join("assignments.json");
    let assignments: Vec<Assignment> = handinfs_model::load_assignments(&dataset_path)
        .with_context(|| format!("failed to load dataset {}", dataset_path.display()))?;
    info!(
        dataset = %dataset_path.display(),
        assignments = assignments.len(),
        "dataset loaded"
    );

    if !args.mount.exists() {
        std::fs::create_dir_all(&args.mount).with_context(|| {
            format!("failed to create mountpoint {}", args.mount.display())
        })?;
    }

    let runtime: tokio::runtime::Runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let unpack_log: Arc<UnpackLog> = Arc::new(UnpackLog::new());
    let namespace = Arc::new(build_namespace(&assignments, unpack_log.clone()));
    let cache: Arc<ContentCache> =
        Arc::new(ContentCache::new(&args.cache, Arc::new(HttpStore::new()))?);
    let fs: HandinFs = HandinFs::new(namespace.clone(), cache, unpack_log);

    info!(
        entries = namespace.len(),
        mount = %args.mount.display(),
        "Ready"
    );

    let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
    let r: Arc<AtomicBool> = running.clone();
    ctrlc::set_handler(move || {
        info!("received interrupt, unmounting");
        r.store(false, Ordering::SeqCst);
    })?;

    let session = handinfs_vfs::spawn_mount(fs, &args.mount)
        .with_context(|| format!("failed to mount at {}", args.mount.display()))?;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }

    drop(session);
    info!("unmounted");
    Ok(())
}
