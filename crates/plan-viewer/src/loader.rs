//! Off-thread model loading.
//!
//! Reading and parsing runs on a worker thread; the result crosses back over a
//! single-slot channel that the render loop polls once per frame.

use crossbeam::channel::{bounded, Receiver, TryRecvError};
use planmesh::{load_obj_file, IngestOptions, Ingested, LoadError};
use std::path::{Path, PathBuf};
use std::thread;

pub type LoadResult = Result<Ingested, LoadError>;

/// Serializes model loads: at most one is in flight at a time.
#[derive(Debug, Default)]
pub struct ModelLoader {
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    path: PathBuf,
    rx: Receiver<LoadResult>,
}

impl ModelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Path of the load in flight, if any.
    pub fn pending_path(&self) -> Option<&Path> {
        self.pending.as_ref().map(|p| p.path.as_path())
    }

    /// Starts loading `path` in the background. Returns `Ok(false)` without
    /// doing anything while another load is still in flight.
    pub fn request(&mut self, path: PathBuf, options: IngestOptions) -> std::io::Result<bool> {
        if let Some(p) = &self.pending {
            log::warn!(
                "Ignoring load of {}: {} is still loading",
                path.display(),
                p.path.display()
            );
            return Ok(false);
        }

        let (tx, rx) = bounded(1);
        let worker_path = path.clone();
        thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                log::info!("Loading model {}", worker_path.display());
                let result = load_obj_file(&worker_path, &options);
                // The receiver is gone only if the viewer shut down meanwhile.
                if tx.send(result).is_err() {
                    log::debug!("Model load finished after the viewer stopped listening");
                }
            })?;

        self.pending = Some(Pending { path, rx });
        Ok(true)
    }

    /// Non-blocking check for a finished load.
    pub fn poll(&mut self) -> Option<LoadResult> {
        let pending = self.pending.as_ref()?;
        match pending.rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Model loader for {} exited without a result", pending.path.display());
                self.pending = None;
                None
            }
        }
    }
}
