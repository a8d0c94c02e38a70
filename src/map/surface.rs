use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use thiserror::Error;

use super::feed::MapMarker;

/// Commands accepted by the map worker. Delivery is fire and forget.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// Replace every marker on the map.
    LoadMarkers(Vec<MapMarker>),
    /// Pan to the marker with this id and open its popup.
    CenterOn(usize),
    /// Stop the worker thread.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to write map page '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to encode marker feed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A map renderer the worker forwards commands to.
///
/// `center_on` with an id that was never loaded must be a no-op.
pub trait MapSurface: Send {
    fn load_markers(&mut self, markers: &[MapMarker]) -> Result<(), MapError>;
    fn center_on(&mut self, id: usize) -> Result<(), MapError>;
}

/// Surface used when the map is disabled.
#[derive(Debug, Default)]
pub struct NullSurface;

impl MapSurface for NullSurface {
    fn load_markers(&mut self, _markers: &[MapMarker]) -> Result<(), MapError> {
        Ok(())
    }

    fn center_on(&mut self, _id: usize) -> Result<(), MapError> {
        Ok(())
    }
}

/// Owner of the map worker thread.
pub struct MapHandle {
    tx: Sender<MapCommand>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl MapHandle {
    /// Move `surface` onto its own thread and start forwarding commands to it.
    pub fn spawn(surface: Box<dyn MapSurface>) -> Self {
        let (tx, rx) = mpsc::channel::<MapCommand>();
        let join = thread::spawn(move || run_surface(surface, rx));
        Self {
            tx,
            join: Mutex::new(Some(join)),
        }
    }

    /// Sender for components that issue map commands.
    pub fn sender(&self) -> Sender<MapCommand> {
        self.tx.clone()
    }

    pub fn send(&self, cmd: MapCommand) -> Result<(), mpsc::SendError<MapCommand>> {
        self.tx.send(cmd)
    }

    /// Ask the worker to stop and wait for it.
    pub fn shutdown(&self) {
        let _ = self.send(MapCommand::Shutdown);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

fn run_surface(mut surface: Box<dyn MapSurface>, rx: Receiver<MapCommand>) {
    // Ends on Shutdown or once every sender is gone.
    while let Ok(cmd) = rx.recv() {
        let result = match cmd {
            MapCommand::LoadMarkers(markers) => {
                tracing::debug!(count = markers.len(), "loading map markers");
                surface.load_markers(&markers)
            }
            MapCommand::CenterOn(id) => {
                tracing::debug!(id, "centering map");
                surface.center_on(id)
            }
            MapCommand::Shutdown => break,
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "map surface command failed");
        }
    }
    tracing::debug!("map worker stopped");
}
