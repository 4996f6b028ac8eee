//! Fire-and-forget marshalling of scene mutations to the main context.
//!
//! Placement logic never touches the scene graph directly. It submits
//! [`SceneCommand`]s through a [`SceneDispatcher`]; the [`MainContext`] that
//! owns the graph applies them in submission order, either cooperatively via
//! [`MainContext::drain`] or on a dedicated thread via [`MainContext::run`].

use crossbeam::channel::{Receiver, Sender, TryRecvError, unbounded};
use log::{debug, warn};

use crate::scene::{SceneCommand, SceneGraph};

/// Submitting half. Cheap to clone; never blocks.
#[derive(Debug, Clone)]
pub struct SceneDispatcher {
    tx: Sender<SceneCommand>,
}

impl SceneDispatcher {
    /// Queue a command. Dropped with a warning if the main context is gone.
    pub fn submit(&self, command: SceneCommand) {
        if let Err(err) = self.tx.send(command) {
            warn!("main context gone, dropping {:?}", err.into_inner());
        }
    }
}

/// Owner of the scene graph and the receiving end of the command queue.
#[derive(Debug)]
pub struct MainContext<G> {
    rx: Receiver<SceneCommand>,
    scene: G,
}

/// Create a connected dispatcher / main-context pair around `scene`.
pub fn main_context<G: SceneGraph>(scene: G) -> (SceneDispatcher, MainContext<G>) {
    let (tx, rx) = unbounded();
    (SceneDispatcher { tx }, MainContext { rx, scene })
}

impl<G: SceneGraph> MainContext<G> {
    /// Apply every queued command; returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(cmd) => {
                    self.scene.apply(cmd);
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    /// Apply commands until every dispatcher has been dropped, then hand back
    /// the scene graph.
    pub fn run(mut self) -> G {
        let mut applied = 0usize;
        while let Ok(cmd) = self.rx.recv() {
            self.scene.apply(cmd);
            applied += 1;
        }
        debug!("main context stopped after {} command(s)", applied);
        self.scene
    }

    pub fn scene(&self) -> &G {
        &self.scene
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
