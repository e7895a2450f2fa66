//! Runs gateway commands off the UI thread.
//!
//! Each command becomes its own tokio task; outcomes come back over a channel
//! and are applied in arrival order, so the last answer to land wins.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::app::controller::{Command, Outcome};
use crate::remote::UserGateway;

pub struct Dispatcher {
    gateway: Arc<dyn UserGateway>,
    runtime: Handle,
    tx: UnboundedSender<Outcome>,
    rx: UnboundedReceiver<Outcome>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn UserGateway>, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self { gateway, runtime, tx, rx }
    }

    /// Start the call and return immediately.
    pub fn dispatch(&self, cmd: Command) {
        tracing::debug!(?cmd, "dispatching");
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = cmd.execute(gateway.as_ref()).await;
            // The receiver only goes away on shutdown.
            let _ = tx.send(outcome);
        });
    }

    /// Next finished outcome, if any, without blocking.
    pub fn try_next(&mut self) -> Option<Outcome> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next outcome. Must not be called from inside the runtime.
    pub fn wait_next(&mut self) -> Option<Outcome> {
        self.rx.blocking_recv()
    }
}
