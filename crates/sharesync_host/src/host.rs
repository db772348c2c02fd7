//! The sync host.

use crate::commands::{Command, CommandSender};
use crate::config::HostConfig;
use crate::error::{HostError, HostResult};
use sharesync_engine::{
    ConvergenceEngine, ParticipantProvider, StatusTone, SyncStatus, TickScheduler,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// The sync host.
///
/// Owns the convergence engine for one running instance, turns sender
/// commands into engine calls, and forwards lifecycle events. Shutting the
/// host down resets every participant; it happens at most once and also
/// runs when the host is dropped.
///
/// # Example
///
/// ```
/// use sharesync_engine::{ManualScheduler, MemoryProvider, SyncStatus};
/// use sharesync_host::{BufferedSender, HostConfig, SyncHost};
/// use std::sync::Arc;
///
/// let provider = Arc::new(MemoryProvider::new());
/// provider.join("alex");
/// let host = SyncHost::new(HostConfig::default(), provider, Arc::new(ManualScheduler::new()));
///
/// let sender = BufferedSender::new("admin");
/// assert_eq!(host.dispatch(&sender, "share").unwrap(), SyncStatus::Enabled);
/// assert_eq!(sender.last().unwrap().text, SyncStatus::Enabled.message());
/// ```
pub struct SyncHost<P: ParticipantProvider + 'static> {
    config: HostConfig,
    engine: Arc<ConvergenceEngine<P>>,
    shut_down: AtomicBool,
}

impl<P: ParticipantProvider + 'static> SyncHost<P> {
    /// Creates a host and its engine.
    pub fn new(config: HostConfig, provider: Arc<P>, scheduler: Arc<dyn TickScheduler>) -> Self {
        let engine = ConvergenceEngine::new(config.engine.clone(), provider, scheduler);
        info!(
            host = %config.name,
            tick_period = ?config.engine.tick_period,
            "host enabled"
        );
        Self {
            config,
            engine,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Gets the configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Gets the engine.
    pub fn engine(&self) -> &Arc<ConvergenceEngine<P>> {
        &self.engine
    }

    /// Parses and runs a command, sending the status to `sender`.
    ///
    /// Unknown labels fail without sending anything. If the engine cannot
    /// start, the sender is told before the error is returned.
    pub fn dispatch(&self, sender: &dyn CommandSender, label: &str) -> HostResult<SyncStatus> {
        let command = Command::parse(label)?;

        match self.execute(command) {
            Ok(status) => {
                sender.send_message(status.tone(), status.message());
                info!(
                    host = %self.config.name,
                    sender = sender.name(),
                    %command,
                    ?status,
                    "command handled"
                );
                Ok(status)
            }
            Err(e) => {
                sender.send_message(StatusTone::Warning, &format!("Could not {command}: {e}"));
                warn!(
                    host = %self.config.name,
                    sender = sender.name(),
                    %command,
                    error = %e,
                    "command failed"
                );
                Err(e)
            }
        }
    }

    /// Runs a command against the engine. Fails once the host is shut down.
    pub fn execute(&self, command: Command) -> HostResult<SyncStatus> {
        if self.is_shut_down() {
            return Err(HostError::ShutDown);
        }
        match command {
            Command::Share => Ok(self.engine.start_sync()?),
            Command::Unshare => Ok(self.engine.stop_sync()),
        }
    }

    /// Notifies the engine that a participant became active.
    pub fn participant_joined(&self, id: &P::Id) -> bool {
        !self.is_shut_down() && self.engine.on_participant_join(id)
    }

    /// Stops the engine and resets every participant. Only the first call
    /// has any effect; commands issued afterwards fail.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.engine.shutdown();
        info!(host = %self.config.name, "host disabled");
    }

    /// Returns true once the host has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl<P: ParticipantProvider + 'static> Drop for SyncHost<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
