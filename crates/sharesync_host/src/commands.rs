//! Command parsing and status delivery.

use crate::error::{HostError, HostResult};
use parking_lot::Mutex;
use sharesync_engine::StatusTone;
use std::fmt;
use std::str::FromStr;

/// A control command accepted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start syncing.
    Share,
    /// Stop syncing and reset everyone.
    Unshare,
}

impl Command {
    /// Parses a command label, ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> HostResult<Self> {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("share") {
            Ok(Command::Share)
        } else if trimmed.eq_ignore_ascii_case("unshare") {
            Ok(Command::Unshare)
        } else {
            Err(HostError::UnknownCommand(trimmed.to_string()))
        }
    }

    /// Canonical label.
    pub fn label(&self) -> &'static str {
        match self {
            Command::Share => "share",
            Command::Unshare => "unshare",
        }
    }
}

impl FromStr for Command {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whoever issued a command and receives its status.
pub trait CommandSender {
    /// Display name of the sender.
    fn name(&self) -> &str;

    /// Delivers a status message.
    fn send_message(&self, tone: StatusTone, message: &str);
}

/// A message delivered to a [`BufferedSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Presentation tone.
    pub tone: StatusTone,
    /// Message text.
    pub text: String,
}

/// A sender that keeps every message it receives.
#[derive(Debug)]
pub struct BufferedSender {
    name: String,
    messages: Mutex<Vec<StatusLine>>,
}

impl BufferedSender {
    /// Creates a sender with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of every message received.
    pub fn messages(&self) -> Vec<StatusLine> {
        self.messages.lock().clone()
    }

    /// Returns the most recent message.
    pub fn last(&self) -> Option<StatusLine> {
        self.messages.lock().last().cloned()
    }

    /// Removes and returns every message received.
    pub fn take(&self) -> Vec<StatusLine> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl CommandSender for BufferedSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn send_message(&self, tone: StatusTone, message: &str) {
        self.messages.lock().push(StatusLine {
            tone,
            text: message.to_string(),
        });
    }
}
