use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::command::{Command, TagPayload};
use crate::connection::{self, Connection};
use crate::log::EventLog;

/// Connection lifecycle state. No automatic reconnection and no heartbeat;
/// the only transitions are a successful connect and a disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// Application state: the single owner of the serial connection and the
/// visible log. Button handlers and the poll tick all take `&mut Session`.
pub struct Session {
    connection: Option<Connection>,
    log: EventLog,
}

impl Session {
    pub fn new() -> Self {
        Self {
            connection: None,
            log: EventLog::new(),
        }
    }

    pub fn state(&self) -> LinkState {
        if self.connection.is_some() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Locate the programmer and open it. On failure the state is unchanged
    /// and the error is returned for the UI to surface as a blocking dialog.
    pub fn connect(&mut self) -> Result<()> {
        let path = connection::find_device()?;
        let conn = Connection::open(&path)?;
        self.attach(conn);
        Ok(())
    }

    /// Adopt an already-open connection. Discovery and open are the only
    /// steps this skips; state and log transitions are identical.
    pub fn attach(&mut self, connection: Connection) {
        info!(port = %connection.path(), "connected to programmer");
        self.connection = Some(connection);
        self.log.append("Connected to Arduino");
    }

    /// Close the connection if one is open. Idempotent; calling this while
    /// already disconnected does nothing.
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            info!(port = %conn.path(), "disconnected from programmer");
            self.log.append("Disconnected from Arduino");
        }
    }

    /// Validate the operator's hex input and send a write command. Returns
    /// the validation error, if any, for the UI to surface as a warning; no
    /// I/O happens on invalid input.
    pub fn write(&mut self, hex_input: &str) -> Result<()> {
        let payload = TagPayload::parse(hex_input)?;
        self.send(Command::Write(payload));
        Ok(())
    }

    pub fn read(&mut self) {
        self.send(Command::Read);
    }

    pub fn clear(&mut self) {
        self.send(Command::Clear);
    }

    /// Send a command if connected; commands issued while disconnected are
    /// dropped without user feedback, matching the firmware tool's original
    /// behavior.
    fn send(&mut self, command: Command) {
        let Some(conn) = self.connection.as_mut() else {
            warn!(?command, "dropping command while disconnected");
            return;
        };

        let line = command.wire_line();
        match conn.send_line(&line) {
            Ok(()) => self.log.record_sent(&line),
            Err(e) => error!("failed to send command: {:#}", e),
        }
    }

    /// One poll tick: drain buffered input and log at most one complete
    /// line. A no-op while disconnected or when no full line has arrived.
    pub fn poll(&mut self) {
        let Some(conn) = self.connection.as_mut() else {
            return;
        };
        match conn.poll_line() {
            Ok(Some(line)) => {
                debug!(%line, "received line");
                self.log.record_received(&line);
            }
            Ok(None) => {}
            Err(e) => error!("failed to poll serial port: {:#}", e),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
