use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serialport::{SerialPortInfo, SerialPortType};
use tracing::debug;

/// Fixed link rate the programmer firmware runs at (8N1 implied framing).
pub const BAUD_RATE: u32 = 115_200;

/// Cadence for checking buffered inbound data while connected.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Port read timeout. Keeps a device that stalls mid-line from holding up
/// the UI loop; partial lines stay in the pending buffer until the newline
/// arrives on a later poll.
const READ_TIMEOUT: Duration = Duration::from_millis(20);

/// Byte transport beneath a [`Connection`]. The production implementation
/// wraps a serial port handle; tests substitute an in-memory double.
pub trait Transport {
    /// Write the whole buffer.
    fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Number of inbound bytes the driver has buffered.
    fn bytes_to_read(&mut self) -> Result<usize>;

    /// Read whatever is available, up to `buf.len()`. Returns 0 on timeout.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize>;
}

struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl Transport for SerialTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        Ok(())
    }

    fn bytes_to_read(&mut self) -> Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

/// Human-readable description of an enumerated port. USB CDC devices
/// advertise a product string; other port types carry nothing comparable.
pub fn port_description(info: &SerialPortInfo) -> Option<&str> {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => usb.product.as_deref(),
        _ => None,
    }
}

/// First port whose description contains "Nano" or "USB" (case-sensitive),
/// in enumeration order. No VID/PID or serial-number disambiguation.
pub fn select_port(ports: &[SerialPortInfo]) -> Option<&SerialPortInfo> {
    ports.iter().find(|info| {
        port_description(info).is_some_and(|d| d.contains("Nano") || d.contains("USB"))
    })
}

/// Locate the programmer among the ports the OS reports and return its
/// device path.
pub fn find_device() -> Result<String> {
    let ports =
        serialport::available_ports().context("failed to enumerate serial ports")?;
    for info in &ports {
        debug!(
            port = %info.port_name,
            description = port_description(info).unwrap_or("n/a"),
            "enumerated serial port"
        );
    }
    select_port(&ports)
        .map(|info| info.port_name.clone())
        .ok_or_else(|| anyhow!("Arduino not found"))
}

/// An open link to the programmer: line framing on top of a byte transport.
pub struct Connection {
    transport: Box<dyn Transport>,
    path: String,
    pending: Vec<u8>,
}

impl Connection {
    /// Open the named device at the fixed rate.
    pub fn open(path: &str) -> Result<Self> {
        let port = serialport::new(path, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("failed to open {} at {} baud", path, BAUD_RATE))?;
        Ok(Self::over(Box::new(SerialTransport { port }), path))
    }

    /// Build a connection over an already-open transport.
    pub fn over(transport: Box<dyn Transport>, path: &str) -> Self {
        Self {
            transport,
            path: path.to_string(),
            pending: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Send one ASCII command line exactly as given.
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        self.transport.send(line.as_bytes())
    }

    /// Drain whatever the driver has buffered and return the next complete
    /// line with trailing whitespace stripped. Returns `None` until a full
    /// newline-terminated line has accumulated.
    pub fn poll_line(&mut self) -> Result<Option<String>> {
        let buffered = self.transport.bytes_to_read()?;
        if buffered > 0 {
            let mut buf = vec![0u8; buffered];
            let n = self.transport.read_available(&mut buf)?;
            self.pending.extend_from_slice(&buf[..n]);
        }

        match self.pending.iter().position(|&b| b == b'\n') {
            Some(end) => {
                let raw: Vec<u8> = self.pending.drain(..=end).collect();
                let line = String::from_utf8_lossy(&raw).trim_end().to_string();
                Ok(Some(line))
            }
            None => Ok(None),
        }
    }
}
