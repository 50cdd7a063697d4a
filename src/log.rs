/// Prefix the firmware puts on status lines that should display verbatim,
/// without the generic "Received:" wrapper.
pub const DIAGNOSTIC_PREFIX: &str = "Diagnostic:";

/// Append-only sequence of display lines backing the log pane. No structure
/// beyond the line prefixes and no persistence across runs.
#[derive(Debug, Default)]
pub struct EventLog {
    lines: Vec<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Record an outbound command line as `Sent: {line}`, trailing newline
    /// stripped.
    pub fn record_sent(&mut self, command_line: &str) {
        self.append(format!("Sent: {}", command_line.trim_end()));
    }

    /// Record an inbound line: diagnostic lines verbatim, everything else as
    /// `Received: {line}`.
    pub fn record_received(&mut self, line: &str) {
        if line.starts_with(DIAGNOSTIC_PREFIX) {
            self.append(line);
        } else {
            self.append(format!("Received: {}", line));
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sent_strips_trailing_newline() {
        let mut log = EventLog::new();
        log.record_sent("read\n");
        assert_eq!(log.lines(), ["Sent: read"]);
    }

    #[test]
    fn test_diagnostic_lines_pass_through_verbatim() {
        let mut log = EventLog::new();
        log.record_received("Diagnostic: tag present");
        assert_eq!(log.lines(), ["Diagnostic: tag present"]);
    }

    #[test]
    fn test_other_lines_get_received_prefix() {
        let mut log = EventLog::new();
        log.record_received("AABBCC");
        assert_eq!(log.lines(), ["Received: AABBCC"]);
    }

    #[test]
    fn test_lines_stay_ordered() {
        let mut log = EventLog::new();
        log.append("Connected to Arduino");
        log.record_sent("clear\n");
        log.record_received("OK");
        assert_eq!(
            log.lines(),
            ["Connected to Arduino", "Sent: clear", "Received: OK"]
        );
    }
}
