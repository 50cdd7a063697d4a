use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::connection::Transport;

#[derive(Default)]
struct LoopbackState {
    sent: Vec<u8>,
    inbound: VecDeque<u8>,
}

/// In-memory transport double: captures outbound bytes and replays queued
/// inbound bytes. Clones share the same buffers, so a test can keep one
/// handle while the connection owns the other.
#[derive(Clone, Default)]
pub struct LoopbackTransport {
    state: Arc<Mutex<LoopbackState>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the connection to read on later polls.
    pub fn push_inbound(&self, bytes: &[u8]) {
        self.state.lock().unwrap().inbound.extend(bytes.iter().copied());
    }

    /// Everything sent so far, as text.
    pub fn sent_text(&self) -> String {
        String::from_utf8_lossy(&self.state.lock().unwrap().sent).into_owned()
    }
}

impl Transport for LoopbackTransport {
    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.state.lock().unwrap().sent.extend_from_slice(bytes);
        Ok(())
    }

    fn bytes_to_read(&mut self) -> Result<usize> {
        Ok(self.state.lock().unwrap().inbound.len())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let mut n = 0;
        while n < buf.len() {
            match state.inbound.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}
