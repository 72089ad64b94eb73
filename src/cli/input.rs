//! Line input that can give up waiting.
//!
//! The shell must notice the idle deadline while the user is away from
//! the keyboard, but reading stdin blocks.  A worker thread does the
//! blocking read and hands each line over a channel, and the shell waits
//! on that channel with a timeout.
//!
//! The worker reads only when asked, one line per request, so nothing
//! else (a password prompt, say) has to compete with it for stdin between
//! shell lines.

use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Result of waiting for one line.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    /// A line, without its line ending.
    Line(String),
    /// The timeout passed with no input; the read stays outstanding.
    Idle,
    /// End of input.
    Closed,
}

pub struct LineReader {
    requests: Sender<()>,
    lines: Receiver<Option<io::Result<String>>>,
    pending: bool,
}

impl LineReader {
    /// Start the worker thread reading from `input`.
    pub fn spawn<R>(mut input: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (requests, request_rx) = mpsc::channel::<()>();
        let (line_tx, lines) = mpsc::channel();

        thread::spawn(move || {
            while request_rx.recv().is_ok() {
                let mut line = String::new();
                let message = match input.read_line(&mut line) {
                    Ok(0) => None,
                    Ok(_) => Some(Ok(line)),
                    Err(e) => Some(Err(e)),
                };
                if line_tx.send(message).is_err() {
                    break;
                }
            }
        });

        Self {
            requests,
            lines,
            pending: false,
        }
    }

    /// Wait for the next line, at most `timeout` (forever if `None`).
    pub fn next_line(&mut self, timeout: Option<Duration>) -> io::Result<Input> {
        if !self.pending {
            if self.requests.send(()).is_err() {
                return Ok(Input::Closed);
            }
            self.pending = true;
        }

        let received = match timeout {
            Some(timeout) => self.lines.recv_timeout(timeout),
            None => self
                .lines
                .recv()
                .map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(message) => {
                self.pending = false;
                match message {
                    Some(Ok(line)) => Ok(Input::Line(
                        line.trim_end_matches(['\r', '\n']).to_string(),
                    )),
                    Some(Err(e)) => Err(e),
                    None => Ok(Input::Closed),
                }
            }
            Err(RecvTimeoutError::Timeout) => Ok(Input::Idle),
            Err(RecvTimeoutError::Disconnected) => Ok(Input::Closed),
        }
    }
}
