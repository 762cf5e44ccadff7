// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background input reader.
//
// `read()` on stdin blocks, while the event loop has to keep ticking for
// resizes and escape timeouts. A dedicated thread reads chunks and sends
// them over a channel; the loop waits on it with `recv_timeout`.
//
// On unix the thread polls the descriptor with a short timeout and checks
// a stop flag between polls, so stopping never hangs inside `read()`.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Bytes requested per `read()`.
const CHUNK: usize = 1024;

/// Poll timeout between stop-flag checks, in milliseconds.
#[cfg(unix)]
const POLL_MS: i32 = 50;

/// Handle to the reader thread. Dropping it stops the thread.
///
/// ```no_run
/// use lc_term::reader::StdinReader;
///
/// let (_reader, rx) = StdinReader::spawn()?;
/// if let Ok(bytes) = rx.recv() {
///     println!("{} bytes", bytes.len());
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Start reading stdin.
    ///
    /// The channel yields non-empty chunks and closes on EOF, on a read
    /// error, or once the reader is stopped.
    ///
    /// # Errors
    ///
    /// Fails if the thread cannot be spawned.
    pub fn spawn() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            Self::spawn_fd(io::stdin().as_raw_fd())
        }
        #[cfg(not(unix))]
        {
            Self::start(read_blocking)
        }
    }

    /// Start reading an arbitrary descriptor. It must stay open for as
    /// long as the reader runs.
    ///
    /// # Errors
    ///
    /// Fails if the thread cannot be spawned.
    #[cfg(unix)]
    pub fn spawn_fd(fd: libc::c_int) -> io::Result<(Self, Receiver<Vec<u8>>)> {
        Self::start(move |tx, stop| poll_loop(fd, &tx, &stop))
    }

    fn start<F>(body: F) -> io::Result<(Self, Receiver<Vec<u8>>)>
    where
        F: FnOnce(Sender<Vec<u8>>, Arc<AtomicBool>) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("input-reader".into())
            .spawn(move || body(tx, flag))?;
        tracing::debug!("input reader started");
        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Ask the thread to exit and join it. Safe to call more than once.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("input reader thread panicked");
            }
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn poll_loop(fd: libc::c_int, tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    let mut buf = [0u8; CHUNK];
    while !stop.load(Ordering::Relaxed) {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: `pfd` is a valid pollfd for the duration of the call.
        let ready = unsafe { libc::poll(&raw mut pfd, 1, POLL_MS) };
        if ready <= 0 {
            continue;
        }
        // SAFETY: `buf` is writable for `buf.len()` bytes.
        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        let Ok(n) = usize::try_from(n) else {
            tracing::debug!(error = %io::Error::last_os_error(), "input read failed");
            break;
        };
        if n == 0 || tx.send(buf[..n].to_vec()).is_err() {
            break;
        }
    }
}

#[cfg(not(unix))]
#[allow(clippy::needless_pass_by_value)]
fn read_blocking(tx: Sender<Vec<u8>>, stop: Arc<AtomicBool>) {
    use std::io::Read;

    let mut buf = [0u8; CHUNK];
    let stdin = io::stdin();
    while !stop.load(Ordering::Relaxed) {
        match stdin.lock().read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
