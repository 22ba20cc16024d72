//! Terminal setup and the readiness loop.
//!
//! One `poll(2)` call per iteration waits on the notification pipe, the data
//! source and the keyboard, with a timeout that ends at the next whole second
//! so the clock stays current. Each ready descriptor gets at most one bounded
//! read before the loop renders and waits again.

use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{AsFd, AsRawFd, RawFd};
use std::time::Instant;

use chrono::{Local, Timelike};

use crate::config::PlotConfig;
use crate::error::{Error, Result};
use crate::events::Notifier;
use crate::render::Renderer;
use crate::term::{TerminalGuard, TerminalRenderer};

use super::{App, LoopState};

const KEY_BUF: usize = 32;

/// Run the dashboard on stdin and the controlling terminal until quit.
pub fn run(config: PlotConfig) -> Result<()> {
    let notifier = Notifier::install()?;
    let data = File::from(io::stdin().as_fd().try_clone_to_owned()?);
    let tty = match File::open("/dev/tty") {
        Ok(f) => Some(f),
        Err(e) => {
            log::warn!("no controlling terminal, keyboard disabled: {}", e);
            None
        }
    };

    let guard = TerminalGuard::enter(tty.as_ref()).map_err(Error::Terminal)?;
    let result = App::new(config, TerminalRenderer::stdout())
        .and_then(|mut app| event_loop(&mut app, &notifier, Some(data), tty));
    let restored = guard.leave();
    result?;
    restored.map_err(Error::Terminal)
}

/// Drive `app` until it reaches [`LoopState::Terminating`].
///
/// `data` and `tty` are dropped, and so closed, as soon as they stop
/// delivering bytes.
pub fn event_loop<R: Renderer>(
    app: &mut App<R>,
    notifier: &Notifier,
    mut data: Option<File>,
    mut tty: Option<File>,
) -> Result<()> {
    let mut buf = vec![0u8; crate::data::decoder::DECODER_CAPACITY];
    loop {
        app.tick(Local::now().timestamp());
        app.render_if_needed()?;
        if app.is_terminating() {
            break;
        }

        app.state = LoopState::WaitingForEvents;
        let mut fds = [
            pollfd(Some(notifier.read_fd())),
            pollfd(data.as_ref().map(AsRawFd::as_raw_fd)),
            pollfd(tty.as_ref().map(AsRawFd::as_raw_fd)),
        ];
        // SAFETY: `fds` is a valid array of `fds.len()` pollfd entries.
        let rc = unsafe {
            libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, millis_to_next_second())
        };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(Error::Io(err));
        }
        if rc == 0 {
            continue;
        }

        app.state = LoopState::Draining;
        if is_ready(&fds[2]) {
            if let Some(f) = tty.as_mut() {
                let mut keys = [0u8; KEY_BUF];
                match f.read(&mut keys) {
                    Ok(0) => {
                        log::warn!("keyboard closed");
                        tty = None;
                    }
                    Ok(n) => keys[..n].iter().for_each(|&b| app.handle_key(b)),
                    Err(e) if is_transient(&e) => {}
                    Err(e) => {
                        log::warn!("keyboard read failed: {}", e);
                        tty = None;
                    }
                }
            }
        }

        if is_ready(&fds[1]) {
            if let Some(f) = data.as_mut() {
                let want = app.read_size().min(buf.len());
                match f.read(&mut buf[..want]) {
                    Ok(0) => {
                        app.handle_eof(Instant::now());
                        data = None;
                    }
                    Ok(n) => app.handle_data(&buf[..n], Instant::now()),
                    Err(e) if is_transient(&e) => {}
                    Err(e) => {
                        app.handle_read_error(&e);
                        data = None;
                    }
                }
            }
        }

        if is_ready(&fds[0]) {
            for n in notifier.drain()? {
                app.handle_notification(n)?;
            }
        }
    }
    log::debug!("event loop finished");
    Ok(())
}

/// Negative descriptors are ignored by poll(2).
fn pollfd(fd: Option<RawFd>) -> libc::pollfd {
    libc::pollfd {
        fd: fd.unwrap_or(-1),
        events: libc::POLLIN,
        revents: 0,
    }
}

fn is_ready(p: &libc::pollfd) -> bool {
    p.fd >= 0 && p.revents & (libc::POLLIN | libc::POLLHUP | libc::POLLERR) != 0
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}

fn millis_to_next_second() -> libc::c_int {
    let elapsed = (Local::now().nanosecond() % 1_000_000_000) / 1_000_000;
    (1000 - elapsed as libc::c_int).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_stays_within_one_second() {
        let ms = millis_to_next_second();
        assert!((1..=1000).contains(&ms));
    }

    #[test]
    fn absent_descriptor_is_never_ready() {
        let mut p = pollfd(None);
        p.revents = libc::POLLIN;
        assert!(!is_ready(&p));
    }

    #[test]
    fn hangup_counts_as_ready() {
        let mut p = pollfd(Some(0));
        p.revents = libc::POLLHUP;
        assert!(is_ready(&p));
    }
}
