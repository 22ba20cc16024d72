//! Asynchronous notifications delivered through a self-pipe.
//!
//! Signal handlers only write one byte naming the event into a nonblocking
//! pipe. The event loop polls the read end alongside its other descriptors
//! and turns those bytes back into [`Notification`]s on the main thread.

use std::io;
use std::os::fd::RawFd;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::error::{Error, Result};

/// Write end of the active notifier, or -1.
static NOTIFY_FD: AtomicI32 = AtomicI32::new(-1);

const SIGNALS: [libc::c_int; 3] = [libc::SIGINT, libc::SIGTERM, libc::SIGWINCH];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// Ctrl-C, SIGTERM: shut down.
    Interrupt,
    /// The terminal changed size.
    Resize,
}

impl Notification {
    fn as_byte(self) -> u8 {
        match self {
            Notification::Interrupt => b'i',
            Notification::Resize => b'w',
        }
    }

    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'i' => Some(Notification::Interrupt),
            b'w' => Some(Notification::Resize),
            _ => None,
        }
    }

    fn for_signal(sig: libc::c_int) -> Self {
        if sig == libc::SIGWINCH {
            Notification::Resize
        } else {
            Notification::Interrupt
        }
    }
}

#[cfg(target_os = "linux")]
fn errno_ptr() -> *mut libc::c_int {
    // SAFETY: returns the calling thread's errno slot.
    unsafe { libc::__errno_location() }
}

#[cfg(target_os = "android")]
fn errno_ptr() -> *mut libc::c_int {
    // SAFETY: returns the calling thread's errno slot.
    unsafe { libc::__errno() }
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
fn errno_ptr() -> *mut libc::c_int {
    // SAFETY: returns the calling thread's errno slot.
    unsafe { libc::__error() }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd"
)))]
fn errno_ptr() -> *mut libc::c_int {
    std::ptr::null_mut()
}

extern "C" fn on_signal(sig: libc::c_int) {
    let fd = NOTIFY_FD.load(Ordering::Relaxed);
    if fd < 0 {
        return;
    }
    let byte = Notification::for_signal(sig).as_byte();
    // The interrupted code may be about to inspect errno.
    let errno = errno_ptr();
    // SAFETY: write(2) is async-signal-safe; a full pipe just drops the byte.
    // `errno` is null or the thread's own errno slot.
    unsafe {
        let saved = errno.as_ref().copied();
        libc::write(fd, &byte as *const u8 as *const libc::c_void, 1);
        if let Some(saved) = saved {
            *errno = saved;
        }
    }
}

/// Owner of the notification pipe and the signal handlers feeding it.
///
/// Only one notifier may install handlers at a time; see [`Notifier::install`].
pub struct Notifier {
    read_fd: RawFd,
    write_fd: RawFd,
    handlers_installed: bool,
}

impl Notifier {
    /// Create the pipe without touching signal dispositions.
    pub fn new() -> Result<Self> {
        let mut fds = [0 as libc::c_int; 2];
        // SAFETY: `fds` has room for the two descriptors pipe(2) writes.
        if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
            return Err(Error::Notifier(io::Error::last_os_error()));
        }
        let notifier = Self {
            read_fd: fds[0],
            write_fd: fds[1],
            handlers_installed: false,
        };
        for fd in fds {
            set_flags(fd).map_err(Error::Notifier)?;
        }
        Ok(notifier)
    }

    /// Create the pipe and route SIGINT, SIGTERM and SIGWINCH into it.
    pub fn install() -> Result<Self> {
        let mut notifier = Self::new()?;
        NOTIFY_FD.store(notifier.write_fd, Ordering::SeqCst);
        for sig in SIGNALS {
            // SAFETY: the handler only performs an async-signal-safe write.
            unsafe {
                let mut action: libc::sigaction = std::mem::zeroed();
                action.sa_sigaction = on_signal as extern "C" fn(libc::c_int) as usize;
                action.sa_flags = libc::SA_RESTART;
                libc::sigemptyset(&mut action.sa_mask);
                if libc::sigaction(sig, &action, std::ptr::null_mut()) != 0 {
                    return Err(Error::Notifier(io::Error::last_os_error()));
                }
            }
        }
        notifier.handlers_installed = true;
        log::debug!("signal notifier installed on fd {}", notifier.read_fd);
        Ok(notifier)
    }

    /// Descriptor to poll for readability.
    pub fn read_fd(&self) -> RawFd {
        self.read_fd
    }

    /// Queue a notification from ordinary code, the same way a handler would.
    pub fn notify(&self, n: Notification) -> io::Result<()> {
        let byte = n.as_byte();
        // SAFETY: writing one byte from a live stack slot.
        let rc = unsafe { libc::write(self.write_fd, &byte as *const u8 as *const libc::c_void, 1) };
        if rc == 1 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    /// Read every queued notification, oldest first.
    pub fn drain(&self) -> io::Result<Vec<Notification>> {
        let mut out = Vec::new();
        let mut buf = [0u8; 64];
        loop {
            // SAFETY: `buf` is valid for `buf.len()` bytes.
            let n = unsafe {
                libc::read(self.read_fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len())
            };
            if n > 0 {
                out.extend(buf[..n as usize].iter().filter_map(|&b| Notification::from_byte(b)));
                continue;
            }
            if n == 0 {
                break;
            }
            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::WouldBlock => break,
                io::ErrorKind::Interrupted => continue,
                _ => return Err(err),
            }
        }
        Ok(out)
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if self.handlers_installed {
            for sig in SIGNALS {
                // SAFETY: restoring the default disposition.
                unsafe {
                    libc::signal(sig, libc::SIG_DFL);
                }
            }
            let _ = NOTIFY_FD.compare_exchange(
                self.write_fd,
                -1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
        }
        // SAFETY: both descriptors are owned by this notifier.
        unsafe {
            libc::close(self.read_fd);
            libc::close(self.write_fd);
        }
    }
}

fn set_flags(fd: RawFd) -> io::Result<()> {
    // SAFETY: fcntl on a descriptor we just created.
    unsafe {
        let fl = libc::fcntl(fd, libc::F_GETFL);
        if fl < 0 || libc::fcntl(fd, libc::F_SETFL, fl | libc::O_NONBLOCK) < 0 {
            return Err(io::Error::last_os_error());
        }
        let fd_flags = libc::fcntl(fd, libc::F_GETFD);
        if fd_flags < 0 || libc::fcntl(fd, libc::F_SETFD, fd_flags | libc::FD_CLOEXEC) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_come_back_in_order() {
        let n = Notifier::new().unwrap();
        n.notify(Notification::Resize).unwrap();
        n.notify(Notification::Interrupt).unwrap();
        n.notify(Notification::Resize).unwrap();
        assert_eq!(
            n.drain().unwrap(),
            vec![Notification::Resize, Notification::Interrupt, Notification::Resize]
        );
    }

    #[test]
    fn empty_pipe_drains_to_nothing() {
        let n = Notifier::new().unwrap();
        assert!(n.drain().unwrap().is_empty());
    }

    fn disposition(sig: libc::c_int) -> libc::sighandler_t {
        // SAFETY: querying only; a null new action changes nothing.
        unsafe {
            let mut old: libc::sigaction = std::mem::zeroed();
            assert_eq!(libc::sigaction(sig, std::ptr::null(), &mut old), 0);
            old.sa_sigaction
        }
    }

    // The only test that installs handlers; the rest use `Notifier::new`.
    #[test]
    fn raised_signals_reach_the_pipe() {
        let n = Notifier::install().unwrap();
        // SAFETY: SIGWINCH is routed to `on_signal` on this thread.
        assert_eq!(unsafe { libc::raise(libc::SIGWINCH) }, 0);
        assert_eq!(n.drain().unwrap(), vec![Notification::Resize]);

        // A full pipe makes the handler's write fail; errno must survive it.
        let mut queued = 0usize;
        while n.notify(Notification::Interrupt).is_ok() {
            queued += 1;
        }
        let errno = errno_ptr();
        assert!(!errno.is_null());
        // SAFETY: `errno` is this thread's errno slot.
        unsafe {
            *errno = libc::EINTR;
            assert_eq!(libc::raise(libc::SIGWINCH), 0);
            assert_eq!(*errno, libc::EINTR);
        }
        let drained = n.drain().unwrap();
        assert_eq!(drained.len(), queued);
        assert!(drained.iter().all(|&x| x == Notification::Interrupt));

        drop(n);
        assert_eq!(NOTIFY_FD.load(Ordering::SeqCst), -1);
        for sig in SIGNALS {
            assert_eq!(disposition(sig), libc::SIG_DFL);
        }
    }

    #[test]
    fn signals_map_to_notifications() {
        assert_eq!(Notification::for_signal(libc::SIGWINCH), Notification::Resize);
        assert_eq!(Notification::for_signal(libc::SIGINT), Notification::Interrupt);
        assert_eq!(Notification::for_signal(libc::SIGTERM), Notification::Interrupt);
    }
}
