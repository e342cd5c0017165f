//! Signal-to-event-loop exit notification.
//!
//! A signal handler must not run arbitrary logic in the interrupted
//! context; its only permitted action here is a single-byte write into a
//! nonblocking pipe that the event loop polls like any other readiness
//! source. If even that write fails, clean shutdown can no longer be
//! guaranteed and the handler terminates the process on the spot.

use std::io::{self, Read};
use std::os::fd::{AsRawFd, IntoRawFd, RawFd};
use std::os::unix::net::UnixStream;

use mio::unix::SourceFd;
use mio::{Interest, Registry, Token};
use nix::libc;
use signal_hook::{SigId, low_level};

/// Read side of the self-pipe that termination signals write into.
pub struct ExitPipe {
    reader: UnixStream,
    write_fd: RawFd,
    signal_ids: Vec<SigId>,
}

impl ExitPipe {
    /// Create the pipe and install a marker-writing handler for every
    /// signal in `signals`.
    pub fn install(signals: &[i32]) -> io::Result<Self> {
        let (writer, reader) = UnixStream::pair()?;
        reader.set_nonblocking(true)?;
        writer.set_nonblocking(true)?;
        let write_fd = writer.into_raw_fd();

        let mut signal_ids = Vec::with_capacity(signals.len());
        for signal in signals {
            let action = move || {
                let marker = [1u8];
                let written =
                    unsafe { libc::write(write_fd, marker.as_ptr().cast(), 1) };
                if written != 1 {
                    low_level::exit(1);
                }
            };
            let id = unsafe { low_level::register(*signal, action) }?;
            signal_ids.push(id);
        }

        Ok(Self {
            reader,
            write_fd,
            signal_ids,
        })
    }

    pub fn register(&mut self, registry: &Registry, token: Token) -> io::Result<()> {
        let fd = self.reader.as_raw_fd();
        registry.register(&mut SourceFd(&fd), token, Interest::READABLE)
    }

    pub fn deregister(&mut self, registry: &Registry) -> io::Result<()> {
        let fd = self.reader.as_raw_fd();
        registry.deregister(&mut SourceFd(&fd))
    }

    /// Consume pending markers; reports whether any signal arrived.
    pub fn drain(&mut self) -> bool {
        let mut buf = [0u8; 8];
        let mut seen = false;
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => seen = true,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        seen
    }
}

impl Drop for ExitPipe {
    fn drop(&mut self) {
        for id in self.signal_ids.drain(..) {
            low_level::unregister(id);
        }
        // The write end was leaked into the handlers; reclaim it now that
        // they are gone.
        unsafe {
            libc::close(self.write_fd);
        }
    }
}
