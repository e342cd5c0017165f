//! Terminal-backed status window.
//!
//! The terminal is the host windowing environment here: the battery icon
//! is drawn with half-block pixels and truecolor SGR, the status text is
//! mirrored into the emulator's window title via OSC 2, SIGWINCH arrives
//! as a redraw request through a self-pipe, and `q` requests exit.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::AsRawFd;
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::thread;
use std::time::Duration;

use mio::unix::SourceFd;
use mio::{Interest, Registry, Token};
use nix::libc;
use nix::sys::termios::{self, LocalFlags, SetArg, Termios};
use signal_hook::SigId;
use signal_hook::consts::signal::SIGWINCH;
use signal_hook::low_level::{self, pipe};

use batticon_engine::{StatusWindow, WindowEvent};
use batticon_pixmap::{Mask, Pixmap, Rgb};

const DEFAULT_TTY: &str = "/dev/tty";
const QUIT_KEY: u8 = b'q';

pub struct TermWindow {
    tty: File,
    saved_termios: Termios,
    winch_pipe: UnixStream,
    winch_id: SigId,
    icon: Option<(Pixmap, Mask)>,
    title: String,
}

impl TermWindow {
    /// Open the drawing terminal; defaults to the controlling tty.
    pub fn open(display: Option<&Path>) -> io::Result<Self> {
        let path = display.unwrap_or(Path::new(DEFAULT_TTY));
        let tty = OpenOptions::new().read(true).write(true).open(path)?;

        let saved_termios = tcgetattr(&tty)?;
        let mut raw = saved_termios.clone();
        // Byte-at-a-time input without echo. ISIG stays on so ^C keeps
        // flowing through the exit-signal path.
        raw.local_flags.remove(LocalFlags::ECHO | LocalFlags::ICANON);
        tcsetattr(&tty, &raw)?;

        set_nonblocking(tty.as_raw_fd())?;

        let (winch_pipe, winch_id) = register_winch_handler()?;

        let window = Self {
            tty,
            saved_termios,
            winch_pipe,
            winch_id,
            icon: None,
            title: String::new(),
        };

        // Hide the cursor and start from a clean screen.
        window.write_all_retry(b"\x1b[?25l\x1b[2J")?;

        Ok(window)
    }

    fn terminal_size(&self) -> (usize, usize) {
        let mut size = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        let result =
            unsafe { libc::ioctl(self.tty.as_raw_fd(), libc::TIOCGWINSZ, &mut size) };

        if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
            (size.ws_col as usize, size.ws_row as usize)
        } else {
            (80, 24)
        }
    }

    fn compose_frame(&self) -> String {
        let (columns, rows) = self.terminal_size();
        let mut frame = String::from("\x1b[2J\x1b[H");

        let title_col = columns.saturating_sub(self.title.chars().count()) / 2 + 1;
        frame.push_str(&format!("\x1b[1;{title_col}H{}", self.title));

        if let Some((pixmap, mask)) = &self.icon {
            let width = pixmap.width();
            let height = pixmap.height();
            // Two pixel rows per text row.
            let text_rows = height.div_ceil(2);
            let col = columns.saturating_sub(width) / 2 + 1;
            let row = (rows.saturating_sub(text_rows) / 2).max(1) + 1;

            for ty in 0..text_rows {
                frame.push_str(&format!("\x1b[{};{}H", row + ty, col));
                for x in 0..width {
                    let top = opaque_pixel(pixmap, mask, x, 2 * ty);
                    let bottom = opaque_pixel(pixmap, mask, x, 2 * ty + 1);
                    push_half_block(&mut frame, top, bottom);
                }
                frame.push_str("\x1b[0m");
            }
        }

        frame.push_str(&format!("\x1b[{rows};1H"));
        frame
    }

    fn write_all_retry(&self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match (&self.tty).write(buf) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(written) => buf = &buf[written..],
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(1));
                },
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

impl StatusWindow for TermWindow {
    fn register(&mut self, registry: &Registry, token: Token) -> io::Result<()> {
        let tty_fd = self.tty.as_raw_fd();
        registry.register(&mut SourceFd(&tty_fd), token, Interest::READABLE)?;

        let winch_fd = self.winch_pipe.as_raw_fd();
        registry.register(&mut SourceFd(&winch_fd), token, Interest::READABLE)?;

        Ok(())
    }

    fn deregister(&mut self, registry: &Registry) -> io::Result<()> {
        let tty_fd = self.tty.as_raw_fd();
        registry.deregister(&mut SourceFd(&tty_fd))?;

        let winch_fd = self.winch_pipe.as_raw_fd();
        registry.deregister(&mut SourceFd(&winch_fd))?;

        Ok(())
    }

    fn drain_events(&mut self) -> io::Result<Vec<WindowEvent>> {
        let mut events = Vec::new();
        let mut buf = [0u8; 64];

        loop {
            match self.tty.read(&mut buf) {
                Ok(0) => break,
                Ok(read) => {
                    if buf[..read].contains(&QUIT_KEY) {
                        events.push(WindowEvent::CloseRequested);
                    }
                },
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => return Err(err),
            }
        }

        let mut resized = false;
        loop {
            match self.winch_pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => resized = true,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => return Err(err),
            }
        }
        if resized {
            events.push(WindowEvent::Redraw);
        }

        Ok(events)
    }

    fn set_icon(&mut self, pixmap: &Pixmap, mask: &Mask) -> io::Result<()> {
        self.icon = Some((pixmap.clone(), mask.clone()));
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.title = title.to_string();
        self.write_all_retry(format!("\x1b]2;{title}\x07").as_bytes())
    }

    fn present(&mut self) -> io::Result<()> {
        let frame = self.compose_frame();
        self.write_all_retry(frame.as_bytes())
    }
}

impl Drop for TermWindow {
    fn drop(&mut self) {
        low_level::unregister(self.winch_id);
        let _ = self.write_all_retry(b"\x1b[0m\x1b[2J\x1b[H\x1b[?25h");
        let _ = tcsetattr(&self.tty, &self.saved_termios);
    }
}

fn opaque_pixel(pixmap: &Pixmap, mask: &Mask, x: usize, y: usize) -> Option<Rgb> {
    if y >= pixmap.height() {
        return None;
    }
    mask.get(x, y).then(|| pixmap.get(x, y))
}

fn push_half_block(frame: &mut String, top: Option<Rgb>, bottom: Option<Rgb>) {
    match (top, bottom) {
        (None, None) => frame.push_str("\x1b[0m "),
        (Some(t), None) => frame.push_str(&format!(
            "\x1b[0m\x1b[38;2;{};{};{}m\u{2580}",
            t.r, t.g, t.b
        )),
        (None, Some(b)) => frame.push_str(&format!(
            "\x1b[0m\x1b[38;2;{};{};{}m\u{2584}",
            b.r, b.g, b.b
        )),
        (Some(t), Some(b)) => frame.push_str(&format!(
            "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
            t.r, t.g, t.b, b.r, b.g, b.b
        )),
    }
}

fn register_winch_handler() -> io::Result<(UnixStream, SigId)> {
    let (pipe_writer, pipe_reader) = UnixStream::pair()?;
    let pipe_id = pipe::register(SIGWINCH, pipe_writer)?;
    pipe_reader.set_nonblocking(true)?;
    Ok((pipe_reader, pipe_id))
}

fn tcgetattr(tty: &File) -> io::Result<Termios> {
    termios::tcgetattr(tty).map_err(|errno| io::Error::from_raw_os_error(errno as i32))
}

fn tcsetattr(tty: &File, settings: &Termios) -> io::Result<()> {
    termios::tcsetattr(tty, SetArg::TCSANOW, settings)
        .map_err(|errno| io::Error::from_raw_os_error(errno as i32))
}

fn set_nonblocking(raw_fd: i32) -> io::Result<()> {
    unsafe {
        let flags = libc::fcntl(raw_fd, libc::F_GETFL, 0);
        let result = libc::fcntl(raw_fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
        if result != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }
}
