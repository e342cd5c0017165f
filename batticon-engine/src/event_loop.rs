use std::io::ErrorKind;
use std::time::Duration;

use log::debug;
use mio::{Events, Poll, Token};

use batticon_power::PowerSource;

use crate::engine::StatusEngine;
use crate::error::{EngineError, Result};
use crate::exit::ExitPipe;
use crate::window::{StatusWindow, WindowEvent};

pub const WINDOW_TOKEN: Token = Token(0);
pub const EXIT_TOKEN: Token = Token(1);
const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Mio-backed loop multiplexing the window source, the exit pipe and the
/// polling interval.
///
/// Single-threaded by construction: the only suspension point is the
/// blocking wait, and everything between waits runs to completion.
pub struct EventLoop {
    poll: Poll,
    events: Events,
}

impl EventLoop {
    /// Construct a new event loop with the default capacity.
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Construct a new event loop with a custom event capacity.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            poll: Poll::new()?,
            events: Events::with_capacity(capacity.max(4)),
        })
    }

    /// Drive the engine until an exit request or a fatal error.
    ///
    /// One sample-and-render pass runs before the first wait so the icon
    /// is populated immediately. Window readiness repaints the
    /// last-selected face without re-sampling; expiry of the polling
    /// interval samples and, on change, re-selects. An exit request wins
    /// over everything else observed in the same wake-up.
    pub fn run<P, W>(
        &mut self,
        engine: &mut StatusEngine<P>,
        window: &mut W,
        exit: &mut ExitPipe,
    ) -> Result<()>
    where
        P: PowerSource,
        W: StatusWindow,
    {
        window
            .register(self.poll.registry(), WINDOW_TOKEN)
            .map_err(EngineError::Window)?;
        exit.register(self.poll.registry(), EXIT_TOKEN)?;

        let run_result = (|| -> Result<()> {
            engine.refresh(window)?;

            loop {
                let timeout = engine.next_wait();
                self.poll_once(timeout)?;

                let mut redraw = false;
                let mut exit_requested = false;

                for event in self.events.iter() {
                    match event.token() {
                        WINDOW_TOKEN => {
                            let drained =
                                window.drain_events().map_err(EngineError::Window)?;
                            for window_event in drained {
                                match window_event {
                                    WindowEvent::Redraw => redraw = true,
                                    WindowEvent::CloseRequested => {
                                        exit_requested = true;
                                    },
                                }
                            }
                        },
                        EXIT_TOKEN => exit_requested |= exit.drain(),
                        _ => {},
                    }
                }

                if exit_requested {
                    debug!("exit requested, leaving the event loop");
                    break;
                }

                if redraw {
                    engine.render(window)?;
                }

                if engine.poll_due() {
                    engine.refresh(window)?;
                }
            }

            Ok(())
        })();

        let window_deregister = window.deregister(self.poll.registry());
        let exit_deregister = exit.deregister(self.poll.registry());

        run_result?;
        window_deregister.map_err(EngineError::Window)?;
        exit_deregister?;

        Ok(())
    }

    fn poll_once(&mut self, timeout: Duration) -> Result<()> {
        self.events.clear();
        loop {
            match self.poll.poll(&mut self.events, Some(timeout)) {
                Ok(()) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(EngineError::Poll(err)),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::{self, Read, Write};
    use std::os::fd::AsRawFd;
    use std::os::unix::net::UnixStream;
    use std::thread;
    use std::time::Duration;

    use mio::unix::SourceFd;
    use mio::{Interest, Registry, Token};
    use signal_hook::consts::signal::SIGUSR2;
    use signal_hook::low_level::raise;

    use batticon_pixmap::{IconTable, Mask, Pixmap};
    use batticon_power::{FailurePolicy, FakePower};

    use super::*;
    use crate::options::EngineOptions;

    /// Window stub whose event source is a real socket pair: every byte
    /// written to the trigger end wakes the loop and pops one scripted
    /// event.
    struct StubWindow {
        source: UnixStream,
        trigger: UnixStream,
        script: VecDeque<WindowEvent>,
        presents: usize,
        deregistered: usize,
    }

    impl StubWindow {
        fn new(script: impl IntoIterator<Item = WindowEvent>) -> Self {
            let (trigger, source) = UnixStream::pair().unwrap();
            source.set_nonblocking(true).unwrap();
            Self {
                source,
                trigger,
                script: script.into_iter().collect(),
                presents: 0,
                deregistered: 0,
            }
        }

        fn trigger_event(&mut self) {
            self.trigger.write_all(&[1]).unwrap();
        }

        /// Handle for waking the loop from another thread.
        fn remote_trigger(&self) -> UnixStream {
            self.trigger.try_clone().unwrap()
        }
    }

    impl StatusWindow for StubWindow {
        fn register(&mut self, registry: &Registry, token: Token) -> io::Result<()> {
            let fd = self.source.as_raw_fd();
            registry.register(&mut SourceFd(&fd), token, Interest::READABLE)
        }

        fn deregister(&mut self, registry: &Registry) -> io::Result<()> {
            self.deregistered += 1;
            let fd = self.source.as_raw_fd();
            registry.deregister(&mut SourceFd(&fd))
        }

        fn drain_events(&mut self) -> io::Result<Vec<WindowEvent>> {
            let mut buf = [0u8; 16];
            let mut drained = Vec::new();
            loop {
                match self.source.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        for _ in 0..n {
                            if let Some(event) = self.script.pop_front() {
                                drained.push(event);
                            }
                        }
                    },
                    Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                    Err(err) => return Err(err),
                }
            }
            Ok(drained)
        }

        fn set_icon(&mut self, _pixmap: &Pixmap, _mask: &Mask) -> io::Result<()> {
            Ok(())
        }

        fn set_title(&mut self, _title: &str) -> io::Result<()> {
            Ok(())
        }

        fn present(&mut self) -> io::Result<()> {
            self.presents += 1;
            Ok(())
        }
    }

    fn engine_with(fake: FakePower, poll_interval: Duration) -> StatusEngine<FakePower> {
        let icons = IconTable::bundled(false).unwrap();
        let options = EngineOptions {
            poll_interval,
            hidpi: false,
        };
        StatusEngine::new(fake, icons, options)
    }

    #[test]
    fn exit_signal_terminates_within_one_wait_cycle() {
        let mut exit = ExitPipe::install(&[SIGUSR2]).unwrap();
        raise(SIGUSR2).unwrap();

        let mut engine =
            engine_with(FakePower::new(50, false), Duration::from_secs(3600));
        let mut window = StubWindow::new([]);

        EventLoop::new()
            .unwrap()
            .run(&mut engine, &mut window, &mut exit)
            .unwrap();

        // Only the initial sample ran; the hour-long wait was cut short.
        assert_eq!(engine.monitor().source().reads(), 1);
        assert_eq!(window.presents, 1);
        assert_eq!(window.deregistered, 1);
    }

    #[test]
    fn close_request_breaks_the_loop() {
        let mut exit = ExitPipe::install(&[]).unwrap();
        let mut engine =
            engine_with(FakePower::new(50, false), Duration::from_secs(3600));
        let mut window = StubWindow::new([WindowEvent::CloseRequested]);
        window.trigger_event();

        EventLoop::new()
            .unwrap()
            .run(&mut engine, &mut window, &mut exit)
            .unwrap();

        assert_eq!(window.presents, 1);
        assert_eq!(window.deregistered, 1);
    }

    #[test]
    fn redraw_repaints_without_resampling() {
        let mut exit = ExitPipe::install(&[]).unwrap();
        let mut engine =
            engine_with(FakePower::new(50, false), Duration::from_secs(3600));
        let mut window =
            StubWindow::new([WindowEvent::Redraw, WindowEvent::CloseRequested]);
        window.trigger_event();

        let trigger = window.remote_trigger();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(150));
            (&trigger).write_all(&[1]).unwrap();
        });

        EventLoop::new()
            .unwrap()
            .run(&mut engine, &mut window, &mut exit)
            .unwrap();
        stopper.join().unwrap();

        // Initial paint plus the redraw, with no battery read in between.
        assert_eq!(window.presents, 2);
        assert_eq!(engine.monitor().source().reads(), 1);
    }

    #[test]
    fn due_interval_samples_and_fatal_failures_stop_the_loop() {
        let mut exit = ExitPipe::install(&[]).unwrap();

        let mut fake = FakePower::new(50, false).with_policy(FailurePolicy::Fatal);
        fake.push_reading(Some(50), false);
        fake.push_error();
        let mut engine = engine_with(fake, Duration::ZERO);
        let mut window = StubWindow::new([]);

        let result = EventLoop::new()
            .unwrap()
            .run(&mut engine, &mut window, &mut exit);

        // The zero interval made a second sample due immediately and its
        // scripted failure escalated.
        assert!(result.is_err());
        assert_eq!(window.deregistered, 1);
    }

    #[test]
    fn degraded_failure_keeps_the_loop_alive() {
        let mut exit = ExitPipe::install(&[]).unwrap();

        let mut fake = FakePower::new(50, false);
        fake.push_reading(Some(50), false);
        fake.push_error();
        let mut engine = engine_with(fake, Duration::ZERO);
        let mut window = StubWindow::new([WindowEvent::CloseRequested]);

        let trigger = window.remote_trigger();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            (&trigger).write_all(&[1]).unwrap();
        });

        EventLoop::new()
            .unwrap()
            .run(&mut engine, &mut window, &mut exit)
            .unwrap();
        stopper.join().unwrap();

        assert_eq!(window.deregistered, 1);
    }
}
