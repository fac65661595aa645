use std::io;
use std::os::fd::{BorrowedFd, RawFd};

use polling::{Event, Events, PollMode, Poller};

use crate::drivers::{DriverError, WindowSystem, WmEvent};

const DISPLAY_KEY: usize = 0;
const STATUS_KEY: usize = 1;

pub enum ControlFlow {
    Continue,
    /// Stop watching the status feed; it reached end of input.
    CloseStatus,
    Quit,
}

pub enum LoopEvent {
    Window(WmEvent),
    /// The status feed has data (or hit end of input).
    StatusReadable,
}

/// The single blocking loop of the manager.
///
/// Every pass first drains whatever the driver already has queued, then
/// sleeps on a [`Poller`] watching the display connection and the status
/// feed until one of them becomes readable. Handlers run to completion one
/// at a time; nothing else is serviced while a handler (or one of its pan
/// animations) is running.
///
/// Both descriptors are registered level-triggered, so a source stays ready
/// until it has been read. The owners of the descriptors must keep them
/// open for as long as they are registered.
pub struct EventLoop<D> {
    driver: D,
    poller: Poller,
    events: Events,
    display_fd: Option<RawFd>,
    status_fd: Option<RawFd>,
}

impl<D: WindowSystem> EventLoop<D> {
    pub fn new(driver: D, status_fd: Option<RawFd>) -> io::Result<Self> {
        let poller = Poller::new()?;
        let display_fd = driver.raw_fd();
        if let Some(fd) = display_fd {
            register(&poller, fd, DISPLAY_KEY)?;
        }
        if let Some(fd) = status_fd {
            register(&poller, fd, STATUS_KEY)?;
        }
        Ok(Self {
            driver,
            poller,
            events: Events::new(),
            display_fd,
            status_fd,
        })
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Runs until the handler asks to quit, or until there is nothing left
    /// to wait on.
    pub fn run<F, E>(&mut self, mut handler: F) -> Result<(), E>
    where
        F: FnMut(&mut D, LoopEvent) -> Result<ControlFlow, E>,
        E: From<DriverError> + From<io::Error>,
    {
        loop {
            while let Some(event) = self.driver.poll_event()? {
                match handler(&mut self.driver, LoopEvent::Window(event))? {
                    ControlFlow::Continue => {}
                    ControlFlow::CloseStatus => self.close_status()?,
                    ControlFlow::Quit => return Ok(()),
                }
            }

            if self.display_fd.is_none() && self.status_fd.is_none() {
                tracing::debug!("nothing left to wait on");
                return Ok(());
            }

            let (display_ready, status_ready) = self.wait()?;
            if status_ready {
                match handler(&mut self.driver, LoopEvent::StatusReadable)? {
                    ControlFlow::Continue => {}
                    ControlFlow::CloseStatus => self.close_status()?,
                    ControlFlow::Quit => return Ok(()),
                }
            }
            if display_ready {
                tracing::trace!("display readable");
            }
        }
    }

    /// Block until a registered source is readable. Returns which of the
    /// display and the status feed are ready.
    fn wait(&mut self) -> io::Result<(bool, bool)> {
        loop {
            self.events.clear();
            match self.poller.wait(&mut self.events, None) {
                Ok(_) => break,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        let mut ready = (false, false);
        for event in self.events.iter() {
            match event.key {
                DISPLAY_KEY => ready.0 |= event.readable,
                STATUS_KEY => ready.1 |= event.readable,
                _ => {}
            }
        }
        Ok(ready)
    }

    fn close_status(&mut self) -> io::Result<()> {
        if let Some(fd) = self.status_fd.take() {
            // SAFETY: the feed still owns `fd`; it is only closed after the
            // loop is done with it.
            let fd = unsafe { BorrowedFd::borrow_raw(fd) };
            self.poller.delete(fd)?;
            tracing::debug!("status feed unregistered");
        }
        Ok(())
    }
}

fn register(poller: &Poller, fd: RawFd, key: usize) -> io::Result<()> {
    // SAFETY: callers keep `fd` open while it is registered and unregister
    // it (or drop the poller) before closing it.
    unsafe { poller.add_with_mode(fd, Event::readable(key), PollMode::Level) }
}
