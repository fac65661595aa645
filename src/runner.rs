use std::io;

use thiserror::Error;

use crate::drivers::{DriverError, WindowSystem};
use crate::event_loop::{ControlFlow, EventLoop, LoopEvent};
use crate::process;
use crate::status::{StatusError, StatusFeed, parse_status};
use crate::window::{Request, WindowManager};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Drive `wm` with events from `driver` until it quits or every input source
/// is gone.
pub fn run<D: WindowSystem>(
    mut driver: D,
    wm: &mut WindowManager,
    status: Option<StatusFeed>,
) -> Result<(), RunError> {
    driver.grab_bindings(wm.keys(), wm.buttons())?;
    wm.start();
    apply_requests(&mut driver, wm)?;

    let mut status = status;
    if let Some(feed) = &status {
        tracing::info!(source = feed.describe(), "reading status");
    }
    let mut event_loop = EventLoop::new(driver, status.as_ref().map(StatusFeed::raw_fd))?;

    event_loop.run(|driver, event| {
        let mut flow = ControlFlow::Continue;
        match event {
            LoopEvent::Window(event) => wm.handle_event(event),
            LoopEvent::StatusReadable => {
                if !read_status(status.as_mut(), wm)? {
                    flow = ControlFlow::CloseStatus;
                }
            }
        }
        apply_requests(driver, wm)?;
        if !wm.is_running() {
            return Ok(ControlFlow::Quit);
        }
        Ok(flow)
    })
}

/// Take whatever the feed has ready and show the newest complete line.
/// Returns false once the feed is exhausted. The feed itself stays alive
/// until the loop has stopped watching its descriptor.
fn read_status(status: Option<&mut StatusFeed>, wm: &mut WindowManager) -> Result<bool, RunError> {
    let Some(feed) = status else {
        return Ok(false);
    };
    let lines = feed.read_available()?;
    if let Some(line) = lines.last() {
        wm.set_status(parse_status(line));
    }
    if feed.is_closed() {
        tracing::info!(source = feed.describe(), "status feed closed");
        return Ok(false);
    }
    Ok(true)
}

/// Hand everything the manager queued to the driver. Spawns are handled
/// here; each bar paint is flushed right away so animation frames show.
pub fn apply_requests<D: WindowSystem>(
    driver: &mut D,
    wm: &mut WindowManager,
) -> Result<(), RunError> {
    for request in wm.take_requests() {
        match request {
            Request::Spawn(command) => match process::spawn(&command) {
                Ok(pid) => tracing::info!(command, pid, "spawned"),
                Err(err) => tracing::warn!(command, %err, "spawn failed"),
            },
            Request::DrawBar(model) => {
                driver.apply(Request::DrawBar(model))?;
                driver.flush()?;
            }
            other => driver.apply(other)?,
        }
    }
    driver.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::drivers::WmEvent;
    use crate::drivers::headless::HeadlessDriver;
    use crate::geometry::Screen;
    use crate::keybindings::{ButtonBindings, KeyBindings, keysyms, modifiers};
    use std::io::{self, Write};

    fn wm() -> WindowManager {
        WindowManager::new(
            Config::default(),
            KeyBindings::defaults(5),
            ButtonBindings::defaults(),
            Screen::new(800, 600),
            14,
        )
    }

    #[test]
    fn quit_binding_ends_the_run() {
        let mut driver = HeadlessDriver::new(Screen::new(800, 600), 14).with_events([
            WmEvent::KeyPress {
                keysym: keysyms::letter(b'q'),
                state: modifiers::MOD4 | modifiers::SHIFT,
            },
            WmEvent::Expose,
        ]);
        let mut wm = wm();
        run(&mut driver, &mut wm, None).unwrap();
        assert!(!wm.is_running());
        // the expose after quit was never handled
        assert_eq!(driver.poll_event().unwrap(), Some(WmEvent::Expose));
        assert_eq!(driver.grabbed().0, KeyBindings::defaults(5).combos().count());
        assert!(matches!(driver.applied().first(), Some(Request::PlaceBar { y: 0 })));
    }

    #[test]
    fn status_lines_reach_the_bar() {
        let (reader, mut writer) = io::pipe().unwrap();
        writer.write_all(b"old\n{#ff0000}new\n").unwrap();
        drop(writer);
        let mut driver = HeadlessDriver::new(Screen::new(800, 600), 14);
        let mut wm = wm();
        run(&mut driver, &mut wm, Some(StatusFeed::from_reader(reader))).unwrap();

        let last_bar = driver
            .applied()
            .iter()
            .rev()
            .find_map(|r| match r {
                Request::DrawBar(model) => Some(model.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_bar.status.len(), 1);
        assert_eq!(last_bar.status[0].text, "new");
        assert!(last_bar.status[0].color.is_some());
    }

    fn shown_status(wm: &mut WindowManager) -> Vec<String> {
        wm.take_requests()
            .into_iter()
            .rev()
            .find_map(|r| match r {
                Request::DrawBar(model) => Some(model.status),
                _ => None,
            })
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    #[test]
    fn unterminated_status_line_is_held_until_completed() {
        let (reader, mut writer) = io::pipe().unwrap();
        let mut feed = StatusFeed::from_reader(reader);
        let mut wm = wm();

        writer.write_all(b"abc\nde").unwrap();
        assert!(read_status(Some(&mut feed), &mut wm).unwrap());
        assert_eq!(shown_status(&mut wm), vec!["abc"]);

        writer.write_all(b"f\n").unwrap();
        assert!(read_status(Some(&mut feed), &mut wm).unwrap());
        assert_eq!(shown_status(&mut wm), vec!["def"]);

        drop(writer);
        assert!(!read_status(Some(&mut feed), &mut wm).unwrap());
    }
}
