//! In-memory window system: replays scripted events and records every
//! request it is asked to apply. Used by tests.

use std::collections::VecDeque;
use std::os::fd::RawFd;

use super::{DriverError, WindowSystem, WmEvent};
use crate::geometry::Screen;
use crate::keybindings::{ButtonBindings, KeyBindings};
use crate::window::Request;

#[derive(Debug, Default)]
pub struct HeadlessDriver {
    screen: Screen,
    bar_height: i32,
    events: VecDeque<WmEvent>,
    applied: Vec<Request>,
    grabbed_keys: usize,
    grabbed_buttons: usize,
    flushes: usize,
}

impl HeadlessDriver {
    pub fn new(screen: Screen, bar_height: i32) -> Self {
        Self {
            screen,
            bar_height,
            ..Self::default()
        }
    }

    pub fn push_event(&mut self, event: WmEvent) {
        self.events.push_back(event);
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = WmEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn applied(&self) -> &[Request] {
        &self.applied
    }

    pub fn take_applied(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.applied)
    }

    pub fn grabbed(&self) -> (usize, usize) {
        (self.grabbed_keys, self.grabbed_buttons)
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl WindowSystem for HeadlessDriver {
    fn screen(&self) -> Screen {
        self.screen
    }

    fn bar_height(&self) -> i32 {
        self.bar_height
    }

    fn raw_fd(&self) -> Option<RawFd> {
        None
    }

    fn poll_event(&mut self) -> Result<Option<WmEvent>, DriverError> {
        Ok(self.events.pop_front())
    }

    fn apply(&mut self, request: Request) -> Result<(), DriverError> {
        self.applied.push(request);
        Ok(())
    }

    fn grab_bindings(
        &mut self,
        keys: &KeyBindings,
        buttons: &ButtonBindings,
    ) -> Result<(), DriverError> {
        self.grabbed_keys = keys.combos().count();
        self.grabbed_buttons = buttons.combos().count();
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_events_in_order_and_records_requests() {
        let mut driver = HeadlessDriver::new(Screen::new(800, 600), 14)
            .with_events([WmEvent::Expose, WmEvent::ButtonRelease]);
        assert_eq!(driver.poll_event().unwrap(), Some(WmEvent::Expose));
        assert_eq!(driver.poll_event().unwrap(), Some(WmEvent::ButtonRelease));
        assert_eq!(driver.poll_event().unwrap(), None);

        driver.apply(Request::RaiseBar).unwrap();
        assert_eq!(driver.applied(), &[Request::RaiseBar]);
        assert_eq!(driver.take_applied().len(), 1);
        assert!(driver.applied().is_empty());
    }

    #[test]
    fn forwards_through_mut_ref() {
        fn bar_of(ws: impl WindowSystem) -> i32 {
            ws.bar_height()
        }
        let mut driver = HeadlessDriver::new(Screen::new(800, 600), 14);
        assert_eq!(bar_of(&mut driver), 14);
    }
}
