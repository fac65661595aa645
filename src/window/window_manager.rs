use std::collections::VecDeque;

use super::Request;
use crate::actions::Action;
use crate::checkpoint::CheckpointStore;
use crate::client::{Client, ClientRegistry, WindowId};
use crate::config::Config;
use crate::constants::{BIAS_STEP, HIDDEN_PARK_OFFSET, ZOOM_GROW, ZOOM_SHRINK};
use crate::drivers::{WindowAttributes, WmEvent};
use crate::focus::{self, CycleMode};
use crate::geometry::{Geometry, Screen, animation_frames};
use crate::keybindings::{ButtonBindings, KeyBindings, keysym_char};
use crate::layout::floating;
use crate::layout::{LayoutCycle, LayoutKind, LayoutParams, arrange, single};
use crate::panel::BarModel;
use crate::state::{DispatchState, PendingCheckpoint, PointerMode};
use crate::status::StatusSegment;
use crate::tags::{BarState, TagConfigOp, TagPolicy};
use crate::theme::ColorRole;

/// The whole manager state: clients, focus, tags, checkpoints and the
/// dispatcher. It never talks to the display; every side effect is queued as
/// a [`Request`] and drained by the runner with [`take_requests`].
///
/// [`take_requests`]: WindowManager::take_requests
pub struct WindowManager {
    config: Config,
    screen: Screen,
    clients: ClientRegistry,
    focus: Option<WindowId>,
    tags: TagPolicy,
    checkpoints: CheckpointStore,
    layouts: LayoutCycle,
    bias: i32,
    keys: KeyBindings,
    buttons: ButtonBindings,
    dispatch: DispatchState,
    // events held back while a checkpoint key is awaited
    deferred: VecDeque<WmEvent>,
    status: Vec<StatusSegment>,
    requests: Vec<Request>,
    running: bool,
}

impl WindowManager {
    pub fn new(
        config: Config,
        keys: KeyBindings,
        buttons: ButtonBindings,
        screen: Screen,
        bar_height: i32,
    ) -> Self {
        let bar = BarState {
            visible: config.show_bar,
            top: config.top_bar,
            height: bar_height,
        };
        Self {
            tags: TagPolicy::new(config.tag_count(), bar),
            checkpoints: CheckpointStore::with_defaults(screen.height),
            layouts: LayoutCycle::new(config.layouts.clone()),
            config,
            screen,
            clients: ClientRegistry::new(),
            focus: None,
            bias: 0,
            keys,
            buttons,
            dispatch: DispatchState::new(),
            deferred: VecDeque::new(),
            status: Vec::new(),
            requests: Vec::new(),
            running: true,
        }
    }

    /// Place the bar and paint the initial state.
    pub fn start(&mut self) {
        self.place_bar();
        self.redraw();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    pub fn focus(&self) -> Option<WindowId> {
        self.focus
    }

    pub fn tags(&self) -> &TagPolicy {
        &self.tags
    }

    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    pub fn dispatch(&self) -> &DispatchState {
        &self.dispatch
    }

    pub fn bias(&self) -> i32 {
        self.bias
    }

    pub fn keys(&self) -> &KeyBindings {
        &self.keys
    }

    pub fn buttons(&self) -> &ButtonBindings {
        &self.buttons
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            screen: self.screen,
            gap: self.config.gap,
            border: self.config.border_width,
            win_min: self.config.win_min,
            bar: self.tags.bar(),
            bias: self.bias,
        }
    }

    /// Replace the status text shown on the right of the bar.
    pub fn set_status(&mut self, segments: Vec<StatusSegment>) {
        self.status = segments;
        self.redraw();
    }

    pub fn handle_event(&mut self, event: WmEvent) {
        if self.dispatch.awaiting_key() {
            match event {
                WmEvent::KeyPress { keysym, .. } => self.resolve_capture(keysym),
                other => self.deferred.push_back(other),
            }
            return;
        }

        tracing::trace!(?event, "event");
        match event {
            WmEvent::MapRequest {
                window,
                attributes,
                title,
            } => self.manage(window, attributes, title),
            WmEvent::Destroy { window } => self.unmanage(window),
            WmEvent::Unmap { window, synthetic } => {
                if !synthetic {
                    self.unmanage(window);
                }
            }
            WmEvent::TitleChanged { window, title } => {
                if let Some(client) = self.clients.get_mut(window) {
                    client.title = title;
                    self.redraw();
                }
            }
            WmEvent::UrgencyChanged { window, urgent } => {
                let Some(client) = self.clients.get(window) else {
                    return;
                };
                if urgent {
                    let tags = client.tags;
                    self.tags.mark_urgent(tags);
                }
                self.redraw();
            }
            WmEvent::ButtonPress {
                window,
                button,
                state,
                root_x,
                root_y,
            } => self.button_press(window, button, state, root_x, root_y),
            WmEvent::ButtonRelease => {
                self.requests.push(Request::UngrabPointer);
                self.dispatch.end_drag();
            }
            WmEvent::Motion { root_x, root_y } => self.motion(root_x, root_y),
            WmEvent::KeyPress { keysym, state } => {
                for action in self.keys.actions_for(keysym, state) {
                    self.run_action(action);
                }
            }
            WmEvent::Expose => self.redraw(),
            WmEvent::Enter { window } => {
                if self.config.focus_follows_mouse && self.clients.contains(window) {
                    self.focus_client(window);
                    self.redraw();
                }
            }
        }
    }

    pub fn run_action(&mut self, action: Action) {
        tracing::debug!(%action, "action");
        match action {
            Action::Spawn(command) => self.requests.push(Request::Spawn(command)),
            Action::Kill => {
                if let Some(window) = self.focus {
                    self.requests.push(Request::Close(window));
                }
            }
            Action::Quit => {
                tracing::info!("quit requested");
                self.running = false;
            }
            Action::Cycle(mode) => self.cycle(mode),
            Action::CycleLayout => {
                if let Some(kind) = self.layouts.advance() {
                    self.tile(kind);
                }
            }
            Action::Tile(kind) => self.tile(kind),
            Action::Monocle => self.monocle(),
            Action::IncreaseBias => self.adjust_bias(BIAS_STEP),
            Action::DecreaseBias => self.adjust_bias(-BIAS_STEP),
            Action::Tag(tag) => self.set_active_tag(tag),
            Action::ToggleTag(tag) => self.toggle_tag(tag),
            Action::TagConfig(op) => self.configure_tags(op),
            Action::Checkpoint(Some(key)) => self.recall_checkpoint(key),
            Action::Checkpoint(None) => self.begin_capture(PendingCheckpoint::Recall),
            Action::SetCheckpoint(Some(key)) => self.set_checkpoint(key),
            Action::SetCheckpoint(None) => self.begin_capture(PendingCheckpoint::Set),
            Action::Pan { dx, dy } => self.pan(f64::from(dx), f64::from(dy)),
            Action::Maximize => self.maximize(),
            Action::WindowMove => self.start_drag(PointerMode::WindowMove),
            Action::WindowResize => self.start_drag(PointerMode::WindowResize),
            Action::DesktopMove => self.start_drag(PointerMode::DesktopMove),
            Action::WindowGrow => self.zoom_focused(ZOOM_GROW),
            Action::WindowShrink => self.zoom_focused(ZOOM_SHRINK),
            Action::DesktopGrow => self.zoom_at_pointer(ZOOM_GROW),
            Action::DesktopShrink => self.zoom_at_pointer(ZOOM_SHRINK),
        }
    }

    /* ---------------- lifecycle ---------------- */

    fn manage(
        &mut self,
        window: WindowId,
        attributes: Option<WindowAttributes>,
        title: Option<String>,
    ) {
        let Some(attrs) = attributes else {
            tracing::debug!(window, "map request without attributes");
            return;
        };
        if attrs.override_redirect {
            return;
        }
        if self.clients.contains(window) {
            self.redraw();
            return;
        }

        let gap = self.config.gap;
        let bar = self.tags.bar();
        let (mut x, mut y) = (attrs.x, attrs.y);
        if bar.visible && y < bar.top_offset() + gap {
            y = bar.top_offset() + gap;
            x = gap;
        }
        let geometry = Geometry::new(
            f64::from(x),
            f64::from(y),
            f64::from(attrs.width),
            f64::from(attrs.height),
        );
        let mut client = Client::new(window, geometry, self.tags.active_mask());
        client.title = title;

        self.requests.push(Request::SetBorderWidth(
            window,
            self.config.border_width.max(0) as u32,
        ));
        self.requests.push(Request::Map(window));
        self.clients.insert_head(client);
        self.focus_client(window);
        self.redraw();
        tracing::info!(window, x, y, "managing window");
    }

    fn unmanage(&mut self, window: WindowId) {
        let Some((_, index)) = self.clients.remove(window) else {
            return;
        };
        tracing::info!(window, "window released");
        if self.focus == Some(window) {
            self.focus = focus::next_visible_from(&self.clients, index, self.tags.hidden());
            if let Some(next) = self.focus {
                self.focus_client(next);
            }
        }
        if self.focus.is_none()
            && let Some(head) = self.clients.head()
        {
            self.focus = Some(head);
            self.cycle_focus(CycleMode::Onscreen);
        }
        self.redraw();
    }

    /* ---------------- focus ---------------- */

    fn focus_client(&mut self, window: WindowId) {
        self.focus = Some(window);
        self.clients.raise(window);
        self.requests.push(Request::Focus(window));
        self.requests.push(Request::Raise(window));
    }

    fn cycle(&mut self, mode: CycleMode) {
        if self.focus.is_none() {
            return;
        }
        self.cycle_focus(mode);
        self.redraw();
    }

    fn cycle_focus(&mut self, mode: CycleMode) {
        let Some(current) = self.focus else {
            return;
        };
        let Some(next) =
            focus::next_in_cycle(&self.clients, current, mode, self.tags.hidden(), self.screen)
        else {
            return;
        };
        self.focus_client(next);
        if self.config.scroll_to_focused {
            self.pan_to(next);
        }
    }

    /// Bring an off-screen client into view.
    fn pan_to(&mut self, window: WindowId) {
        let Some(client) = self.clients.get(window) else {
            return;
        };
        let top_offset = self.tags.bar().top_offset();
        if let Some((dx, dy)) =
            focus::autopan_vector(&client.geometry, self.screen, self.config.gap, top_offset)
        {
            self.pan(dx, dy);
        }
    }

    /* ---------------- canvas ---------------- */

    /// Animated pan: each frame moves the canvas and redraws.
    fn pan(&mut self, dx: f64, dy: f64) {
        for (fx, fy) in animation_frames(dx, dy, self.config.pan_step()) {
            self.translate_canvas(fx, fy);
        }
    }

    fn translate_canvas(&mut self, dx: f64, dy: f64) {
        self.clients.translate(dx, dy, self.tags.sticky());
        self.checkpoints.update(dx, dy, 1.0);
        self.redraw();
    }

    fn zoom_canvas(&mut self, factor: f64, px: f64, py: f64) {
        self.clients.scale_about(
            factor,
            px,
            py,
            self.tags.sticky(),
            f64::from(self.config.zoom_min),
        );
        self.checkpoints.update(px, py, factor);
        self.redraw();
    }

    fn pointer_origin(&self) -> (f64, f64) {
        let (x, y) = self.dispatch.origin().unwrap_or((0, 0));
        (f64::from(x), f64::from(y))
    }

    fn zoom_at_pointer(&mut self, factor: f64) {
        let (px, py) = self.pointer_origin();
        self.zoom_canvas(factor, px, py);
    }

    /// Zoom only the focused client. Checkpoints are unaffected.
    fn zoom_focused(&mut self, factor: f64) {
        let (px, py) = self.pointer_origin();
        let min = f64::from(self.config.zoom_min);
        let Some(client) = self.focus.and_then(|w| self.clients.get_mut(w)) else {
            return;
        };
        client.geometry.scale_about(factor, px, py, min);
        self.redraw();
    }

    /* ---------------- checkpoints ---------------- */

    fn begin_capture(&mut self, op: PendingCheckpoint) {
        tracing::debug!(?op, "waiting for checkpoint key");
        self.dispatch.begin_capture(op);
        self.requests.push(Request::GrabKeyboard);
    }

    fn resolve_capture(&mut self, keysym: u32) {
        let Some(op) = self.dispatch.finish_capture() else {
            return;
        };
        self.requests.push(Request::UngrabKeyboard);
        match (op, keysym_char(keysym)) {
            (PendingCheckpoint::Recall, Some(key)) => self.recall_checkpoint(key),
            (PendingCheckpoint::Set, Some(key)) => self.set_checkpoint(key),
            (_, None) => tracing::debug!(keysym, "checkpoint capture cancelled"),
        }

        // Replay what arrived during the capture. A replayed binding may start
        // another capture, in which case the rest is deferred again.
        let held = std::mem::take(&mut self.deferred);
        for event in held {
            self.handle_event(event);
        }
    }

    fn set_checkpoint(&mut self, key: char) {
        self.checkpoints.set(key);
        self.redraw();
    }

    fn recall_checkpoint(&mut self, key: char) {
        let Some(checkpoint) = self.checkpoints.get(key).cloned() else {
            tracing::debug!(checkpoint = %key, "no such checkpoint");
            return;
        };
        tracing::debug!(checkpoint = %key, "recalling checkpoint");
        self.pan(-checkpoint.x, -checkpoint.y);
        self.zoom_canvas(1.0 / checkpoint.zoom, 0.0, 0.0);

        let hidden = self.tags.hidden();
        let target = self
            .clients
            .iter()
            .find(|c| focus::is_onscreen(&c.geometry, self.screen) || c.is_hidden(hidden))
            .map(Client::window);
        if let Some(window) = target {
            self.focus_client(window);
        }
        self.redraw();
    }

    /* ---------------- tags ---------------- */

    fn set_active_tag(&mut self, tag: usize) {
        if !self.tags.set_active(tag) {
            return;
        }
        let members: Vec<WindowId> = self
            .clients
            .iter()
            .filter(|c| c.tags.contains(tag))
            .map(Client::window)
            .collect();
        for window in &members {
            self.clients.raise(*window);
            self.requests.push(Request::Raise(*window));
        }
        let focus_in_tag = self
            .focus
            .and_then(|w| self.clients.get(w))
            .is_some_and(|c| c.tags.contains(tag));
        if !focus_in_tag && let Some(first) = members.first() {
            self.focus_client(*first);
        }
        self.redraw();
    }

    fn toggle_tag(&mut self, tag: usize) {
        if !self.tags.is_valid(tag) {
            return;
        }
        let Some(client) = self.focus.and_then(|w| self.clients.get_mut(w)) else {
            return;
        };
        client.tags.toggle(tag);
        self.redraw();
    }

    fn configure_tags(&mut self, op: TagConfigOp) {
        self.tags.apply(op);
        self.place_bar();
        self.redraw();
    }

    fn place_bar(&mut self) {
        let y = self.tags.bar().window_y(self.screen.height);
        self.requests.push(Request::PlaceBar { y });
    }

    /* ---------------- layouts ---------------- */

    fn tile(&mut self, kind: LayoutKind) {
        let hidden = self.tags.hidden();
        let windows: Vec<WindowId> = self
            .clients
            .iter()
            .filter(|c| !c.is_hidden(hidden))
            .map(Client::window)
            .collect();
        let plan = arrange(kind, &windows, &self.layout_params());
        tracing::debug!(layout = %kind, clients = windows.len(), "tiling");
        for (window, geometry) in plan.placements {
            if let Some(client) = self.clients.get_mut(window) {
                client.geometry = geometry;
            }
        }
        if let Some(window) = plan.raise {
            self.clients.raise(window);
            self.requests.push(Request::Raise(window));
        }
        self.redraw();
    }

    fn monocle(&mut self) {
        let geometry = single(&self.layout_params());
        if let Some(client) = self.focus.and_then(|w| self.clients.get_mut(w)) {
            client.geometry = geometry;
        }
        self.redraw();
    }

    fn maximize(&mut self) {
        let Some(window) = self.focus else {
            return;
        };
        let geometry = floating::maximized(&self.layout_params());
        if let Some(client) = self.clients.get_mut(window) {
            client.geometry = geometry;
        }
        self.clients.raise(window);
        self.requests.push(Request::Raise(window));
        self.redraw();
    }

    /// Bias only changes future master-stack arrangements.
    fn adjust_bias(&mut self, delta: i32) {
        self.bias += delta;
        self.redraw();
    }

    /* ---------------- pointer ---------------- */

    fn button_press(
        &mut self,
        window: Option<WindowId>,
        button: u8,
        state: u16,
        root_x: i32,
        root_y: i32,
    ) {
        let client = window.filter(|w| self.clients.contains(*w));
        if let Some(w) = client {
            self.focus = Some(w);
        }
        if state == 0 && self.focus.is_none() {
            return;
        }
        self.dispatch.set_origin(root_x, root_y);
        for action in self.buttons.actions_for(button, state) {
            self.run_action(action);
        }
        if let Some(w) = client {
            self.focus_client(w);
            self.redraw();
        }
        if self.dispatch.pointer_mode() != PointerMode::Off {
            self.requests.push(Request::GrabPointer);
        }
    }

    fn start_drag(&mut self, mode: PointerMode) {
        let (x, y) = self.dispatch.origin().unwrap_or((0, 0));
        self.dispatch.begin_drag(mode, x, y);
    }

    fn motion(&mut self, x: i32, y: i32) {
        let Some((dx, dy)) = self.dispatch.drag_motion(x, y) else {
            return;
        };
        let min = f64::from(self.config.zoom_min);
        match self.dispatch.pointer_mode() {
            PointerMode::Off => {}
            PointerMode::WindowMove => {
                if let Some(client) = self.focus.and_then(|w| self.clients.get_mut(w)) {
                    floating::move_by(&mut client.geometry, dx, dy);
                    self.redraw();
                }
            }
            PointerMode::WindowResize => {
                if let Some(client) = self.focus.and_then(|w| self.clients.get_mut(w)) {
                    floating::resize_by(&mut client.geometry, dx, dy, min);
                    self.redraw();
                }
            }
            PointerMode::DesktopMove => self.translate_canvas(dx, dy),
        }
    }

    /* ---------------- drawing ---------------- */

    /// Push the current state to the display: every client's position and
    /// border colour, then the bar. Never skipped, even when nothing changed.
    fn redraw(&mut self) {
        let focused_tags = self.focus.and_then(|w| self.clients.get(w)).map(|c| c.tags);
        self.tags.acknowledge(focused_tags);

        let hidden = self.tags.hidden();
        let sticky = self.tags.sticky();
        let palette = &self.config.palette;
        let park_x = self.screen.width + HIDDEN_PARK_OFFSET;
        let win_min = self.config.win_min.max(0) as u32;

        for client in self.clients.iter() {
            let window = client.window();
            if client.is_hidden(hidden) {
                self.requests.push(Request::Move(window, park_x, 0));
                continue;
            }
            self.requests
                .push(Request::MoveResize(window, client.geometry.to_screen(win_min)));
            let role = if self.config.highlight_focused && self.focus == Some(window) {
                ColorRole::Hidden
            } else if client.is_sticky(sticky) {
                ColorRole::Sticky
            } else {
                ColorRole::Normal
            };
            self.requests
                .push(Request::SetBorderColor(window, palette.get(role)));
        }

        let model = BarModel::build(
            &self.clients,
            self.focus,
            &self.tags,
            &self.config.tag_names,
            self.screen,
            &self.status,
        );
        self.requests.push(Request::DrawBar(model));
        self.requests.push(Request::RaiseBar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::{keysyms, modifiers};

    fn wm() -> WindowManager {
        WindowManager::new(
            Config::default(),
            KeyBindings::defaults(5),
            ButtonBindings::defaults(),
            Screen::new(1000, 800),
            20,
        )
    }

    fn map(wm: &mut WindowManager, window: WindowId, x: i32, y: i32) {
        wm.handle_event(WmEvent::MapRequest {
            window,
            attributes: Some(WindowAttributes {
                x,
                y,
                width: 200,
                height: 100,
                override_redirect: false,
            }),
            title: None,
        });
    }

    #[test]
    fn manage_pushes_window_below_the_bar() {
        let mut wm = wm();
        map(&mut wm, 7, 300, 5);
        let client = wm.clients().get(7).unwrap();
        assert_eq!((client.geometry.x, client.geometry.y), (4.0, 24.0));
        assert_eq!(wm.focus(), Some(7));
        let requests = wm.take_requests();
        assert!(requests.contains(&Request::Map(7)));
        assert!(requests.contains(&Request::SetBorderWidth(7, 1)));
        assert!(matches!(requests.last(), Some(Request::RaiseBar)));
    }

    #[test]
    fn override_redirect_and_missing_attributes_are_ignored() {
        let mut wm = wm();
        wm.handle_event(WmEvent::MapRequest {
            window: 1,
            attributes: None,
            title: None,
        });
        wm.handle_event(WmEvent::MapRequest {
            window: 2,
            attributes: Some(WindowAttributes {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
                override_redirect: true,
            }),
            title: None,
        });
        assert!(wm.clients().is_empty());
        assert!(wm.take_requests().is_empty());
    }

    #[test]
    fn synthetic_unmap_keeps_the_client() {
        let mut wm = wm();
        map(&mut wm, 1, 100, 100);
        wm.handle_event(WmEvent::Unmap {
            window: 1,
            synthetic: true,
        });
        assert!(wm.clients().contains(1));
        wm.handle_event(WmEvent::Unmap {
            window: 1,
            synthetic: false,
        });
        assert!(wm.clients().is_empty());
        assert_eq!(wm.focus(), None);
    }

    #[test]
    fn hidden_clients_are_parked_off_screen() {
        let mut wm = wm();
        map(&mut wm, 1, 100, 100);
        wm.take_requests();
        wm.run_action(Action::TagConfig(TagConfigOp::Hide));
        let requests = wm.take_requests();
        assert!(requests.contains(&Request::Move(1, 1002, 0)));
        assert!(
            !requests
                .iter()
                .any(|r| matches!(r, Request::SetBorderColor(1, _)))
        );
    }

    #[test]
    fn focused_border_uses_highlight_colour() {
        let mut wm = wm();
        map(&mut wm, 1, 100, 100);
        map(&mut wm, 2, 400, 100);
        let palette = wm.config().palette.clone();
        let requests = wm.take_requests();
        let last_colour = |w: WindowId| {
            requests.iter().rev().find_map(|r| match r {
                Request::SetBorderColor(id, c) if *id == w => Some(*c),
                _ => None,
            })
        };
        assert_eq!(last_colour(2), Some(palette.get(ColorRole::Hidden)));
        assert_eq!(last_colour(1), Some(palette.get(ColorRole::Normal)));
    }

    #[test]
    fn urgency_on_unfocused_client_marks_its_tags() {
        let mut wm = wm();
        map(&mut wm, 1, 100, 100);
        wm.run_action(Action::ToggleTag(1));
        wm.run_action(Action::ToggleTag(0));
        map(&mut wm, 2, 100, 100);
        wm.handle_event(WmEvent::UrgencyChanged {
            window: 1,
            urgent: true,
        });
        assert!(wm.tags().urgent().contains(1));
        // switching to the tag acknowledges it
        wm.run_action(Action::Tag(1));
        assert!(!wm.tags().urgent().contains(1));
        assert_eq!(wm.focus(), Some(1));
    }

    #[test]
    fn kill_and_spawn_become_requests() {
        let mut wm = wm();
        map(&mut wm, 3, 100, 100);
        wm.take_requests();
        wm.handle_event(WmEvent::KeyPress {
            keysym: keysyms::letter(b'q'),
            state: modifiers::MOD4,
        });
        assert_eq!(wm.take_requests(), vec![Request::Close(3)]);
        wm.run_action(Action::Spawn("xterm".into()));
        assert_eq!(wm.take_requests(), vec![Request::Spawn("xterm".into())]);
    }

    #[test]
    fn quit_stops_the_manager() {
        let mut wm = wm();
        assert!(wm.is_running());
        wm.handle_event(WmEvent::KeyPress {
            keysym: keysyms::letter(b'q'),
            state: modifiers::MOD4 | modifiers::SHIFT,
        });
        assert!(!wm.is_running());
    }

    #[test]
    fn desktop_drag_moves_canvas_and_checkpoints() {
        let mut wm = wm();
        map(&mut wm, 1, 100, 100);
        wm.handle_event(WmEvent::ButtonPress {
            window: None,
            button: 1,
            state: modifiers::MOD4 | modifiers::SHIFT,
            root_x: 10,
            root_y: 10,
        });
        assert_eq!(wm.dispatch().pointer_mode(), PointerMode::DesktopMove);
        assert!(wm.take_requests().contains(&Request::GrabPointer));
        wm.handle_event(WmEvent::Motion {
            root_x: 60,
            root_y: 30,
        });
        let g = wm.clients().get(1).unwrap().geometry;
        assert_eq!((g.x, g.y), (150.0, 120.0));
        assert_eq!(wm.checkpoints().get('1').unwrap().x, 50.0);
        wm.handle_event(WmEvent::ButtonRelease);
        assert_eq!(wm.dispatch().pointer_mode(), PointerMode::Off);
        assert!(wm.take_requests().contains(&Request::UngrabPointer));
    }

    #[test]
    fn window_resize_respects_zoom_floor() {
        let mut wm = wm();
        map(&mut wm, 1, 100, 100);
        wm.handle_event(WmEvent::ButtonPress {
            window: Some(1),
            button: 3,
            state: modifiers::MOD4,
            root_x: 300,
            root_y: 200,
        });
        wm.handle_event(WmEvent::Motion {
            root_x: 0,
            root_y: 0,
        });
        let g = wm.clients().get(1).unwrap().geometry;
        assert_eq!((g.w, g.h), (20.0, 20.0));
    }

    #[test]
    fn bias_does_not_retile() {
        let mut wm = wm();
        map(&mut wm, 1, 100, 100);
        let before = wm.clients().get(1).unwrap().geometry;
        wm.run_action(Action::IncreaseBias);
        assert_eq!(wm.bias(), 2);
        assert_eq!(wm.clients().get(1).unwrap().geometry, before);
    }

    #[test]
    fn bar_toggle_moves_bar_off_screen() {
        let mut wm = wm();
        wm.run_action(Action::TagConfig(TagConfigOp::ToggleBar));
        let requests = wm.take_requests();
        assert!(requests.contains(&Request::PlaceBar { y: -20 }));
    }
}
