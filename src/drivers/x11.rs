//! X11 backend built on `x11rb`.
//!
//! Owns the connection, the bar window and its graphics context. Requests
//! are fire-and-forget; protocol errors come back asynchronously as error
//! events and are only logged.

use std::os::fd::{AsRawFd, RawFd};

use x11rb::connection::Connection;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::Event;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use super::{DriverError, WindowAttributes, WindowSystem, WmEvent};
use crate::client::WindowId;
use crate::colors::Rgb;
use crate::config::Config;
use crate::geometry::Screen;
use crate::keybindings::{ButtonBindings, ButtonCombo, KeyBindings, KeyCombo};
use crate::panel::BarModel;
use crate::theme::{ColorRole, Palette};
use crate::window::Request;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,
        _NET_WM_NAME,
        UTF8_STRING,
    }
}

/// `XUrgencyHint` in the `WM_HINTS` flags word.
const URGENCY_HINT: u32 = 1 << 8;
const BAR_PADDING: i16 = 10;
/// Longest string a single `ImageText8` request can carry.
const MAX_TEXT8: usize = 255;

impl From<ConnectError> for DriverError {
    fn from(err: ConnectError) -> Self {
        DriverError::Connect(err.to_string())
    }
}

impl From<ConnectionError> for DriverError {
    fn from(err: ConnectionError) -> Self {
        DriverError::Connection(err.to_string())
    }
}

impl From<ReplyError> for DriverError {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::ConnectionError(e) => e.into(),
            ReplyError::X11Error(e) => DriverError::Reply(format!("{:?}", e)),
        }
    }
}

impl From<ReplyOrIdError> for DriverError {
    fn from(err: ReplyOrIdError) -> Self {
        match err {
            ReplyOrIdError::IdsExhausted => DriverError::IdExhausted(err.to_string()),
            ReplyOrIdError::ConnectionError(e) => e.into(),
            ReplyOrIdError::X11Error(e) => DriverError::Reply(format!("{:?}", e)),
        }
    }
}

struct KeyboardMap {
    min_keycode: Keycode,
    per_keycode: usize,
    keysyms: Vec<Keysym>,
}

impl KeyboardMap {
    fn keysym(&self, keycode: Keycode) -> Keysym {
        let idx = usize::from(keycode.saturating_sub(self.min_keycode)) * self.per_keycode;
        self.keysyms.get(idx).copied().unwrap_or(0)
    }

    fn keycode(&self, keysym: Keysym) -> Option<Keycode> {
        self.keysyms
            .chunks(self.per_keycode.max(1))
            .position(|chunk| chunk.contains(&keysym))
            .and_then(|i| u8::try_from(i).ok())
            .map(|i| self.min_keycode.saturating_add(i))
    }
}

pub struct X11Driver {
    conn: RustConnection,
    root: Window,
    screen: Screen,
    atoms: Atoms,
    bar: Window,
    gc: Gcontext,
    bar_height: i32,
    /// Text baseline inside the bar.
    baseline: i16,
    char_width: i16,
    palette: Palette,
    keyboard: KeyboardMap,
    key_grabs: Vec<KeyCombo>,
    button_grabs: Vec<ButtonCombo>,
    // event read ahead while collapsing motion
    pending: Option<WmEvent>,
}

impl X11Driver {
    /// Connect to `$DISPLAY`, take over window management and create the
    /// bar. Fails if another window manager already owns the root window.
    pub fn connect(config: &Config) -> Result<Self, DriverError> {
        let (conn, screen_num) = RustConnection::connect(None)?;
        let (root, screen, depth) = {
            let s = &conn.setup().roots[screen_num];
            (
                s.root,
                Screen::new(i32::from(s.width_in_pixels), i32::from(s.height_in_pixels)),
                s.root_depth,
            )
        };
        tracing::info!(
            screen = screen_num,
            width = screen.width,
            height = screen.height,
            "connected to display"
        );

        become_wm(&conn, root)?;
        let atoms = Atoms::new(&conn)?.reply()?;

        let font = conn.generate_id()?;
        conn.open_font(font, config.font.as_bytes())?;
        let metrics = conn.query_font(font)?.reply()?;
        let baseline = metrics.font_ascent + 1;
        let bar_height = i32::from(metrics.font_ascent) + i32::from(metrics.font_descent) + 2;
        let char_width = metrics.max_bounds.character_width.max(1);

        let palette = config.palette.clone();
        let background = palette.get(ColorRole::Background).to_pixel();
        let bar = conn.generate_id()?;
        conn.create_window(
            depth,
            bar,
            root,
            0,
            0,
            screen.width as u16,
            bar_height as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .override_redirect(1)
                .background_pixel(background)
                .event_mask(EventMask::EXPOSURE),
        )?;
        conn.map_window(bar)?;

        let gc = conn.generate_id()?;
        conn.create_gc(
            gc,
            bar,
            &CreateGCAux::new()
                .font(font)
                .foreground(palette.get(ColorRole::Default).to_pixel())
                .background(background),
        )?;
        conn.close_font(font)?;

        let keyboard = load_keyboard(&conn)?;
        conn.flush()?;

        Ok(Self {
            conn,
            root,
            screen,
            atoms,
            bar,
            gc,
            bar_height,
            baseline,
            char_width,
            palette,
            keyboard,
            key_grabs: Vec::new(),
            button_grabs: Vec::new(),
            pending: None,
        })
    }

    fn regrab(&mut self) -> Result<(), DriverError> {
        const EXTRA: [u16; 4] = [0, 2, 16, 2 | 16];
        self.conn.ungrab_key(Grab::ANY, self.root, ModMask::ANY)?;
        for combo in &self.key_grabs {
            let Some(keycode) = self.keyboard.keycode(combo.keysym) else {
                tracing::warn!(key = %combo, "no keycode for binding");
                continue;
            };
            for extra in EXTRA {
                self.conn.grab_key(
                    true,
                    self.root,
                    ModMask::from(combo.mods | extra),
                    keycode,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                )?;
            }
        }
        self.conn.ungrab_button(ButtonIndex::ANY, self.root, ModMask::ANY)?;
        for combo in &self.button_grabs {
            for extra in EXTRA {
                self.conn.grab_button(
                    true,
                    self.root,
                    EventMask::BUTTON_PRESS,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                    x11rb::NONE,
                    x11rb::NONE,
                    ButtonIndex::from(combo.button),
                    ModMask::from(combo.mods | extra),
                )?;
            }
        }
        tracing::debug!(
            keys = self.key_grabs.len(),
            buttons = self.button_grabs.len(),
            "bindings grabbed"
        );
        Ok(())
    }

    fn title(&self, window: Window) -> Option<String> {
        let utf8 = self
            .conn
            .get_property(
                false,
                window,
                self.atoms._NET_WM_NAME,
                self.atoms.UTF8_STRING,
                0,
                1024,
            )
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .filter(|reply| !reply.value.is_empty())
            .map(|reply| String::from_utf8_lossy(&reply.value).into_owned());
        if utf8.is_some() {
            return utf8;
        }
        self.conn
            .get_property(false, window, AtomEnum::WM_NAME, AtomEnum::STRING, 0, 1024)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .filter(|reply| !reply.value.is_empty())
            .map(|reply| reply.value.iter().map(|b| char::from(*b)).collect())
    }

    fn is_urgent(&self, window: Window) -> bool {
        self.conn
            .get_property(false, window, AtomEnum::WM_HINTS, AtomEnum::WM_HINTS, 0, 9)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .and_then(|reply| reply.value32().and_then(|mut words| words.next()))
            .is_some_and(|flags| flags & URGENCY_HINT != 0)
    }

    fn attributes(&self, window: Window) -> Option<WindowAttributes> {
        let attrs = self.conn.get_window_attributes(window).ok()?.reply();
        let geometry = self.conn.get_geometry(window).ok()?.reply();
        match (attrs, geometry) {
            (Ok(attrs), Ok(geometry)) => Some(WindowAttributes {
                x: i32::from(geometry.x),
                y: i32::from(geometry.y),
                width: u32::from(geometry.width),
                height: u32::from(geometry.height),
                override_redirect: attrs.override_redirect,
            }),
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(window, %err, "cannot query window attributes");
                None
            }
        }
    }

    fn supports_delete(&self, window: Window) -> bool {
        self.conn
            .get_property(false, window, self.atoms.WM_PROTOCOLS, AtomEnum::ATOM, 0, 32)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .and_then(|reply| {
                reply
                    .value32()
                    .map(|mut atoms| atoms.any(|a| a == self.atoms.WM_DELETE_WINDOW))
            })
            .unwrap_or(false)
    }

    fn close(&self, window: Window) -> Result<(), DriverError> {
        if self.supports_delete(window) {
            let event = ClientMessageEvent::new(
                32,
                window,
                self.atoms.WM_PROTOCOLS,
                [self.atoms.WM_DELETE_WINDOW, 0, 0, 0, 0],
            );
            self.conn
                .send_event(false, window, EventMask::NO_EVENT, event)?;
            tracing::debug!(window, "sent WM_DELETE_WINDOW");
        } else {
            self.conn.kill_client(window)?;
            tracing::debug!(window, "killed client");
        }
        Ok(())
    }

    /// Decode one X event. `None` for events the manager does not care about.
    fn translate(&mut self, event: Event) -> Result<Option<WmEvent>, DriverError> {
        let event = match event {
            Event::MapRequest(e) => WmEvent::MapRequest {
                window: e.window,
                attributes: self.attributes(e.window),
                title: self.title(e.window),
            },
            Event::DestroyNotify(e) => WmEvent::Destroy { window: e.window },
            Event::UnmapNotify(e) => WmEvent::Unmap {
                window: e.window,
                synthetic: e.response_type & 0x80 != 0,
            },
            Event::PropertyNotify(e) => {
                if e.atom == Atom::from(AtomEnum::WM_NAME) || e.atom == self.atoms._NET_WM_NAME {
                    WmEvent::TitleChanged {
                        window: e.window,
                        title: self.title(e.window),
                    }
                } else if e.atom == Atom::from(AtomEnum::WM_HINTS) {
                    WmEvent::UrgencyChanged {
                        window: e.window,
                        urgent: self.is_urgent(e.window),
                    }
                } else {
                    return Ok(None);
                }
            }
            Event::ButtonPress(e) => WmEvent::ButtonPress {
                window: (e.child != x11rb::NONE).then_some(e.child),
                button: e.detail,
                state: u16::from(e.state),
                root_x: i32::from(e.root_x),
                root_y: i32::from(e.root_y),
            },
            Event::ButtonRelease(_) => WmEvent::ButtonRelease,
            Event::MotionNotify(e) => WmEvent::Motion {
                root_x: i32::from(e.root_x),
                root_y: i32::from(e.root_y),
            },
            Event::KeyPress(e) => WmEvent::KeyPress {
                keysym: self.keyboard.keysym(e.detail),
                state: u16::from(e.state),
            },
            Event::Expose(e) if e.count == 0 => WmEvent::Expose,
            Event::EnterNotify(e) => WmEvent::Enter { window: e.event },
            Event::MappingNotify(e) => {
                if e.request != Mapping::POINTER {
                    tracing::debug!("keyboard mapping changed");
                    self.keyboard = load_keyboard(&self.conn)?;
                    self.regrab()?;
                }
                return Ok(None);
            }
            Event::Error(err) => {
                tracing::warn!(?err, "protocol error");
                return Ok(None);
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Skip straight to the newest motion event already available.
    fn compress_motion(&mut self, latest: WmEvent) -> Result<WmEvent, DriverError> {
        let (latest, pending) =
            coalesce_motion(latest, || -> Result<Option<Option<WmEvent>>, DriverError> {
                match self.conn.poll_for_event()? {
                    Some(raw) => self.translate(raw).map(Some),
                    None => Ok(None),
                }
            })?;
        self.pending = pending;
        Ok(latest)
    }

    fn set_foreground(&self, color: Rgb) -> Result<(), DriverError> {
        self.conn
            .change_gc(self.gc, &ChangeGCAux::new().foreground(color.to_pixel()))?;
        Ok(())
    }

    fn text_width(&self, text: &str) -> i16 {
        let chars = text.chars().count().min(MAX_TEXT8) as i16;
        chars.saturating_mul(self.char_width)
    }

    fn draw_text(&self, x: i16, text: &str) -> Result<i16, DriverError> {
        let bytes = latin1(text);
        if !bytes.is_empty() {
            self.conn
                .image_text8(self.bar, self.gc, x, self.baseline, &bytes)?;
        }
        Ok(self.text_width(text))
    }

    fn fill(&self, x: i16, y: i16, width: i16, height: i16) -> Result<(), DriverError> {
        self.conn.poly_fill_rectangle(
            self.bar,
            self.gc,
            &[Rectangle {
                x,
                y,
                width: width.max(0) as u16,
                height: height.max(0) as u16,
            }],
        )?;
        Ok(())
    }

    fn draw_bar(&self, model: &BarModel) -> Result<(), DriverError> {
        let background = self.palette.get(ColorRole::Background);
        let bar_height = self.bar_height as i16;
        let width = self.screen.width as i16;
        self.conn
            .change_gc(self.gc, &ChangeGCAux::new().background(background.to_pixel()))?;
        self.set_foreground(background)?;
        self.fill(0, 0, width, bar_height)?;

        let mut x = BAR_PADDING;
        for tag in &model.tags {
            self.set_foreground(self.palette.get(tag.role))?;
            let w = self.draw_text(x, &tag.name)?;
            if tag.active {
                self.fill(x - 2, self.baseline + 1, w + 4, bar_height - self.baseline)?;
            }
            x += w + BAR_PADDING;
        }

        if let Some(overview) = &model.overview {
            x = (x + 20).max(width / 10);
            let top = self.baseline - 9;
            self.set_foreground(self.palette.get(ColorRole::Default))?;
            let outline: Vec<Rectangle> = [(0, 0), (0, 3), (3, 0), (3, 3)]
                .iter()
                .map(|(dx, dy)| Rectangle {
                    x: x + dx,
                    y: top + dy,
                    width: 6,
                    height: 6,
                })
                .collect();
            self.conn.poly_rectangle(self.bar, self.gc, &outline)?;
            self.set_foreground(self.palette.get(ColorRole::Hidden))?;
            for column in 0..3 {
                for row in 0..3 {
                    if overview.occupied(column, row) {
                        self.fill(x + 3 * column as i16, top + 3 * row as i16, 4, 4)?;
                    }
                }
            }
            x += 20;
        }

        if let Some(focused) = &model.focused {
            self.set_foreground(self.palette.get(ColorRole::Title))?;
            x += self.draw_text(x, &focused.title)? + BAR_PADDING;
            self.set_foreground(self.palette.get(ColorRole::TagList))?;
            let list = format!("[{}]", focused.tags.join(", "));
            self.draw_text(x, &list)?;
        }

        let status_width: i16 = model
            .status
            .iter()
            .map(|s| self.text_width(&s.text))
            .fold(0i16, |acc, w| acc.saturating_add(w))
            .min(width / 2);
        let mut sx = width - status_width;
        let default = self.palette.get(ColorRole::Default);
        for segment in &model.status {
            if sx >= width {
                break;
            }
            self.set_foreground(segment.color.unwrap_or(default))?;
            sx += self.draw_text(sx, &segment.text)?;
        }
        Ok(())
    }
}

impl WindowSystem for X11Driver {
    fn screen(&self) -> Screen {
        self.screen
    }

    fn bar_height(&self) -> i32 {
        self.bar_height
    }

    fn raw_fd(&self) -> Option<RawFd> {
        Some(self.conn.stream().as_raw_fd())
    }

    fn poll_event(&mut self) -> Result<Option<WmEvent>, DriverError> {
        if let Some(event) = self.pending.take() {
            return Ok(Some(event));
        }
        while let Some(raw) = self.conn.poll_for_event()? {
            match self.translate(raw)? {
                Some(motion @ WmEvent::Motion { .. }) => {
                    return self.compress_motion(motion).map(Some);
                }
                Some(event) => return Ok(Some(event)),
                None => {}
            }
        }
        Ok(None)
    }

    fn apply(&mut self, request: Request) -> Result<(), DriverError> {
        let conn = &self.conn;
        match request {
            Request::Map(w) => {
                conn.change_window_attributes(
                    w,
                    &ChangeWindowAttributesAux::new()
                        .event_mask(EventMask::PROPERTY_CHANGE | EventMask::ENTER_WINDOW),
                )?;
                conn.map_window(w)?;
            }
            Request::SetBorderWidth(w, width) => {
                conn.configure_window(w, &ConfigureWindowAux::new().border_width(width))?;
            }
            Request::MoveResize(w, rect) => {
                conn.configure_window(
                    w,
                    &ConfigureWindowAux::new()
                        .x(rect.x)
                        .y(rect.y)
                        .width(rect.width)
                        .height(rect.height),
                )?;
            }
            Request::Move(w, x, y) => {
                conn.configure_window(w, &ConfigureWindowAux::new().x(x).y(y))?;
            }
            Request::Raise(w) => raise(conn, w)?,
            Request::Focus(w) => {
                conn.set_input_focus(InputFocus::POINTER_ROOT, w, x11rb::CURRENT_TIME)?;
            }
            Request::SetBorderColor(w, color) => {
                conn.change_window_attributes(
                    w,
                    &ChangeWindowAttributesAux::new().border_pixel(color.to_pixel()),
                )?;
            }
            Request::Close(w) => self.close(w)?,
            Request::GrabKeyboard => {
                let reply = conn
                    .grab_keyboard(
                        true,
                        self.root,
                        x11rb::CURRENT_TIME,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                    )?
                    .reply();
                match reply {
                    Ok(r) if r.status == GrabStatus::SUCCESS => {}
                    Ok(r) => tracing::warn!(status = ?r.status, "keyboard grab refused"),
                    Err(err) => tracing::warn!(%err, "keyboard grab failed"),
                }
            }
            Request::UngrabKeyboard => {
                conn.ungrab_keyboard(x11rb::CURRENT_TIME)?;
            }
            Request::GrabPointer => {
                let reply = conn
                    .grab_pointer(
                        false,
                        self.root,
                        EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                        x11rb::NONE,
                        x11rb::NONE,
                        x11rb::CURRENT_TIME,
                    )?
                    .reply();
                if let Err(err) = reply {
                    tracing::warn!(%err, "pointer grab failed");
                }
            }
            Request::UngrabPointer => {
                conn.ungrab_pointer(x11rb::CURRENT_TIME)?;
            }
            Request::PlaceBar { y } => {
                conn.configure_window(self.bar, &ConfigureWindowAux::new().x(0).y(y))?;
            }
            Request::RaiseBar => raise(conn, self.bar)?,
            Request::DrawBar(model) => self.draw_bar(&model)?,
            Request::Spawn(command) => {
                tracing::debug!(command, "spawn requests are not handled by the display");
            }
        }
        Ok(())
    }

    fn grab_bindings(
        &mut self,
        keys: &KeyBindings,
        buttons: &ButtonBindings,
    ) -> Result<(), DriverError> {
        self.key_grabs = keys.combos().collect();
        self.button_grabs = buttons.combos().filter(|c| c.mods != 0).collect();
        self.regrab()?;
        self.conn.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        self.conn.flush()?;
        Ok(())
    }
}

/// Collapse a run of motion events into the newest one. `next` yields
/// decoded events, with `Some(None)` for events that decode to nothing, until
/// nothing is available. The first other event ends the run and is handed
/// back so it can be delivered next.
fn coalesce_motion<E>(
    mut latest: WmEvent,
    mut next: impl FnMut() -> Result<Option<Option<WmEvent>>, E>,
) -> Result<(WmEvent, Option<WmEvent>), E> {
    while let Some(decoded) = next()? {
        match decoded {
            Some(motion @ WmEvent::Motion { .. }) => latest = motion,
            Some(other) => return Ok((latest, Some(other))),
            None => {}
        }
    }
    Ok((latest, None))
}

fn become_wm(conn: &RustConnection, root: Window) -> Result<(), DriverError> {
    let mask = EventMask::SUBSTRUCTURE_REDIRECT
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::STRUCTURE_NOTIFY
        | EventMask::FOCUS_CHANGE
        | EventMask::BUTTON_PRESS
        | EventMask::BUTTON_RELEASE
        | EventMask::PROPERTY_CHANGE;
    let cookie =
        conn.change_window_attributes(root, &ChangeWindowAttributesAux::new().event_mask(mask))?;
    if let Err(err) = cookie.check() {
        tracing::error!(%err, "cannot select substructure redirect on the root window");
        return Err(DriverError::AnotherWmRunning);
    }
    tracing::info!("became the window manager");
    Ok(())
}

fn load_keyboard(conn: &RustConnection) -> Result<KeyboardMap, DriverError> {
    let setup = conn.setup();
    let min_keycode = setup.min_keycode;
    let count = setup.max_keycode - min_keycode + 1;
    let mapping = conn.get_keyboard_mapping(min_keycode, count)?.reply()?;
    Ok(KeyboardMap {
        min_keycode,
        per_keycode: usize::from(mapping.keysyms_per_keycode),
        keysyms: mapping.keysyms,
    })
}

fn raise(conn: &RustConnection, window: WindowId) -> Result<(), DriverError> {
    conn.configure_window(
        window,
        &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
    )?;
    Ok(())
}

/// Core fonts only speak Latin-1; anything else is shown as `?`.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .take(MAX_TEXT8)
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
