//! Muon X11 Adapter: bridge between an X server and muon-core.
//!
//! This crate:
//! - Owns the `x11rb` connection and every protocol type.
//! - Implements [`muon_core::Display`] on top of it: queries become round
//!   trips, `CoreAction`s become X requests.
//! - Translates X events → `CoreEvent`s for the event loop to feed to `Core`.
//! - Publishes the EWMH properties pagers and bars read.
//!
//! **No x11rb types leak into `muon-core`.**

use std::os::unix::io::{AsRawFd, RawFd};
use std::str::FromStr;

use tracing::{debug, info, trace, warn};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::xinerama::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{
    AtomEnum, ChangeWindowAttributesAux, ClientMessageEvent, ConfigWindow, ConfigureNotifyEvent,
    ConfigureWindowAux, ConnectionExt as _, CreateWindowAux, EventMask, InputFocus, MapState,
    PropMode, StackMode, Window, WindowClass, CONFIGURE_NOTIFY_EVENT,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::{COPY_FROM_PARENT, CURRENT_TIME, NONE};

use muon_core::display::{Pointer, WindowAttributes};
use muon_core::event::{ConfigureChanges, StateAction, WmState};
use muon_core::{CoreAction, CoreEvent, Display, DisplayError, Geometry, WindowId};

/// Name advertised on the `_NET_SUPPORTING_WM_CHECK` window.
pub const WM_NAME: &str = "muon";

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,
        UTF8_STRING,
        _NET_SUPPORTED,
        _NET_SUPPORTING_WM_CHECK,
        _NET_WM_NAME,
        _NET_CLIENT_LIST,
        _NET_NUMBER_OF_DESKTOPS,
        _NET_CURRENT_DESKTOP,
        _NET_ACTIVE_WINDOW,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DIALOG,
        _NET_WM_STATE,
        _NET_WM_STATE_FULLSCREEN,
        _NET_WM_STATE_MODAL,
        _NET_WM_STATE_STICKY,
        _NET_WM_STATE_MAXIMIZED_VERT,
        _NET_WM_STATE_MAXIMIZED_HORZ,
        _NET_WM_STATE_SHADED,
        _NET_WM_STATE_SKIP_TASKBAR,
        _NET_WM_STATE_SKIP_PAGER,
        _NET_WM_STATE_HIDDEN,
        _NET_WM_STATE_ABOVE,
        _NET_WM_STATE_BELOW,
        _NET_WM_STATE_DEMANDS_ATTENTION,
    }
}

/// Adapter error type
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connect(#[from] ConnectError),

    #[error("Connection lost: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X11 error: {0}")]
    Reply(#[from] ReplyError),

    #[error("X11 error: {0}")]
    ReplyOrId(#[from] ReplyOrIdError),

    #[error("Another window manager is already running")]
    AnotherWindowManager,
}

/// A 24-bit colour written `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// The raw `0xRRGGBB` pixel value used on TrueColor visuals.
    pub const fn pixel(self) -> u32 {
        (self.0 as u32) << 16 | (self.1 as u32) << 8 | self.2 as u32
    }
}

/// Why a colour string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour `{0}`, expected #RRGGBB")]
pub struct InvalidColor(String);

impl FromStr for Rgb {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidColor(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Border colours for focused and unfocused windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderColors {
    pub active: Rgb,
    pub inactive: Rgb,
}

impl Default for BorderColors {
    fn default() -> Self {
        Self {
            active: Rgb(0x11, 0x80, 0x9e),
            inactive: Rgb(0x3f, 0x3e, 0x3b),
        }
    }
}

/// Raw descriptor of the X connection, for registering with an event loop.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionFd(RawFd);

impl AsRawFd for ConnectionFd {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

/// The X11 display adapter.
pub struct X11Display {
    conn: RustConnection,
    atoms: Atoms,
    root: Window,
    /// Whole-screen rectangle, used when Xinerama is absent.
    root_geometry: Geometry,
    /// `_NET_SUPPORTING_WM_CHECK` window
    check_window: Window,
    active_pixel: u32,
    inactive_pixel: u32,
}

impl X11Display {
    /// Connect to `display` (or `$DISPLAY`) and take over window management
    /// of its default screen.
    pub fn connect(display: Option<&str>, colors: BorderColors) -> Result<Self, BackendError> {
        let (conn, screen_num) = x11rb::connect(display)?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let colormap = screen.default_colormap;
        let root_geometry = Geometry::new(
            0,
            0,
            u32::from(screen.width_in_pixels),
            u32::from(screen.height_in_pixels),
        );
        info!(
            "Connected to X server, screen {} ({})",
            screen_num, root_geometry
        );

        let redirect = ChangeWindowAttributesAux::new()
            .event_mask(EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY);
        if conn.change_window_attributes(root, &redirect)?.check().is_err() {
            return Err(BackendError::AnotherWindowManager);
        }

        let atoms = Atoms::new(&conn)?.reply()?;
        let active_pixel = alloc_pixel(&conn, colormap, colors.active);
        let inactive_pixel = alloc_pixel(&conn, colormap, colors.inactive);

        let check_window = conn.generate_id()?;
        let display = Self {
            conn,
            atoms,
            root,
            root_geometry,
            check_window,
            active_pixel,
            inactive_pixel,
        };
        display.setup_ewmh()?;
        display.conn.flush()?;

        Ok(display)
    }

    fn setup_ewmh(&self) -> Result<(), BackendError> {
        let atoms = self.atoms;
        let conn = &self.conn;

        conn.create_window(
            COPY_FROM_PARENT as u8,
            self.check_window,
            self.root,
            -1,
            -1,
            1,
            1,
            0,
            WindowClass::INPUT_ONLY,
            COPY_FROM_PARENT,
            &CreateWindowAux::new(),
        )?;
        for window in [self.root, self.check_window] {
            conn.change_property32(
                PropMode::REPLACE,
                window,
                atoms._NET_SUPPORTING_WM_CHECK,
                AtomEnum::WINDOW,
                &[self.check_window],
            )?;
        }
        conn.change_property8(
            PropMode::REPLACE,
            self.check_window,
            atoms._NET_WM_NAME,
            atoms.UTF8_STRING,
            WM_NAME.as_bytes(),
        )?;

        let supported = [
            atoms._NET_SUPPORTED,
            atoms._NET_CLIENT_LIST,
            atoms._NET_NUMBER_OF_DESKTOPS,
            atoms._NET_CURRENT_DESKTOP,
            atoms._NET_ACTIVE_WINDOW,
            atoms._NET_WM_WINDOW_TYPE,
            atoms._NET_WM_WINDOW_TYPE_DIALOG,
            atoms._NET_WM_STATE,
            atoms._NET_WM_STATE_FULLSCREEN,
        ];
        conn.change_property32(
            PropMode::REPLACE,
            self.root,
            atoms._NET_SUPPORTED,
            AtomEnum::ATOM,
            &supported,
        )?;
        conn.change_property32(
            PropMode::REPLACE,
            self.root,
            atoms._NET_NUMBER_OF_DESKTOPS,
            AtomEnum::CARDINAL,
            &[1],
        )?;
        conn.change_property32(
            PropMode::REPLACE,
            self.root,
            atoms._NET_CURRENT_DESKTOP,
            AtomEnum::CARDINAL,
            &[0],
        )?;

        debug!("EWMH hints published");
        Ok(())
    }

    /// Descriptor that becomes readable when the server sends something.
    pub fn fd(&self) -> ConnectionFd {
        ConnectionFd(self.conn.stream().as_raw_fd())
    }

    /// Next queued event that has a core counterpart, without blocking.
    pub fn poll_event(&mut self) -> Result<Option<CoreEvent>, BackendError> {
        while let Some(event) = self.conn.poll_for_event()? {
            if let Some(event) = self.translate(event) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Drop the EWMH check window and hand focus back to the root.
    pub fn release(&mut self) {
        let result = self
            .conn
            .destroy_window(self.check_window)
            .and_then(|_| {
                self.conn
                    .set_input_focus(InputFocus::POINTER_ROOT, self.root, CURRENT_TIME)
            })
            .and_then(|_| self.conn.delete_property(self.root, self.atoms._NET_ACTIVE_WINDOW))
            .and_then(|_| self.conn.flush());
        if let Err(e) = result {
            warn!("Failed to release display: {}", e);
        }
    }

    // ── Event translation (X → core) ─────────────────────────────────

    fn translate(&self, event: Event) -> Option<CoreEvent> {
        let event = match event {
            Event::MapRequest(e) => CoreEvent::MapRequest { id: WindowId(e.window) },
            Event::MapNotify(e) => CoreEvent::MapNotify { id: WindowId(e.window) },
            Event::UnmapNotify(e) => CoreEvent::UnmapNotify { id: WindowId(e.window) },
            Event::DestroyNotify(e) => CoreEvent::DestroyNotify { id: WindowId(e.window) },
            Event::ConfigureNotify(e) => CoreEvent::ConfigureNotify { id: WindowId(e.window) },
            Event::ConfigureRequest(e) => {
                let mask = e.value_mask;
                CoreEvent::ConfigureRequest {
                    id: WindowId(e.window),
                    changes: ConfigureChanges {
                        x: has(mask, ConfigWindow::X).then_some(i32::from(e.x)),
                        y: has(mask, ConfigWindow::Y).then_some(i32::from(e.y)),
                        width: has(mask, ConfigWindow::WIDTH).then_some(u32::from(e.width)),
                        height: has(mask, ConfigWindow::HEIGHT).then_some(u32::from(e.height)),
                    },
                }
            }
            Event::ClientMessage(e) if e.type_ == self.atoms._NET_WM_STATE && e.format == 32 => {
                let data = e.data.as_data32();
                let Some(action) = StateAction::from_raw(data[0]) else {
                    debug!("Ignoring state message with action {}", data[0]);
                    return None;
                };
                CoreEvent::StateRequest {
                    id: WindowId(e.window),
                    action,
                    states: [self.wm_state(data[1]), self.wm_state(data[2])],
                }
            }
            Event::Error(e) => {
                warn!("X11 error: {:?}", e);
                return None;
            }
            other => {
                debug!("Ignored event {:?}", other);
                return None;
            }
        };
        trace!("{:?}", event);
        Some(event)
    }

    fn wm_state(&self, atom: u32) -> Option<WmState> {
        let a = &self.atoms;
        let state = match atom {
            NONE => return None,
            x if x == a._NET_WM_STATE_FULLSCREEN => WmState::Fullscreen,
            x if x == a._NET_WM_STATE_MODAL => WmState::Modal,
            x if x == a._NET_WM_STATE_STICKY => WmState::Sticky,
            x if x == a._NET_WM_STATE_MAXIMIZED_VERT => WmState::MaximizedVert,
            x if x == a._NET_WM_STATE_MAXIMIZED_HORZ => WmState::MaximizedHorz,
            x if x == a._NET_WM_STATE_SHADED => WmState::Shaded,
            x if x == a._NET_WM_STATE_SKIP_TASKBAR => WmState::SkipTaskbar,
            x if x == a._NET_WM_STATE_SKIP_PAGER => WmState::SkipPager,
            x if x == a._NET_WM_STATE_HIDDEN => WmState::Hidden,
            x if x == a._NET_WM_STATE_ABOVE => WmState::Above,
            x if x == a._NET_WM_STATE_BELOW => WmState::Below,
            x if x == a._NET_WM_STATE_DEMANDS_ATTENTION => WmState::DemandsAttention,
            other => {
                debug!("Unknown window state atom {}", other);
                return None;
            }
        };
        Some(state)
    }

    // ── Requests (core → X) ──────────────────────────────────────────

    fn send(&self, action: &CoreAction) -> Result<(), ReplyError> {
        let conn = &self.conn;
        match *action {
            CoreAction::MapWindow { id } => {
                conn.map_window(id.0)?;
            }
            CoreAction::Configure { id, geometry } => {
                let aux = ConfigureWindowAux::new()
                    .x(geometry.x)
                    .y(geometry.y)
                    .width(geometry.width)
                    .height(geometry.height);
                conn.configure_window(id.0, &aux)?;
            }
            CoreAction::Move { id, x, y } => {
                conn.configure_window(id.0, &ConfigureWindowAux::new().x(x).y(y))?;
            }
            CoreAction::ApplyConfigure { id, changes } => {
                let aux = ConfigureWindowAux {
                    x: changes.x,
                    y: changes.y,
                    width: changes.width,
                    height: changes.height,
                    ..ConfigureWindowAux::default()
                };
                conn.configure_window(id.0, &aux)?;
            }
            CoreAction::SetBorderWidth { id, width } => {
                conn.configure_window(id.0, &ConfigureWindowAux::new().border_width(width))?;
            }
            CoreAction::SetBorderColor { id, focused } => {
                let pixel = if focused {
                    self.active_pixel
                } else {
                    self.inactive_pixel
                };
                conn.change_window_attributes(
                    id.0,
                    &ChangeWindowAttributesAux::new().border_pixel(pixel),
                )?;
            }
            CoreAction::Raise { id } => {
                let aux = ConfigureWindowAux::new().stack_mode(StackMode::ABOVE);
                conn.configure_window(id.0, &aux)?;
            }
            CoreAction::Lower { id } => {
                let aux = ConfigureWindowAux::new().stack_mode(StackMode::BELOW);
                conn.configure_window(id.0, &aux)?;
            }
            CoreAction::SetInputFocus { id } => {
                let target = id.map_or(self.root, |id| id.0);
                conn.set_input_focus(InputFocus::POINTER_ROOT, target, CURRENT_TIME)?;
            }
            CoreAction::NotifyGeometry {
                id,
                geometry,
                border_width,
            } => {
                let event = ConfigureNotifyEvent {
                    response_type: CONFIGURE_NOTIFY_EVENT,
                    sequence: 0,
                    event: id.0,
                    window: id.0,
                    above_sibling: NONE,
                    x: geometry.x as i16,
                    y: geometry.y as i16,
                    width: geometry.width as u16,
                    height: geometry.height as u16,
                    border_width: border_width as u16,
                    override_redirect: false,
                };
                conn.send_event(false, id.0, EventMask::STRUCTURE_NOTIFY, event)?;
            }
            CoreAction::RequestClose { id } => self.close(id)?,
            CoreAction::SetActiveWindow { id } => {
                conn.change_property32(
                    PropMode::REPLACE,
                    self.root,
                    self.atoms._NET_ACTIVE_WINDOW,
                    AtomEnum::WINDOW,
                    &[id.0],
                )?;
            }
            CoreAction::SetClientList { ref ids } => {
                let ids: Vec<u32> = ids.iter().map(|id| id.0).collect();
                conn.change_property32(
                    PropMode::REPLACE,
                    self.root,
                    self.atoms._NET_CLIENT_LIST,
                    AtomEnum::WINDOW,
                    &ids,
                )?;
            }
            CoreAction::SetFullscreenState { id, fullscreen } => {
                let states: &[u32] = if fullscreen {
                    &[self.atoms._NET_WM_STATE_FULLSCREEN]
                } else {
                    &[]
                };
                conn.change_property32(
                    PropMode::REPLACE,
                    id.0,
                    self.atoms._NET_WM_STATE,
                    AtomEnum::ATOM,
                    states,
                )?;
            }
        }
        Ok(())
    }

    /// Ask a client to close its window via `WM_DELETE_WINDOW`.
    fn close(&self, id: WindowId) -> Result<(), ReplyError> {
        let protocols = self
            .conn
            .get_property(false, id.0, self.atoms.WM_PROTOCOLS, AtomEnum::ATOM, 0, 64)?
            .reply()?;
        let supported = protocols
            .value32()
            .is_some_and(|mut atoms| atoms.any(|a| a == self.atoms.WM_DELETE_WINDOW));
        if !supported {
            debug!("Window {} does not advertise WM_DELETE_WINDOW", id);
        }

        let event = ClientMessageEvent::new(
            32,
            id.0,
            self.atoms.WM_PROTOCOLS,
            [self.atoms.WM_DELETE_WINDOW, CURRENT_TIME, 0, 0, 0],
        );
        self.conn.send_event(false, id.0, EventMask::NO_EVENT, event)?;
        Ok(())
    }

    fn xinerama_screens(&self) -> Result<Option<Vec<Geometry>>, ReplyError> {
        if self
            .conn
            .extension_information(xinerama::X11_EXTENSION_NAME)?
            .is_none()
        {
            return Ok(None);
        }
        if self.conn.xinerama_is_active()?.reply()?.state == 0 {
            return Ok(None);
        }
        let reply = self.conn.xinerama_query_screens()?.reply()?;
        Ok(Some(
            reply
                .screen_info
                .iter()
                .map(|s| {
                    Geometry::new(
                        i32::from(s.x_org),
                        i32::from(s.y_org),
                        u32::from(s.width),
                        u32::from(s.height),
                    )
                })
                .collect(),
        ))
    }
}

impl Display for X11Display {
    fn screens(&mut self) -> Result<Vec<Geometry>, DisplayError> {
        match self.xinerama_screens().map_err(request_error)? {
            Some(screens) if !screens.is_empty() => {
                info!("Xinerama reports {} screens", screens.len());
                Ok(screens)
            }
            _ => Ok(vec![self.root_geometry]),
        }
    }

    fn top_level_windows(&mut self) -> Result<Vec<WindowId>, DisplayError> {
        let tree = self
            .conn
            .query_tree(self.root)
            .map_err(connection_error)?
            .reply()
            .map_err(request_error)?;
        Ok(tree.children.into_iter().map(WindowId).collect())
    }

    fn window_attributes(&mut self, id: WindowId) -> Result<WindowAttributes, DisplayError> {
        let reply = self
            .conn
            .get_window_attributes(id.0)
            .map_err(connection_error)?
            .reply()
            .map_err(window_error(id))?;
        Ok(WindowAttributes {
            override_redirect: reply.override_redirect,
            viewable: reply.map_state == MapState::VIEWABLE,
        })
    }

    fn window_geometry(&mut self, id: WindowId) -> Result<Geometry, DisplayError> {
        let reply = self
            .conn
            .get_geometry(id.0)
            .map_err(connection_error)?
            .reply()
            .map_err(window_error(id))?;
        Ok(Geometry::new(
            i32::from(reply.x),
            i32::from(reply.y),
            u32::from(reply.width),
            u32::from(reply.height),
        ))
    }

    fn window_class(&mut self, id: WindowId) -> Result<Option<String>, DisplayError> {
        let reply = self
            .conn
            .get_property(false, id.0, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 256)
            .map_err(connection_error)?
            .reply()
            .map_err(window_error(id))?;

        // "instance\0class\0"
        let class = reply
            .value
            .split(|&b| b == 0)
            .nth(1)
            .filter(|class| !class.is_empty())
            .map(|class| String::from_utf8_lossy(class).into_owned());
        Ok(class)
    }

    fn transient_for(&mut self, id: WindowId) -> Result<Option<WindowId>, DisplayError> {
        let reply = self
            .conn
            .get_property(false, id.0, AtomEnum::WM_TRANSIENT_FOR, AtomEnum::WINDOW, 0, 1)
            .map_err(connection_error)?
            .reply()
            .map_err(window_error(id))?;
        Ok(reply
            .value32()
            .and_then(|mut values| values.next())
            .filter(|&parent| parent != NONE)
            .map(WindowId))
    }

    fn is_dialog(&mut self, id: WindowId) -> Result<bool, DisplayError> {
        let dialog = self.atoms._NET_WM_WINDOW_TYPE_DIALOG;
        let reply = self
            .conn
            .get_property(
                false,
                id.0,
                self.atoms._NET_WM_WINDOW_TYPE,
                AtomEnum::ATOM,
                0,
                32,
            )
            .map_err(connection_error)?
            .reply()
            .map_err(window_error(id))?;
        Ok(reply
            .value32()
            .is_some_and(|mut types| types.any(|t| t == dialog)))
    }

    fn query_pointer(&mut self) -> Result<Pointer, DisplayError> {
        let reply = self
            .conn
            .query_pointer(self.root)
            .map_err(connection_error)?
            .reply()
            .map_err(request_error)?;
        Ok(Pointer {
            x: i32::from(reply.root_x),
            y: i32::from(reply.root_y),
            child: (reply.child != NONE).then_some(WindowId(reply.child)),
        })
    }

    fn request(&mut self, action: CoreAction) {
        if let Err(e) = self.send(&action) {
            warn!("Request {:?} failed: {}", action, e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.conn.flush() {
            warn!("Failed to flush X connection: {}", e);
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn has(mask: impl Into<u16>, flag: ConfigWindow) -> bool {
    mask.into() & u16::from(flag) != 0
}

/// Allocate `color` in `colormap`, falling back to the raw RGB pixel.
fn alloc_pixel(conn: &RustConnection, colormap: u32, color: Rgb) -> u32 {
    let scale = |c: u8| u16::from(c) * 0x101;
    let reply = conn
        .alloc_color(colormap, scale(color.0), scale(color.1), scale(color.2))
        .map_err(ReplyError::from)
        .and_then(|cookie| cookie.reply());
    match reply {
        Ok(reply) => reply.pixel,
        Err(e) => {
            warn!("Failed to allocate colour {:?}: {}", color, e);
            color.pixel()
        }
    }
}

fn connection_error(e: ConnectionError) -> DisplayError {
    DisplayError::Connection(e.to_string())
}

fn request_error(e: ReplyError) -> DisplayError {
    DisplayError::Request(e.to_string())
}

fn window_error(id: WindowId) -> impl Fn(ReplyError) -> DisplayError {
    move |e| match e {
        ReplyError::X11Error(_) => DisplayError::NoSuchWindow(id),
        ReplyError::ConnectionError(e) => connection_error(e),
    }
}
