//! Muon daemon support: command-line configuration and the control socket.
//!
//! The window-management engine lives in `muon-core`, the X11 glue in
//! `muon-x11`. This crate wires them to a `calloop` event loop.

pub mod config;
pub mod ipc;
