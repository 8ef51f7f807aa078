//! Muon - a small tiling window manager for X11
//!
//! Windows are split into a root area and a stack. Everything else
//! (layout parameters, focus, fullscreen, floating, pointer drags) is driven
//! by one-shot commands on a Unix socket, usually sent with `muonc`.

use anyhow::{anyhow, Context, Result};
use calloop::generic::Generic;
use calloop::{EventLoop, Interest, Mode, PostAction};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use muon::config::Args;
use muon::ipc::IpcServer;
use muon_core::Core;
use muon_x11::X11Display;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_filter()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Muon v{} starting...", env!("CARGO_PKG_VERSION"));

    let display = X11Display::connect(args.display.as_deref(), args.border_colors())
        .context("Failed to take over the X display")?;
    let x11_fd = display.fd();

    let mut core = Core::new(display);
    core.start().context("Failed to read the initial display state")?;

    let server = IpcServer::bind(&args.socket)?;

    let mut event_loop: EventLoop<Core<X11Display>> =
        EventLoop::try_new().context("Failed to create event loop")?;
    let handle = event_loop.handle();

    handle
        .insert_source(
            Generic::new(x11_fd, Interest::READ, Mode::Level),
            |_, _, core| {
                drain_events(core);
                Ok(PostAction::Continue)
            },
        )
        .map_err(|e| anyhow!("Failed to watch the X connection: {}", e.error))?;

    handle
        .insert_source(
            Generic::new(server, Interest::READ, Mode::Level),
            |_, server, core| {
                // one command per wakeup; level mode calls back while more wait
                server.serve_next(|message| core.process_message(message));
                Ok(PostAction::Continue)
            },
        )
        .map_err(|e| anyhow!("Failed to watch the control socket: {}", e.error))?;

    info!("Running");
    while core.is_running() {
        // x11rb may have queued events while waiting for replies
        drain_events(&mut core);
        event_loop
            .dispatch(None, &mut core)
            .context("Event loop failed")?;
    }

    info!("Shutting down");
    core.shutdown();
    core.display_mut().release();

    // Dropping the loop drops the server, which removes the socket file
    drop(event_loop);
    Ok(())
}

/// Feed every queued X event to the core.
fn drain_events(core: &mut Core<X11Display>) {
    loop {
        match core.display_mut().poll_event() {
            Ok(Some(event)) => core.handle_event(event),
            Ok(None) => break,
            Err(e) => {
                error!("Lost the X connection: {}", e);
                core.state.running = false;
                break;
            }
        }
    }
}
