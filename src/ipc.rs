//! Control socket.
//!
//! One connection carries one command: the client writes a message, the
//! server reads it in a single read of at most [`MAX_MESSAGE_LEN`] bytes,
//! writes the response (possibly nothing) and closes the connection.

use std::io::{self, ErrorKind, Read, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Largest message the server reads from one connection.
pub const MAX_MESSAGE_LEN: usize = 8192;

/// How long a connected client may take to send its message.
const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Listening end of the control socket. The socket file is removed on drop.
#[derive(Debug)]
pub struct IpcServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl IpcServer {
    /// Bind the control socket, replacing a stale socket file.
    pub fn bind(socket_path: impl AsRef<Path>) -> Result<Self> {
        let socket_path = socket_path.as_ref().to_path_buf();

        match std::fs::remove_file(&socket_path) {
            Ok(()) => debug!("Removed stale socket {:?}", socket_path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to remove stale socket {socket_path:?}"))
            }
        }

        let listener = UnixListener::bind(&socket_path)
            .with_context(|| format!("Failed to bind control socket {socket_path:?}"))?;
        listener
            .set_nonblocking(true)
            .context("Failed to make control socket non-blocking")?;

        info!("Control socket listening on {:?}", socket_path);
        Ok(Self {
            listener,
            socket_path,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Next waiting connection, if any.
    pub fn accept(&self) -> io::Result<Option<UnixStream>> {
        match self.listener.accept() {
            Ok((stream, _)) => Ok(Some(stream)),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serve at most one waiting connection with `handler`, so the caller
    /// gets back to its other sources between commands. Failures are logged
    /// and only drop the connection they happened on. Returns whether a
    /// connection was accepted.
    pub fn serve_next(&self, handler: impl FnOnce(&str) -> String) -> bool {
        match self.accept() {
            Ok(Some(mut stream)) => {
                if let Err(e) = serve(&mut stream, handler) {
                    warn!("Control connection failed: {}", e);
                }
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to accept control connection: {}", e);
                false
            }
        }
    }
}

impl AsRawFd for IpcServer {
    fn as_raw_fd(&self) -> RawFd {
        self.listener.as_raw_fd()
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.socket_path) {
            warn!("Failed to remove socket {:?}: {}", self.socket_path, e);
        }
    }
}

/// Read one message from `stream`, answer it with `handler` and close.
pub fn serve(stream: &mut UnixStream, handler: impl FnOnce(&str) -> String) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(READ_TIMEOUT))?;

    let mut buf = [0u8; MAX_MESSAGE_LEN];
    let n = stream.read(&mut buf)?;
    if n == 0 {
        return Ok(());
    }

    let message = String::from_utf8_lossy(&buf[..n]);
    let response = handler(&message);
    if !response.is_empty() {
        stream.write_all(response.as_bytes())?;
    }
    Ok(())
}

/// Join command-line words into a message: each word followed by a space.
pub fn format_command<S: AsRef<str>>(words: &[S]) -> String {
    words.iter().fold(String::new(), |mut message, word| {
        message.push_str(word.as_ref());
        message.push(' ');
        message
    })
}

/// Send one message to a running muon and return its response.
pub fn send_command(socket_path: impl AsRef<Path>, message: &str) -> Result<String> {
    let socket_path = socket_path.as_ref();
    let mut stream = UnixStream::connect(socket_path)
        .with_context(|| format!("Failed to connect to {socket_path:?}"))?;

    stream
        .write_all(message.as_bytes())
        .context("Failed to send command")?;

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .context("Failed to read response")?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::thread;

    /// Serve connections until one arrives or a few seconds pass.
    fn serve_one(server: &IpcServer, mut handler: impl FnMut(&str) -> String) {
        for _ in 0..500 {
            if server.serve_next(&mut handler) {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("no client connected");
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muon-socket");
        let server = IpcServer::bind(&path).unwrap();

        let client_path = path.clone();
        let client = thread::spawn(move || send_command(client_path, "get root-size "));

        let mut received = String::new();
        serve_one(&server, |message| {
            received = message.to_owned();
            "0.650000\n".to_owned()
        });

        assert_eq!(received, "get root-size ");
        assert_eq!(client.join().unwrap().unwrap(), "0.650000\n");
    }

    #[test]
    fn test_empty_response_closes_connection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muon-socket");
        let server = IpcServer::bind(&path).unwrap();

        let client_path = path.clone();
        let client = thread::spawn(move || send_command(client_path, "make-root "));
        serve_one(&server, |_| String::new());

        assert_eq!(client.join().unwrap().unwrap(), "");
    }

    #[test]
    fn test_message_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muon-socket");
        let server = IpcServer::bind(&path).unwrap();

        let client_path = path.clone();
        let client = thread::spawn(move || {
            let mut stream = UnixStream::connect(client_path).unwrap();
            stream.write_all(&[b'x'; MAX_MESSAGE_LEN + 100]).unwrap();
        });
        client.join().unwrap();

        let mut len = 0;
        serve_one(&server, |message| {
            len = message.len();
            String::new()
        });
        assert!(len > 0);
        assert!(len <= MAX_MESSAGE_LEN);
    }

    #[test]
    fn test_bind_replaces_stale_file_and_drop_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muon-socket");
        std::fs::write(&path, b"stale").unwrap();

        let server = IpcServer::bind(&path).unwrap();
        assert_eq!(server.socket_path(), path.as_path());
        assert!(path.exists());

        drop(server);
        assert!(!path.exists());
    }

    #[test]
    fn test_one_connection_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("muon-socket");
        let server = IpcServer::bind(&path).unwrap();

        // both connects complete against the listen backlog before serving
        let first = UnixStream::connect(&path).unwrap();
        let second = UnixStream::connect(&path).unwrap();
        for mut stream in [&first, &second] {
            stream.write_all(b"quit ").unwrap();
        }

        let mut handled = 0;
        assert!(server.serve_next(|_| {
            handled += 1;
            String::new()
        }));
        assert_eq!(handled, 1);

        assert!(server.serve_next(|_| {
            handled += 1;
            String::new()
        }));
        assert_eq!(handled, 2);
        assert!(!server.serve_next(|_| unreachable!()));
    }

    #[test]
    fn test_send_without_server_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(send_command(dir.path().join("nobody"), "quit ").is_err());
    }

    #[test]
    fn test_format_command() {
        assert_eq!(format_command(&["root-size", "+0.05"]), "root-size +0.05 ");
        assert_eq!(format_command(&["quit"]), "quit ");
        assert_eq!(format_command::<&str>(&[]), "");
    }
}
