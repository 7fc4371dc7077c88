use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener as StdTcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, Receiver};
use tracing::{debug, info, warn};

use crate::config::ConnOptions;
use crate::crypto::Crypt;
use crate::device::Device;
use crate::net::conn::TcpConn;
use crate::net::error::{Cause, ConnError, Op, OpError};

/// Listening socket whose accepted streams become `TcpConn`s sharing one codec.
pub struct TcpListener {
    listener: StdTcpListener,
    crypt: Arc<dyn Crypt>,
    options: ConnOptions,
}

impl std::fmt::Debug for TcpListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpListener")
            .field("listener", &self.listener)
            .field("method", &self.crypt.method())
            .field("options", &self.options)
            .finish()
    }
}

/// Passive open on `device`'s address at `port` (0 = ephemeral).
pub fn listen(
    device: &Device,
    port: u16,
    crypt: Arc<dyn Crypt>,
    options: &ConnOptions,
) -> Result<TcpListener, ConnError> {
    TcpListener::bind(SocketAddr::new(device.ip_addr(), port), crypt, options)
}

impl TcpListener {
    pub fn bind(addr: SocketAddr, crypt: Arc<dyn Crypt>, options: &ConnOptions) -> Result<Self, ConnError> {
        let listener = StdTcpListener::bind(addr)
            .map_err(|e| OpError::new(Op::Listen, Some(addr), None, Cause::Io(e)))?;

        info!("listen on {} ({})", addr, crypt.method());

        Ok(Self {
            listener,
            crypt,
            options: *options,
        })
    }

    /// Block for the next peer. Accept errors pass through verbatim.
    pub fn accept(&self) -> Result<TcpConn, ConnError> {
        let (stream, peer) = self.listener.accept()?;
        let local = stream.local_addr().ok();

        let conn = TcpConn::from_stream(stream, self.crypt.clone(), &self.options, Instant::now())
            .map_err(|e| OpError::new(Op::Accept, local, Some(peer), Cause::Io(e)))?;

        debug!("accepted connection from {}", peer);
        Ok(conn)
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn crypt(&self) -> &Arc<dyn Crypt> {
        &self.crypt
    }

    /// Endless iterator of accepted connections.
    pub fn incoming(&self) -> Incoming<'_> {
        Incoming { listener: self }
    }

    /// Drive `accept` on a dedicated thread, handing each result over a
    /// channel. The thread exits after a non-transient accept error, once
    /// the receiver is dropped and the next accept returns, or when the
    /// returned `Acceptor` is stopped.
    pub fn spawn_acceptor(self) -> io::Result<Acceptor> {
        let wake = wake_addr(self.listener.local_addr()?);
        let (tx, rx) = unbounded();
        let stop = Arc::new(AtomicBool::new(false));
        let stopped = stop.clone();

        let thread = thread::spawn(move || loop {
            let res = self.accept();
            if stopped.load(Ordering::SeqCst) {
                debug!("acceptor on {} stopped", wake);
                return;
            }

            let fatal = match &res {
                Err(ConnError::Io(e)) => !is_transient(e),
                _ => false,
            };

            if tx.send(res).is_err() || fatal {
                return;
            }
        });

        Ok(Acceptor {
            incoming: rx,
            stop,
            wake,
            thread: Some(thread),
        })
    }

    /// Stop listening. Already accepted connections are unaffected.
    pub fn close(self) {
        drop(self.listener);
    }
}

/// Background accept loop. Dropping the handle stops it too.
pub struct Acceptor {
    incoming: Receiver<Result<TcpConn, ConnError>>,
    stop: Arc<AtomicBool>,
    wake: SocketAddr,
    thread: Option<JoinHandle<()>>,
}

impl Acceptor {
    /// Accepted connections and accept errors, in order.
    pub fn incoming(&self) -> &Receiver<Result<TcpConn, ConnError>> {
        &self.incoming
    }

    /// Stop the loop and close the listening socket. Connections already
    /// delivered are unaffected.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };

        self.stop.store(true, Ordering::SeqCst);
        // Unblock the pending accept; refused means the loop already exited.
        let _ = TcpStream::connect_timeout(&self.wake, Duration::from_secs(1));

        if thread.join().is_err() {
            warn!("acceptor on {} panicked", self.wake);
        }
    }
}

impl Drop for Acceptor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Address that reaches a listener bound to `local`; wildcards map to loopback.
fn wake_addr(local: SocketAddr) -> SocketAddr {
    let ip = match local.ip() {
        IpAddr::V4(v4) if v4.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(v6) if v6.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, local.port())
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::ConnectionAborted | io::ErrorKind::ConnectionReset
    )
}

pub struct Incoming<'a> {
    listener: &'a TcpListener,
}

impl<'a> Iterator for Incoming<'a> {
    type Item = Result<TcpConn, ConnError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.listener.accept())
    }
}
