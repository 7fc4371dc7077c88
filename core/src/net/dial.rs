use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::info;

use crate::addr::ipv4_of;
use crate::config::ConnOptions;
use crate::crypto::Crypt;
use crate::device::Device;
use crate::net::conn::TcpConn;
use crate::net::error::{Cause, ConnError, Op, OpError};
use crate::utils::duration_ms;

/// Device address of the same family as `remote`.
fn source_ip(device: &Device, remote: &SocketAddr) -> IpAddr {
    let addrs = device.addrs();
    match remote {
        SocketAddr::V4(_) => addrs
            .ipv4()
            .and_then(|ip| ipv4_of(&ip))
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        SocketAddr::V6(_) => addrs.ipv6().unwrap_or(IpAddr::V6(Ipv6Addr::UNSPECIFIED)),
    }
}

/// Bind `src`, then connect to `dst`.
fn connect_from(src: SocketAddr, dst: SocketAddr, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let socket = Socket::new(Domain::for_address(dst), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&SockAddr::from(src))?;

    let dst = SockAddr::from(dst);
    match timeout {
        Some(t) => socket.connect_timeout(&dst, t)?,
        None => socket.connect(&dst)?,
    }

    Ok(socket.into())
}

/// Active open from `device` (source port `src_port`, 0 = ephemeral) to
/// `remote`. Connect latency is logged and kept in the connection's
/// telemetry.
pub fn dial(
    device: &Device,
    src_port: u16,
    remote: SocketAddr,
    crypt: Arc<dyn Crypt>,
    options: &ConnOptions,
) -> Result<TcpConn, ConnError> {
    let src = SocketAddr::new(source_ip(device, &remote), src_port);
    let dial_err = |e: io::Error| OpError::new(Op::Dial, Some(src), Some(remote), Cause::Io(e));

    info!("connect to server {}", remote);

    let start = Instant::now();
    let stream = connect_from(src, remote, options.connect_timeout).map_err(dial_err)?;
    let latency = start.elapsed();

    info!("connected to server {} in {:.3} ms (RTT)", remote, duration_ms(latency));

    let mut conn = TcpConn::from_stream(stream, crypt, options, start).map_err(dial_err)?;
    conn.record_connect(latency);
    Ok(conn)
}
