//! net/conn.rs
//! Encrypted, datagram-framed TCP connection.
//!
//! Receive path: socket bytes → whole sealed messages → decrypt → frame
//! extractor → stash → caller, one whole datagram per `read`. Send path:
//! datagram → encrypt → one socket write.
//!
//! A connection splits into a read half and a write half so one reader and
//! one writer can drive it from different threads. Neither half locks: two
//! concurrent readers (or writers) are not supported.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use crate::config::ConnOptions;
use crate::constants::MAX_DATAGRAM_LEN;
use crate::crypto::{Crypt, CryptoError};
use crate::destick::{Desticker, FrameExtractor};
use crate::net::error::{Cause, ConnError, Op, OpError};
use crate::telemetry::{ConnCounters, ConnSnapshot, Stage, TelemetryTimer};

/// Stream-socket contract shared by framed connections.
pub trait Conn {
    /// Read one whole datagram into `buf`. `Ok(0)` means a frame is still
    /// incomplete and the caller should read again; it is not end-of-stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ConnError>;

    /// Send `buf` as exactly one frame.
    fn write(&mut self, buf: &[u8]) -> Result<usize, ConnError>;

    fn local_addr(&self) -> io::Result<SocketAddr>;

    fn peer_addr(&self) -> io::Result<SocketAddr>;

    fn set_read_timeout(&self, dur: Option<Duration>) -> io::Result<()>;

    fn set_write_timeout(&self, dur: Option<Duration>) -> io::Result<()>;

    /// Read and write timeouts at once.
    fn set_timeout(&self, dur: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(dur)?;
        self.set_write_timeout(dur)
    }
}

/// Which step the next `read` takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// Stashed frames remain; the next read is a memory copy.
    DrainingStash,
    /// Stash exhausted; the next read touches the socket.
    AwaitingData,
}

/// Receive half.
pub struct ConnReader {
    stream: TcpStream,
    crypt: Arc<dyn Crypt>,
    // Contents are only valid until the next socket read.
    buffer: Box<[u8]>,
    // Received bytes not yet part of a whole sealed message.
    pending: BytesMut,
    destick: Box<dyn FrameExtractor>,
    stash: Vec<Bytes>,
    stash_id: usize,
    local: Option<SocketAddr>,
    remote: Option<SocketAddr>,
    counters: ConnCounters,
    timer: TelemetryTimer,
}

impl ConnReader {
    fn new(stream: TcpStream, crypt: Arc<dyn Crypt>, options: &ConnOptions, start: Instant) -> Self {
        let mut destick = Desticker::new();
        destick.set_deadline(options.stale_after);

        Self {
            local: stream.local_addr().ok(),
            remote: stream.peer_addr().ok(),
            stream,
            crypt,
            buffer: vec![0u8; MAX_DATAGRAM_LEN].into_boxed_slice(),
            pending: BytesMut::new(),
            destick: Box::new(destick),
            stash: Vec::new(),
            stash_id: 0,
            counters: ConnCounters::default(),
            timer: TelemetryTimer::started_at(start),
        }
    }

    pub fn state(&self) -> ReadState {
        if self.stash_id < self.stash.len() {
            ReadState::DrainingStash
        } else {
            ReadState::AwaitingData
        }
    }

    /// Frames extracted but not yet delivered.
    pub fn stashed(&self) -> usize {
        self.stash.len() - self.stash_id
    }

    /// Replace the frame extractor. Retained partial bytes of the old one
    /// are dropped.
    pub fn set_extractor(&mut self, mut extractor: Box<dyn FrameExtractor>, stale_after: Duration) {
        extractor.set_deadline(stale_after);
        self.destick = extractor;
    }

    pub fn counters(&self) -> &ConnCounters {
        &self.counters
    }

    /// Bound the blocking socket read. Works on a split half too.
    pub fn set_read_timeout(&self, dur: Option<Duration>) -> io::Result<()> {
        self.stream.set_read_timeout(dur)
    }

    fn op_error(&self, cause: Cause) -> ConnError {
        ConnError::Op(OpError::new(Op::Read, self.local, self.remote, cause))
    }

    /// Decrypt every whole sealed message received so far. `None` while the
    /// first one is still incomplete.
    fn open_pending(&mut self) -> Result<Option<Vec<u8>>, CryptoError> {
        let ready = match self.crypt.sealed_len(&self.pending) {
            Ok(ready) => ready,
            Err(e) => {
                // Message boundaries are lost; nothing buffered can be opened.
                self.pending.clear();
                return Err(e);
            }
        };

        if ready == 0 {
            return Ok(None);
        }

        let sealed = self.pending.split_to(ready);
        self.crypt.decrypt(&sealed).map(Some)
    }

    /// Refill the stash from one socket read. Returns `false` when the read
    /// completed no frame.
    fn fill_stash(&mut self) -> Result<bool, ConnError> {
        let t = Instant::now();
        let res = self.stream.read(&mut self.buffer);
        self.timer.add_stage_time(Stage::Read, t.elapsed());

        let n = res?;
        if n == 0 {
            return Err(ConnError::Eof);
        }
        self.counters.add_wire_read(n);
        self.pending.extend_from_slice(&self.buffer[..n]);

        let t = Instant::now();
        let res = self.open_pending();
        self.timer.add_stage_time(Stage::Decrypt, t.elapsed());

        let plaintext = match res {
            Ok(Some(p)) => p,
            Ok(None) => {
                self.counters.add_incomplete();
                return Ok(false);
            }
            Err(e) => {
                self.counters.add_decrypt_failure();
                debug!(remote = ?self.remote, error = %e, "decrypt failed");
                return Err(self.op_error(Cause::Decrypt(e)));
            }
        };

        let t = Instant::now();
        let res = self.destick.append(&plaintext);
        self.timer.add_stage_time(Stage::Destick, t.elapsed());

        let frames = match res {
            Ok(frames) => frames,
            Err(e) => {
                self.counters.add_destick_failure();
                warn!(remote = ?self.remote, error = %e, "destick failed");
                return Err(self.op_error(Cause::Destick(e)));
            }
        };

        if frames.is_empty() {
            self.counters.add_incomplete();
            return Ok(false);
        }

        self.stash = frames;
        self.stash_id = 0;
        Ok(true)
    }

    pub fn read(&mut self, b: &mut [u8]) -> Result<usize, ConnError> {
        if self.state() == ReadState::AwaitingData && !self.fill_stash()? {
            return Ok(0);
        }

        let frame = &self.stash[self.stash_id];
        if frame.len() > b.len() {
            return Err(ConnError::ShortBuffer {
                needed: frame.len(),
                available: b.len(),
            });
        }

        let n = frame.len();
        b[..n].copy_from_slice(frame);
        self.stash_id += 1;
        self.counters.add_frame_in(n);

        if self.stash_id == self.stash.len() {
            self.stash.clear();
            self.stash_id = 0;
        }

        Ok(n)
    }
}

/// Send half.
pub struct ConnWriter {
    stream: TcpStream,
    crypt: Arc<dyn Crypt>,
    local: Option<SocketAddr>,
    remote: Option<SocketAddr>,
    counters: ConnCounters,
    timer: TelemetryTimer,
}

impl ConnWriter {
    fn new(stream: TcpStream, crypt: Arc<dyn Crypt>, start: Instant) -> Self {
        Self {
            local: stream.local_addr().ok(),
            remote: stream.peer_addr().ok(),
            stream,
            crypt,
            counters: ConnCounters::default(),
            timer: TelemetryTimer::started_at(start),
        }
    }

    pub fn counters(&self) -> &ConnCounters {
        &self.counters
    }

    /// Bound the blocking socket write. Works on a split half too.
    pub fn set_write_timeout(&self, dur: Option<Duration>) -> io::Result<()> {
        self.stream.set_write_timeout(dur)
    }

    /// Encrypt `b` and send it as one frame. Returns the plaintext length.
    pub fn write(&mut self, b: &[u8]) -> Result<usize, ConnError> {
        let t = Instant::now();
        let res = self.crypt.encrypt(b);
        self.timer.add_stage_time(Stage::Encrypt, t.elapsed());

        let contents = match res {
            Ok(c) => c,
            Err(e) => {
                self.counters.add_encrypt_failure();
                return Err(ConnError::Op(OpError::new(Op::Write, self.local, self.remote, Cause::Encrypt(e))));
            }
        };

        let t = Instant::now();
        let res = self.stream.write_all(&contents);
        self.timer.add_stage_time(Stage::Write, t.elapsed());
        res?;

        self.counters.add_frame_out(b.len(), contents.len());
        Ok(b.len())
    }
}

/// Encrypted framed connection over one TCP stream.
pub struct TcpConn {
    reader: ConnReader,
    writer: ConnWriter,
    connect_latency: Option<Duration>,
}

impl TcpConn {
    /// Wrap an established stream. `start` is when the connection attempt
    /// began; telemetry elapsed time counts from there.
    pub(crate) fn from_stream(
        stream: TcpStream,
        crypt: Arc<dyn Crypt>,
        options: &ConnOptions,
        start: Instant,
    ) -> io::Result<Self> {
        stream.set_nodelay(options.nodelay)?;
        let write_stream = stream.try_clone()?;

        Ok(Self {
            reader: ConnReader::new(stream, crypt.clone(), options, start),
            writer: ConnWriter::new(write_stream, crypt, start),
            connect_latency: None,
        })
    }

    /// Wrap an already connected stream.
    pub fn new(stream: TcpStream, crypt: Arc<dyn Crypt>, options: &ConnOptions) -> io::Result<Self> {
        Self::from_stream(stream, crypt, options, Instant::now())
    }

    pub(crate) fn record_connect(&mut self, latency: Duration) {
        self.connect_latency = Some(latency);
        self.reader.timer.add_stage_time(Stage::Connect, latency);
    }

    /// Dial latency; `None` for accepted connections.
    pub fn connect_latency(&self) -> Option<Duration> {
        self.connect_latency
    }

    pub fn read_state(&self) -> ReadState {
        self.reader.state()
    }

    pub fn stashed(&self) -> usize {
        self.reader.stashed()
    }

    pub fn set_extractor(&mut self, extractor: Box<dyn FrameExtractor>, stale_after: Duration) {
        self.reader.set_extractor(extractor, stale_after);
    }

    pub fn crypt(&self) -> &Arc<dyn Crypt> {
        &self.writer.crypt
    }

    /// Counters and stage times of both halves.
    pub fn stats(&self) -> ConnSnapshot {
        let mut counters = self.reader.counters.clone();
        counters.merge(&self.writer.counters);

        let mut timer = self.reader.timer.clone();
        timer.stage_times.merge(&self.writer.timer.stage_times);

        ConnSnapshot::from(&counters, &timer)
    }

    /// Separate read and write halves for use from two threads.
    pub fn into_split(self) -> (ConnReader, ConnWriter) {
        (self.reader, self.writer)
    }

    /// Close the underlying socket. Codec and extractor hold nothing that
    /// needs release.
    pub fn close(self) -> io::Result<()> {
        match self.reader.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
            _ => Ok(()),
        }
    }
}

impl Conn for TcpConn {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ConnError> {
        self.reader.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, ConnError> {
        self.writer.write(buf)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.reader.stream.local_addr()
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.reader.stream.peer_addr()
    }

    fn set_read_timeout(&self, dur: Option<Duration>) -> io::Result<()> {
        self.reader.set_read_timeout(dur)
    }

    fn set_write_timeout(&self, dur: Option<Duration>) -> io::Result<()> {
        self.writer.set_write_timeout(dur)
    }
}

impl std::fmt::Debug for TcpConn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpConn")
            .field("local", &self.reader.local)
            .field("remote", &self.reader.remote)
            .field("method", &self.writer.crypt.method())
            .field("stashed", &self.reader.stashed())
            .finish()
    }
}
