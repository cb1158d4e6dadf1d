use crate::*;

use std::time::Duration;

use tokio::{
    io::{
        AsyncRead,
        AsyncReadExt,
        AsyncWrite,
        AsyncWriteExt,
    },
    net::TcpStream,
    time::{
        timeout,
        Instant,
    },
};

/// Maximum size of an outbound line, in bytes, excluding the terminator.
pub const MAX_LINE_LEN: usize = 510;

const READ_CHUNK_SIZE: usize = 1024;

/// A single connection to an IRC server, at the level of protocol lines.
///
/// The transport owns the stream exclusively. It tracks when the server last
/// showed any sign of life; while waiting for input it will check on an idle
/// server with `PING`, and give up with [`TransportFault::ServerUnresponsive`]
/// once nothing has been heard for longer than the idle timeout.
pub struct Transport<S>
{
    stream: S,
    framer: LineFramer,
    idle_timeout: Duration,
    last_alive: Instant,
    server_name: String,
}

impl Transport<TcpStream>
{
    /// Connect to `address:port` and perform the initial handshake.
    ///
    /// Connecting is bounded by the idle timeout.
    #[tracing::instrument(skip(idle_timeout))]
    pub async fn connect(address: &str, port: u16, idle_timeout: Duration) -> Result<Self, TransportFault>
    {
        let stream = match timeout(idle_timeout, TcpStream::connect((address, port))).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(TransportFault::Connect(e.to_string())),
            Err(_) => return Err(TransportFault::Connect("timed out".to_string())),
        };

        Self::handshake(stream, idle_timeout).await
    }
}

impl<S> Transport<S>
    where S: AsyncRead + AsyncWrite + Unpin
{
    /// Wrap an already-established stream.
    ///
    /// The first line the server sends is consumed here to learn the name it
    /// announces itself with; that name is the argument of every keepalive
    /// `PING`. Nothing is sent while waiting for it, and the wait as a
    /// whole is bounded by the idle timeout.
    pub async fn handshake(stream: S, idle_timeout: Duration) -> Result<Self, TransportFault>
    {
        let mut transport = Self {
            stream,
            framer: LineFramer::new(),
            idle_timeout,
            last_alive: Instant::now(),
            server_name: String::new(),
        };

        let first_line = match timeout(idle_timeout, transport.first_line()).await
        {
            Ok(Ok(line)) => line,
            Ok(Err(fault)) => return Err(TransportFault::Handshake(fault.to_string())),
            Err(_) => return Err(TransportFault::Handshake("no greeting from server".to_string())),
        };

        transport.server_name = match server_name_from(&first_line)
        {
            Some(name) => name.to_string(),
            None => return Err(TransportFault::Handshake(format!("no server name in {:?}", first_line))),
        };
        tracing::debug!(server_name = %transport.server_name, "Handshake complete");

        Ok(transport)
    }

    /// The name the server announced in its first line.
    pub fn server_name(&self) -> &str
    {
        &self.server_name
    }

    /// Receive the next line from the server.
    ///
    /// Returns `Ok(None)` when no line arrived within half the idle timeout;
    /// in that case a keepalive `PING` has been sent, and the caller should
    /// simply call again.
    pub async fn receive(&mut self) -> Result<Option<String>, TransportFault>
    {
        let line = self.read_line(true).await?;
        if let Some(line) = &line
        {
            tracing::debug!(%line, "received");
        }
        Ok(line)
    }

    /// Send one line to the server.
    ///
    /// Embedded CR and LF characters are replaced with spaces. Lines longer
    /// than [`MAX_LINE_LEN`] bytes are dropped with a warning rather than
    /// truncated or split.
    pub async fn send(&mut self, text: &str) -> Result<(), TransportFault>
    {
        let line = text.replace(|c: char| c == '\r' || c == '\n', " ");
        if line.len() > MAX_LINE_LEN
        {
            tracing::warn!(%line, "Not sending line to server (too long)");
            return Ok(());
        }

        let mut frame = Vec::with_capacity(line.len() + 2);
        frame.extend_from_slice(line.as_bytes());
        frame.extend_from_slice(b"\r\n");

        self.stream.write_all(&frame).await?;
        self.stream.flush().await?;

        tracing::debug!(%line, "sent");
        Ok(())
    }

    async fn first_line(&mut self) -> Result<String, TransportFault>
    {
        loop
        {
            if let Some(line) = self.read_line(false).await?
            {
                return Ok(line);
            }
        }
    }

    async fn read_line(&mut self, send_ping: bool) -> Result<Option<String>, TransportFault>
    {
        if let Some(line) = self.framer.next_line()
        {
            return Ok(Some(line));
        }

        let mut buf = [0u8; READ_CHUNK_SIZE];
        loop
        {
            let len = match timeout(self.idle_timeout / 2, self.stream.read(&mut buf)).await
            {
                Ok(result) => result?,
                Err(_) =>
                {
                    self.check_liveness(send_ping).await?;
                    return Ok(None);
                }
            };

            if len == 0
            {
                return Err(TransportFault::ConnectionClosed);
            }

            self.last_alive = Instant::now();
            let discarded = self.framer.feed(&buf[..len]);
            if discarded > 0
            {
                tracing::warn!(discarded, "Dropping input from overlong line");
            }

            if let Some(line) = self.framer.next_line()
            {
                return Ok(Some(line));
            }
        }
    }

    async fn check_liveness(&mut self, send_ping: bool) -> Result<(), TransportFault>
    {
        if self.last_alive.elapsed() > self.idle_timeout
        {
            tracing::debug!(idle_timeout = ?self.idle_timeout, "Server not answering");
            return Err(TransportFault::ServerUnresponsive);
        }

        if send_ping
        {
            let ping = format!("PING {}", self.server_name);
            self.send(&ping).await?;
        }
        Ok(())
    }
}

fn server_name_from(line: &str) -> Option<&str>
{
    line.split(' ')
        .next()
        .and_then(|token| token.strip_prefix(':'))
        .filter(|name| !name.is_empty())
}
