//! Transport to the bootstrap node.
//!
//! ## Framing
//!
//! ```text
//! +----------------+-----------+--------------------+
//! | length (4B BE) | type (1B) | payload (length-1) |
//! +----------------+-----------+--------------------+
//! ```
//!
//! `length` counts the type byte plus the payload and is capped at
//! [`MAX_FRAME_LEN`]. Payloads are bincode.
//!
//! [`TcpTransport`] opens one connection per message: a broadcast writes a
//! frame and closes, a request writes a frame and reads exactly one back.
//! Tests swap in their own [`Transport`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::trace;

use super::message::MessageType;
use crate::config::MAX_FRAME_LEN;
use crate::error::{ClientError, ClientResult};

/// One typed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub msg_type: MessageType,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(msg_type: MessageType, payload: Vec<u8>) -> Self {
        Self { msg_type, payload }
    }

    pub fn encode(&self) -> ClientResult<Bytes> {
        let len = u32::try_from(self.payload.len() + 1)
            .ok()
            .filter(|&len| len <= MAX_FRAME_LEN)
            .ok_or_else(|| {
                ClientError::Transport(format!(
                    "frame of {} bytes exceeds limit",
                    self.payload.len() + 1
                ))
            })?;

        let mut buf = BytesMut::with_capacity(4 + len as usize);
        buf.put_u32(len);
        buf.put_u8(self.msg_type.code());
        buf.put_slice(&self.payload);
        Ok(buf.freeze())
    }
}

/// Read one frame from `reader`.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> ClientResult<Frame> {
    let len = reader.read_u32().await.map_err(io_error)?;
    if len == 0 || len > MAX_FRAME_LEN {
        return Err(ClientError::Transport(format!("invalid frame length {len}")));
    }
    let code = reader.read_u8().await.map_err(io_error)?;
    let mut payload = vec![0u8; len as usize - 1];
    reader.read_exact(&mut payload).await.map_err(io_error)?;
    Ok(Frame::new(MessageType::from_code(code), payload))
}

fn io_error(e: std::io::Error) -> ClientError {
    ClientError::Transport(e.to_string())
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// `SendTransaction` / request-response access to a network endpoint.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Fire-and-forget delivery.
    async fn send(&self, endpoint: &str, frame: Frame) -> ClientResult<()>;

    /// Send `frame` and wait for the single reply.
    async fn request(&self, endpoint: &str, frame: Frame) -> ClientResult<Frame>;
}

/// Plain TCP, one connection per message.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    connect_timeout: Duration,
}

impl TcpTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    async fn connect(&self, endpoint: &str) -> ClientResult<TcpStream> {
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(endpoint)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ClientError::Transport(format!("connect {endpoint}: {e}"))),
            Err(_) => Err(ClientError::Transport(format!(
                "connect {endpoint}: timed out after {}ms",
                self.connect_timeout.as_millis()
            ))),
        }
    }

    async fn write(&self, stream: &mut TcpStream, frame: &Frame) -> ClientResult<()> {
        let bytes = frame.encode()?;
        stream.write_all(&bytes).await.map_err(io_error)?;
        stream.flush().await.map_err(io_error)?;
        Ok(())
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, endpoint: &str, frame: Frame) -> ClientResult<()> {
        let mut stream = self.connect(endpoint).await?;
        self.write(&mut stream, &frame).await?;
        trace!(endpoint, msg_type = %frame.msg_type, len = frame.payload.len(), "frame sent");
        Ok(())
    }

    async fn request(&self, endpoint: &str, frame: Frame) -> ClientResult<Frame> {
        let mut stream = self.connect(endpoint).await?;
        self.write(&mut stream, &frame).await?;
        let reply = read_frame(&mut stream).await?;
        trace!(endpoint, msg_type = %reply.msg_type, "reply received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn encode_layout() {
        let bytes = Frame::new(MessageType::FundsTxBroadcast, vec![7, 8, 9])
            .encode()
            .unwrap();
        assert_eq!(&bytes[..], &[0, 0, 0, 4, 2, 7, 8, 9]);
    }

    #[tokio::test]
    async fn read_frame_parses_encoded_bytes() {
        let frame = Frame::new(MessageType::AccountResponse, b"hello".to_vec());
        let bytes = frame.encode().unwrap();
        let mut reader = &bytes[..];
        assert_eq!(read_frame(&mut reader).await.unwrap(), frame);
    }

    #[tokio::test]
    async fn read_frame_rejects_oversized_length() {
        let mut bytes = (MAX_FRAME_LEN + 1).to_be_bytes().to_vec();
        bytes.push(1);
        let mut reader = &bytes[..];
        assert!(matches!(
            read_frame(&mut reader).await,
            Err(ClientError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn tcp_request_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let req = read_frame(&mut socket).await.unwrap();
            assert_eq!(req.msg_type, MessageType::AccountRequest);
            let reply = Frame::new(MessageType::AccountResponse, req.payload);
            socket.write_all(&reply.encode().unwrap()).await.unwrap();
        });

        let transport = TcpTransport::new(Duration::from_secs(1));
        let reply = transport
            .request(&addr, Frame::new(MessageType::AccountRequest, vec![1, 2]))
            .await
            .unwrap();
        assert_eq!(reply, Frame::new(MessageType::AccountResponse, vec![1, 2]));
    }

    #[tokio::test]
    async fn connect_failure_is_a_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let transport = TcpTransport::new(Duration::from_millis(500));
        let err = transport
            .send(&addr, Frame::new(MessageType::ConfigTxBroadcast, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
