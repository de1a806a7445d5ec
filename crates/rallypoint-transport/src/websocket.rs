//! WebSocket client transport implementation using `tokio-tungstenite`.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{ConnectRequest, Connector, FrameReceiver, FrameSender, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A [`Connector`] that opens WebSocket connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    type Sender = WebSocketSender;
    type Receiver = WebSocketReceiver;

    async fn connect(
        &self,
        request: ConnectRequest<'_>,
    ) -> Result<(Self::Sender, Self::Receiver), TransportError> {
        let mut http_request = request
            .url
            .into_client_request()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        let auth = HeaderValue::from_str(&request.authorization())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        http_request.headers_mut().insert(AUTHORIZATION, auth);

        let (ws, response) = tokio_tungstenite::connect_async(http_request)
            .await
            .map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;
        tracing::debug!(
            url = request.url,
            status = %response.status(),
            "WebSocket handshake complete"
        );

        let (sink, stream) = ws.split();
        Ok((WebSocketSender { sink }, WebSocketReceiver { stream }))
    }
}

/// Write half of a WebSocket connection.
pub struct WebSocketSender {
    sink: SplitSink<WsStream, Message>,
}

impl FrameSender for WebSocketSender {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sink.send(Message::text(text)).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.sink.close().await.map_err(|e| {
            TransportError::CloseFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }
}

/// Read half of a WebSocket connection.
pub struct WebSocketReceiver {
    stream: SplitStream<WsStream>,
}

impl FrameReceiver for WebSocketReceiver {
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(msg @ (Message::Text(_) | Message::Binary(_)))) => {
                    return Ok(Some(msg.into_data().into()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => {
                    return Ok(None);
                }
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }
}
