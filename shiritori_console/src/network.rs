use std::fmt;
use std::net::{TcpStream, ToSocketAddrs};

use itertools::Itertools;
use shiritori::event::{ShiritoriClientEvent, ShiritoriServerEvent, parse_server_event};
use tungstenite::client::IntoClientRequest;
use tungstenite::handshake::HandshakeError;
use tungstenite::http::header;
use tungstenite::protocol::Role;
use tungstenite::{Message, WebSocket};
use url::Url;


pub const GAME_SOCKET_PATH: &str = "/game_ws";

#[derive(Debug)]
pub enum CommunicationError {
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    Protocol(String),
}

impl fmt::Display for CommunicationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommunicationError::Socket(err) => write!(f, "socket error: {err}"),
            CommunicationError::Serde(err) => write!(f, "bad message: {err}"),
            CommunicationError::Protocol(message) => write!(f, "protocol error: {message}"),
        }
    }
}

impl std::error::Error for CommunicationError {}

// Opens the realtime connection, forwarding the login session cookie on the
// upgrade request. Plain `ws://` only, like the rest of the client.
pub fn connect(
    base_url: &Url, session_cookie: Option<&str>,
) -> Result<WebSocket<TcpStream>, CommunicationError> {
    let host = base_url
        .host_str()
        .ok_or_else(|| CommunicationError::Protocol(format!("No host in {base_url}")))?;
    let port = base_url.port_or_known_default().unwrap_or(80);
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|err| CommunicationError::Socket(tungstenite::Error::Io(err)))?
        .collect_vec();
    let stream = TcpStream::connect(&addrs[..])
        .map_err(|err| CommunicationError::Socket(tungstenite::Error::Io(err)))?;

    let ws_url = format!("ws://{host}:{port}{GAME_SOCKET_PATH}");
    let mut request = ws_url.into_client_request().map_err(CommunicationError::Socket)?;
    if let Some(cookie) = session_cookie {
        let value = header::HeaderValue::from_str(cookie)
            .map_err(|_| CommunicationError::Protocol("Session cookie is not a valid header".to_owned()))?;
        request.headers_mut().insert(header::COOKIE, value);
    }

    let (socket, _response) = tungstenite::client(request, stream).map_err(|err| match err {
        HandshakeError::Failure(err) => CommunicationError::Socket(err),
        HandshakeError::Interrupted(_) => {
            CommunicationError::Protocol("Handshake interrupted".to_owned())
        }
    })?;
    Ok(socket)
}

// Returns `Ok(None)` for messages that carry no event: unknown types and
// control frames. `Serde` errors are recoverable (log and discard); anything
// else means the connection is gone.
pub fn read_event(
    socket: &mut WebSocket<TcpStream>,
) -> Result<Option<ShiritoriServerEvent>, CommunicationError> {
    let msg = socket.read().map_err(CommunicationError::Socket)?;
    match msg {
        Message::Text(text) => parse_server_event(text.as_str()).map_err(CommunicationError::Serde),
        Message::Ping(_) | Message::Pong(_) => Ok(None),
        other => Err(CommunicationError::Protocol(format!("Expected text, got {other:?}"))),
    }
}

pub fn write_event(
    socket: &mut WebSocket<TcpStream>, event: &ShiritoriClientEvent,
) -> Result<(), CommunicationError> {
    let serialized = serde_json::to_string(event).map_err(CommunicationError::Serde)?;
    socket.send(Message::text(serialized)).map_err(CommunicationError::Socket)
}

// Read and write halves run on separate threads, each with its own handle to
// the same stream.
pub fn clone_websocket(
    socket: &WebSocket<TcpStream>, role: Role,
) -> Result<WebSocket<TcpStream>, CommunicationError> {
    let stream = socket
        .get_ref()
        .try_clone()
        .map_err(|err| CommunicationError::Socket(tungstenite::Error::Io(err)))?;
    let config = *socket.get_config();
    Ok(WebSocket::from_raw_socket(stream, role, Some(config)))
}
