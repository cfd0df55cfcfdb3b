//! CoAP GET client over UDP
//!
//! Sends one confirmable GET per fetch and waits for the matching response,
//! either piggybacked on the ACK or sent separately afterwards.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use coap_lite::{CoapOption, MessageClass, MessageType, Packet, RequestType, ResponseType};
use serde::{Deserialize, Serialize};
use tokio::net::{UdpSocket, lookup_host};

use super::{NetworkError, ResourceClient};

/// Largest datagram we expect back
const MAX_DATAGRAM: usize = 1152;

/// Address of the sensor resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            path: path.into(),
        }
    }

    pub fn uri(&self) -> String {
        format!(
            "coap://{}:{}/{}",
            self.host,
            self.port,
            self.path.trim_start_matches('/')
        )
    }
}

/// How an incoming datagram relates to our outstanding request
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    /// Not ours (stale exchange, wrong token)
    Ignore,
    /// Empty ACK: the server will send the response separately
    Pending,
    /// Server refused the request
    Reset,
    /// The response we are waiting for
    Response,
}

fn classify_reply(packet: &Packet, message_id: u16, token: &[u8]) -> Reply {
    let ty = packet.header.get_type();
    let matches_id = packet.header.message_id == message_id;

    match (ty, &packet.header.code) {
        (MessageType::Reset, _) if matches_id => Reply::Reset,
        (MessageType::Acknowledgement, MessageClass::Empty) if matches_id => Reply::Pending,
        (_, MessageClass::Response(_)) if packet.get_token() == token => Reply::Response,
        _ => Reply::Ignore,
    }
}

fn is_success(code: &MessageClass) -> bool {
    matches!(
        code,
        MessageClass::Response(
            ResponseType::Created
                | ResponseType::Deleted
                | ResponseType::Valid
                | ResponseType::Changed
                | ResponseType::Content
        )
    )
}

/// Encode a confirmable GET for `path`
fn build_get(path: &str, message_id: u16, token: &[u8]) -> Result<Vec<u8>, NetworkError> {
    let mut packet = Packet::new();
    packet.header.set_type(MessageType::Confirmable);
    packet.header.code = MessageClass::Request(RequestType::Get);
    packet.header.message_id = message_id;
    packet.set_token(token.to_vec());
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        packet.add_option(CoapOption::UriPath, segment.as_bytes().to_vec());
    }
    packet
        .to_bytes()
        .map_err(|e| NetworkError::Protocol(format!("cannot encode request: {e:?}")))
}

fn build_empty_ack(message_id: u16) -> Result<Vec<u8>, NetworkError> {
    let mut packet = Packet::new();
    packet.header.set_type(MessageType::Acknowledgement);
    packet.header.code = MessageClass::Empty;
    packet.header.message_id = message_id;
    packet
        .to_bytes()
        .map_err(|e| NetworkError::Protocol(format!("cannot encode ack: {e:?}")))
}

/// CoAP client bound to one endpoint
#[derive(Debug, Clone)]
pub struct CoapClient {
    endpoint: Endpoint,
    timeout: Duration,
}

impl CoapClient {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn resolve(&self) -> Result<SocketAddr, NetworkError> {
        let host = self.endpoint.host.as_str();
        lookup_host((host, self.endpoint.port))
            .await?
            .next()
            .ok_or_else(|| {
                NetworkError::Connection(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("could not resolve {host}"),
                ))
            })
    }

    async fn exchange(&self) -> Result<Vec<u8>, NetworkError> {
        let addr = self.resolve().await?;
        let local: SocketAddr = if addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(addr).await?;

        let message_id: u16 = rand::random();
        let token: [u8; 4] = rand::random();
        socket
            .send(&build_get(&self.endpoint.path, message_id, &token)?)
            .await?;

        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            let len = socket.recv(&mut buf).await?;
            let packet = Packet::from_bytes(&buf[..len])
                .map_err(|e| NetworkError::Protocol(format!("undecodable datagram: {e:?}")))?;

            match classify_reply(&packet, message_id, &token) {
                Reply::Ignore => {
                    log::trace!("Ignoring unrelated datagram from {}", addr);
                }
                Reply::Pending => {
                    log::trace!("Request {} acknowledged, waiting for response", message_id);
                }
                Reply::Reset => {
                    return Err(NetworkError::Protocol("request reset by server".into()));
                }
                Reply::Response => {
                    if packet.header.get_type() == MessageType::Confirmable {
                        socket.send(&build_empty_ack(packet.header.message_id)?).await?;
                    }
                    if !is_success(&packet.header.code) {
                        return Err(NetworkError::Protocol(format!(
                            "unexpected response code {:?}",
                            packet.header.code
                        )));
                    }
                    return Ok(packet.payload);
                }
            }
        }
    }
}

impl ResourceClient for CoapClient {
    async fn fetch(&self) -> Result<Vec<u8>, NetworkError> {
        match tokio::time::timeout(self.timeout, self.exchange()).await {
            Ok(result) => result,
            Err(_) => Err(NetworkError::Timeout(self.timeout)),
        }
    }

    fn describe(&self) -> String {
        self.endpoint.uri()
    }
}
