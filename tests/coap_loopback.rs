//! Real CoAP client against a local UDP responder

use std::net::SocketAddr;
use std::time::Duration;

use coap_lite::{CoapOption, MessageClass, MessageType, Packet, ResponseType};
use tokio::net::UdpSocket;

use lane_runner::net::{self, CoapClient, Endpoint, NetworkError, ResourceClient};

async fn responder() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    (socket, addr)
}

async fn recv_packet(socket: &UdpSocket) -> (Packet, SocketAddr) {
    let mut buf = [0u8; 1152];
    let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
    (Packet::from_bytes(&buf[..len]).unwrap(), peer)
}

fn reply(ty: MessageType, id: u16, token: &[u8], code: ResponseType, payload: &[u8]) -> Vec<u8> {
    let mut packet = Packet::new();
    packet.header.set_type(ty);
    packet.header.code = MessageClass::Response(code);
    packet.header.message_id = id;
    packet.set_token(token.to_vec());
    packet.payload = payload.to_vec();
    packet.to_bytes().unwrap()
}

fn client(addr: SocketAddr, timeout: Duration) -> CoapClient {
    CoapClient::new(Endpoint::new("127.0.0.1", addr.port(), "zahl"), timeout)
}

#[tokio::test]
async fn piggybacked_response() {
    let (socket, addr) = responder().await;
    let server = tokio::spawn(async move {
        let (request, peer) = recv_packet(&socket).await;
        assert_eq!(request.header.get_type(), MessageType::Confirmable);
        let path: Vec<Vec<u8>> = request
            .get_option(CoapOption::UriPath)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default();
        assert_eq!(path, vec![b"zahl".to_vec()]);

        let bytes = reply(
            MessageType::Acknowledgement,
            request.header.message_id,
            request.get_token(),
            ResponseType::Content,
            b"3000",
        );
        socket.send_to(&bytes, peer).await.unwrap();
    });

    let payload = client(addr, Duration::from_secs(2)).fetch().await.unwrap();
    server.await.unwrap();
    assert_eq!(net::decode(&payload), Ok(3000));
}

#[tokio::test]
async fn separate_response_is_acknowledged() {
    let (socket, addr) = responder().await;
    let server = tokio::spawn(async move {
        let (request, peer) = recv_packet(&socket).await;

        // Empty ACK first, the real answer afterwards
        let mut ack = Packet::new();
        ack.header.set_type(MessageType::Acknowledgement);
        ack.header.code = MessageClass::Empty;
        ack.header.message_id = request.header.message_id;
        socket.send_to(&ack.to_bytes().unwrap(), peer).await.unwrap();

        let separate_id = request.header.message_id.wrapping_add(1000);
        let bytes = reply(
            MessageType::Confirmable,
            separate_id,
            request.get_token(),
            ResponseType::Content,
            b"500",
        );
        socket.send_to(&bytes, peer).await.unwrap();

        let (client_ack, _) = recv_packet(&socket).await;
        assert_eq!(client_ack.header.get_type(), MessageType::Acknowledgement);
        assert_eq!(client_ack.header.message_id, separate_id);
    });

    let payload = client(addr, Duration::from_secs(2)).fetch().await.unwrap();
    server.await.unwrap();
    assert_eq!(payload, b"500".to_vec());
}

#[tokio::test]
async fn error_code_is_protocol_error() {
    let (socket, addr) = responder().await;
    tokio::spawn(async move {
        let (request, peer) = recv_packet(&socket).await;
        let bytes = reply(
            MessageType::Acknowledgement,
            request.header.message_id,
            request.get_token(),
            ResponseType::NotFound,
            b"",
        );
        socket.send_to(&bytes, peer).await.unwrap();
    });

    let err = client(addr, Duration::from_secs(2)).fetch().await.unwrap_err();
    assert!(matches!(err, NetworkError::Protocol(_)));
}

#[tokio::test]
async fn silent_server_times_out() {
    // Bound but never answers
    let (_socket, addr) = responder().await;
    let timeout = Duration::from_millis(100);

    let err = client(addr, timeout).fetch().await.unwrap_err();
    assert!(matches!(err, NetworkError::Timeout(t) if t == timeout));
}
