//! End-to-end test of the CD-key service over a real UDP socket.

use std::time::Duration;

use gameservice_cdkey::message::CDKEY_KEY;
use gameservice_cdkey::{CdKeyServer, Datagram};
use gameservice_protocol::{SymmetricKey, Value};
use tokio::net::UdpSocket;

fn key() -> SymmetricKey {
    SymmetricKey::new(CDKEY_KEY.to_vec()).unwrap()
}

fn request(id: &str, request_type: &str) -> Vec<u8> {
    Datagram {
        msg_type: 211,
        data: vec![
            Value::from(id),
            Value::from(request_type),
            Value::from("0"),
            Value::List(vec![]),
        ],
    }
    .to_bytes(&key())
}

#[tokio::test]
async fn test_challenge_round_trip() {
    let server = CdKeyServer::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client.send_to(&request("9", "1"), addr).await.unwrap();

    let mut buf = [0u8; 1024];
    let (len, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
        .await
        .expect("reply within timeout")
        .unwrap();

    let reply = Datagram::parse(&buf[..len], &key()).unwrap().unwrap();
    assert_eq!(reply.data[0], Value::from("9"));
    assert_eq!(reply.data[1], Value::from("1"));
    assert_eq!(reply.data[3].as_list().unwrap()[0], Value::from("38"));
}

#[tokio::test]
async fn test_bad_datagram_does_not_stop_the_service() {
    let server = CdKeyServer::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client.send_to(&[211, 0xFF, 0xFF, 0xFF, 0xFF], addr).await.unwrap();
    client.send_to(&request("10", "3"), addr).await.unwrap();

    let mut buf = [0u8; 1024];
    let (len, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
        .await
        .expect("reply within timeout")
        .unwrap();
    let reply = Datagram::parse(&buf[..len], &key()).unwrap().unwrap();
    assert_eq!(reply.data[0], Value::from("10"));
}
