//! End-to-end test of the NAT responder over a real UDP socket.

use std::time::Duration;

use gameservice_nat::packet::flags;
use gameservice_nat::{NatServer, SrpPacket, SrpWindow};
use tokio::net::UdpSocket;

fn syn(seq: u16) -> [u8; 20] {
    SrpPacket {
        checksum: 0x1234,
        signature: 7,
        data_size: 8,
        flags: flags::SYN,
        seq,
        ack: 0,
        window: SrpWindow {
            tail: 1,
            sender_signature: 0xBEEF,
            checksum_init: 0x42,
            buffer_size: 536,
        },
    }
    .to_bytes()
}

#[tokio::test]
async fn test_syn_gets_syn_ack() {
    let server = NatServer::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client.send_to(&syn(100), addr).await.unwrap();

    let mut buf = [0u8; 64];
    let (len, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
        .await
        .expect("reply within timeout")
        .unwrap();

    assert_eq!(
        &buf[..len],
        &[
            0x93, 0x0d, 0xef, 0xbe, 0x08, 0x00, 0x46, 0x30, 0x65, 0x00, 0x64, 0x00, 0x0a, 0x00,
            0x02, 0x00, 0x00, 0x00, 0x18, 0x02
        ]
    );
}

#[tokio::test]
async fn test_garbage_does_not_stop_the_service() {
    let server = NatServer::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    client.send_to(&[0xFF; 3], addr).await.unwrap();
    client.send_to(&syn(7), addr).await.unwrap();

    let mut buf = [0u8; 64];
    let (len, _) = tokio::time::timeout(Duration::from_secs(5), client.recv_from(&mut buf))
        .await
        .expect("reply within timeout")
        .unwrap();
    let reply = SrpPacket::parse(&buf[..len]).unwrap().unwrap();
    assert_eq!(reply.ack, 7);
    assert_eq!(reply.seq, 8);
}
