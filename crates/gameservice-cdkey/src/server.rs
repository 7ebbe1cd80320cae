//! The UDP receive loop.

use std::net::SocketAddr;
use std::sync::Arc;

use gameservice_protocol::{MessageType, SymmetricKey};
use tokio::net::{ToSocketAddrs, UdpSocket};

use crate::handlers::respond;
use crate::message::{CDKEY_KEY, Datagram, HEADER_SIZE, MAX_PAYLOAD, Request};
use crate::CdKeyError;

/// Answers CD-key datagrams on one UDP socket.
pub struct CdKeyServer {
    socket: Arc<UdpSocket>,
    key: Arc<SymmetricKey>,
}

impl CdKeyServer {
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, CdKeyError> {
        let socket = UdpSocket::bind(addr).await?;
        let key = SymmetricKey::new(CDKEY_KEY.to_vec())?;
        Ok(Self {
            socket: Arc::new(socket),
            key: Arc::new(key),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, CdKeyError> {
        Ok(self.socket.local_addr()?)
    }

    /// Receives forever. Each datagram is handled on its own task; a bad
    /// datagram is logged and dropped.
    pub async fn run(self) -> Result<(), CdKeyError> {
        tracing::info!(addr = ?self.socket.local_addr().ok(), "cd-key service listening");
        let mut buf = vec![0u8; HEADER_SIZE + MAX_PAYLOAD];

        loop {
            let (len, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    tracing::error!(error = %e, "cd-key receive failed");
                    continue;
                }
            };

            let data = buf[..len].to_vec();
            let socket = Arc::clone(&self.socket);
            let key = Arc::clone(&self.key);
            tokio::spawn(async move {
                match handle_datagram(&data, &key) {
                    Ok(Some(reply)) => {
                        if let Err(e) = socket.send_to(&reply, peer).await {
                            tracing::warn!(%peer, error = %e, "cd-key send failed");
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(%peer, error = %e, "cd-key datagram dropped"),
                }
            });
        }
    }
}

/// Turns one request datagram into the reply datagram, if any.
pub fn handle_datagram(bytes: &[u8], key: &SymmetricKey) -> Result<Option<Vec<u8>>, CdKeyError> {
    let Some(datagram) = Datagram::parse(bytes, key)? else {
        return Ok(None);
    };
    if datagram.msg_type != MessageType::SetGroupSzData.as_u8() {
        return Err(CdKeyError::UnsupportedType(datagram.msg_type));
    }

    let request = Request::from_data(&datagram.data)?;
    tracing::debug!(id = %request.message_id, request_type = request.request_type, "-> cd-key request");

    let Some(data) = respond(&request) else {
        return Ok(None);
    };
    let reply = Datagram {
        msg_type: datagram.msg_type,
        data,
    };
    Ok(Some(reply.to_bytes(key)))
}

#[cfg(test)]
mod tests {
    use gameservice_protocol::Value;

    use super::*;

    fn key() -> SymmetricKey {
        SymmetricKey::new(CDKEY_KEY.to_vec()).unwrap()
    }

    fn datagram(msg_type: u8, request_type: &str) -> Vec<u8> {
        Datagram {
            msg_type,
            data: vec![
                Value::from("1"),
                Value::from(request_type),
                Value::from("0"),
                Value::List(vec![]),
            ],
        }
        .to_bytes(&key())
    }

    #[test]
    fn test_challenge_gets_reply() {
        let reply = handle_datagram(&datagram(211, "1"), &key()).unwrap().unwrap();
        let parsed = Datagram::parse(&reply, &key()).unwrap().unwrap();
        assert_eq!(parsed.msg_type, 211);
        assert_eq!(parsed.data[3].as_list().unwrap()[0], Value::from("38"));
    }

    #[test]
    fn test_other_message_types_rejected() {
        let err = handle_datagram(&datagram(102, "1"), &key()).unwrap_err();
        assert!(matches!(err, CdKeyError::UnsupportedType(102)));
    }

    #[test]
    fn test_still_alive_gets_no_reply() {
        assert!(handle_datagram(&datagram(211, "7"), &key()).unwrap().is_none());
    }

    #[test]
    fn test_garbage_is_an_error() {
        let mut bytes = vec![211, 0, 0, 0, 8];
        bytes.extend_from_slice(&[0xAB; 8]);
        assert!(handle_datagram(&bytes, &key()).is_err());
    }
}
