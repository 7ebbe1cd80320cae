//! SRP packets: a 12-byte header followed by an 8-byte window, every field
//! a little-endian `u16`.
//!
//! ```text
//! header: checksum | signature | data_size | flags | seq | ack
//! window: tail | sender_signature | checksum_init | buffer_size
//! ```

use std::fmt;

use crate::NatError;

pub const HEADER_SIZE: usize = 12;
pub const WINDOW_SIZE: usize = 8;
pub const PACKET_SIZE: usize = HEADER_SIZE + WINDOW_SIZE;

/// Receive buffer size.
pub const BUFFER_SIZE: usize = 1024;

/// Bits of [`SrpPacket::flags`].
pub mod flags {
    pub const FIN: u16 = 1;
    pub const SYN: u16 = 2;
    pub const ACK: u16 = 4;
    pub const URG: u16 = 8;
    /// Marks packets sent by this protocol.
    pub const SRP_ID: u16 = 0x3040;
}

/// Window advertised in every reply.
const REPLY_WINDOW: SrpWindow = SrpWindow {
    tail: 10,
    sender_signature: 2,
    checksum_init: 0,
    buffer_size: 536,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SrpWindow {
    pub tail: u16,
    pub sender_signature: u16,
    /// Value the peer expects in the checksum field while the checksum
    /// is computed.
    pub checksum_init: u16,
    pub buffer_size: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SrpPacket {
    pub checksum: u16,
    pub signature: u16,
    pub data_size: u16,
    pub flags: u16,
    pub seq: u16,
    pub ack: u16,
    pub window: SrpWindow,
}

impl SrpPacket {
    /// Reads one packet from the start of `bytes`.
    ///
    /// Returns `Ok(None)` when the checksum or data size is zero; such
    /// packets carry nothing to answer.
    pub fn parse(bytes: &[u8]) -> Result<Option<Self>, NatError> {
        if bytes.len() < HEADER_SIZE {
            return Err(NatError::Truncated {
                len: bytes.len(),
                expected: HEADER_SIZE,
            });
        }
        let field = |i: usize| u16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]]);

        let checksum = field(0);
        let data_size = field(2);
        if checksum == 0 || data_size == 0 {
            return Ok(None);
        }
        if bytes.len() < PACKET_SIZE {
            return Err(NatError::Truncated {
                len: bytes.len(),
                expected: PACKET_SIZE,
            });
        }

        Ok(Some(Self {
            checksum,
            signature: field(1),
            data_size,
            flags: field(3),
            seq: field(4),
            ack: field(5),
            window: SrpWindow {
                tail: field(6),
                sender_signature: field(7),
                checksum_init: field(8),
                buffer_size: field(9),
            },
        }))
    }

    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let fields = [
            self.checksum,
            self.signature,
            self.data_size,
            self.flags,
            self.seq,
            self.ack,
            self.window.tail,
            self.window.sender_signature,
            self.window.checksum_init,
            self.window.buffer_size,
        ];
        let mut out = [0u8; PACKET_SIZE];
        for (chunk, value) in out.chunks_exact_mut(2).zip(fields) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }

    pub fn is_syn(&self) -> bool {
        self.flags & flags::SYN != 0
    }

    /// The SYN|ACK answering this SYN, checksum included.
    pub fn syn_ack(&self) -> Self {
        let mut reply = Self {
            checksum: self.window.checksum_init,
            signature: self.window.sender_signature,
            data_size: WINDOW_SIZE as u16,
            flags: flags::SRP_ID | flags::SYN | flags::ACK,
            seq: self.seq.wrapping_add(1),
            ack: self.seq,
            window: REPLY_WINDOW,
        };
        reply.checksum = checksum(&reply.to_bytes());
        reply
    }
}

impl fmt::Display for SrpPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "srp checksum={:#06x} sig={} size={} flags={:#06x} seq={} ack={}",
            self.checksum, self.signature, self.data_size, self.flags, self.seq, self.ack
        )
    }
}

/// Ones'-complement sum of little-endian words. An odd leading byte is
/// added on its own first.
pub fn checksum(data: &[u8]) -> u16 {
    let (head, words) = if data.len() % 2 == 1 {
        (u32::from(data[0]), &data[1..])
    } else {
        (0, data)
    };

    let sum = words
        .chunks_exact(2)
        .fold(head, |acc, w| acc + u32::from(u16::from_le_bytes([w[0], w[1]])));

    let mut folded = (sum & 0xFFFF) + (sum >> 16);
    folded += folded >> 16;
    !(folded as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYN_REQUEST: [u8; PACKET_SIZE] = [
        0x34, 0x12, 0x07, 0x00, 0x08, 0x00, 0x02, 0x00, 0x64, 0x00, 0x00, 0x00, 0x01, 0x00, 0xef,
        0xbe, 0x42, 0x00, 0x18, 0x02,
    ];

    #[test]
    fn test_parse_fields() {
        let packet = SrpPacket::parse(&SYN_REQUEST).unwrap().unwrap();
        assert_eq!(packet.checksum, 0x1234);
        assert_eq!(packet.signature, 7);
        assert_eq!(packet.seq, 100);
        assert!(packet.is_syn());
        assert_eq!(packet.window.sender_signature, 0xBEEF);
        assert_eq!(packet.window.checksum_init, 0x42);
        assert_eq!(packet.to_bytes(), SYN_REQUEST);
    }

    #[test]
    fn test_syn_ack_reply() {
        let reply = SrpPacket::parse(&SYN_REQUEST).unwrap().unwrap().syn_ack();
        assert_eq!(reply.signature, 0xBEEF);
        assert_eq!(reply.data_size, 8);
        assert_eq!(reply.flags, 0x3046);
        assert_eq!(reply.seq, 101);
        assert_eq!(reply.ack, 100);
        assert_eq!(reply.window.buffer_size, 536);
        assert_eq!(reply.checksum, 0x0d93);
    }

    #[test]
    fn test_syn_ack_checksum_is_over_seeded_packet() {
        let reply = SrpPacket::parse(&SYN_REQUEST).unwrap().unwrap().syn_ack();
        let mut seeded = reply;
        seeded.checksum = 0x42;
        assert_eq!(checksum(&seeded.to_bytes()), reply.checksum);
    }

    #[test]
    fn test_empty_packets_are_skipped() {
        let mut zero_checksum = SYN_REQUEST;
        zero_checksum[0] = 0;
        zero_checksum[1] = 0;
        assert_eq!(SrpPacket::parse(&zero_checksum).unwrap(), None);

        let mut zero_size = SYN_REQUEST;
        zero_size[4] = 0;
        assert_eq!(SrpPacket::parse(&zero_size).unwrap(), None);

        assert_eq!(SrpPacket::parse(&[0u8; 12]).unwrap(), None);
    }

    #[test]
    fn test_truncated_packets() {
        assert!(matches!(
            SrpPacket::parse(&SYN_REQUEST[..5]),
            Err(NatError::Truncated { expected: 12, .. })
        ));
        assert!(matches!(
            SrpPacket::parse(&SYN_REQUEST[..15]),
            Err(NatError::Truncated { expected: 20, .. })
        ));
    }

    #[test]
    fn test_checksum_odd_length() {
        assert_eq!(checksum(&[0x01, 0x02, 0x03]), 0xFCFC);
        assert_eq!(checksum(&[]), 0xFFFF);
    }

    #[test]
    fn test_seq_wraps() {
        let mut packet = SrpPacket::parse(&SYN_REQUEST).unwrap().unwrap();
        packet.seq = u16::MAX;
        let reply = packet.syn_ack();
        assert_eq!(reply.seq, 0);
        assert_eq!(reply.ack, u16::MAX);
    }
}
