//! The fixed 6-byte frame header.
//!
//! ```text
//!  byte 0..3   size (24-bit big-endian, header included)
//!  byte 3      pp?x xxxx   pp = property, ? = priority flag
//!  byte 4      message type
//!  byte 5      ssss rrrr   sender / receiver target ids
//! ```

use std::fmt;

/// Length of the frame header in bytes.
pub const HEADER_SIZE: usize = 6;

/// Largest frame (header included) the codec accepts.
pub const MAX_PACKET_SIZE: usize = 0x50000;

const PRIORITY_BIT: u8 = 0x20;

// ---------------------------------------------------------------------------
// Property: how the payload is encrypted
// ---------------------------------------------------------------------------

/// Encryption mode of a frame's payload.
///
/// Two bits on the wire, so all four values must round-trip even though
/// only three have a meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Scrambled with the fixed obfuscation cipher.
    Gs,
    /// Plain payload.
    Game,
    /// Encrypted with the session's symmetric key.
    GsEncrypt,
    /// Unassigned value 3. Treated as plain.
    Reserved,
}

impl Property {
    /// Maps the two property bits to a variant. Higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::Gs,
            1 => Self::Game,
            2 => Self::GsEncrypt,
            _ => Self::Reserved,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Gs => 0,
            Self::Game => 1,
            Self::GsEncrypt => 2,
            Self::Reserved => 3,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gs => "GS",
            Self::Game => "GAME",
            Self::GsEncrypt => "GS_ENCRYPT",
            Self::Reserved => "RESERVED",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// FrameHeader
// ---------------------------------------------------------------------------

/// Decoded frame header.
///
/// `sender` and `receiver` are 4-bit target ids; only the low nibble is
/// written on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub size: u32,
    pub property: Property,
    pub priority: bool,
    pub msg_type: u8,
    pub sender: u8,
    pub receiver: u8,
}

impl FrameHeader {
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            size: (u32::from(bytes[0]) << 16)
                | (u32::from(bytes[1]) << 8)
                | u32::from(bytes[2]),
            property: Property::from_bits(bytes[3] >> 6),
            priority: bytes[3] & PRIORITY_BIT != 0,
            msg_type: bytes[4],
            sender: bytes[5] >> 4,
            receiver: bytes[5] & 0x0F,
        }
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut flags = self.property.bits() << 6;
        if self.priority {
            flags |= PRIORITY_BIT;
        }

        [
            (self.size >> 16) as u8,
            (self.size >> 8) as u8,
            self.size as u8,
            flags,
            self.msg_type,
            ((self.sender & 0x0F) << 4) | (self.receiver & 0x0F),
        ]
    }

    /// Declared payload length (frame size minus the header).
    pub fn payload_len(&self) -> usize {
        (self.size as usize).saturating_sub(HEADER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_header() {
        // size 0x00010F, property GS_ENCRYPT, priority set, type 102,
        // sender 3, receiver 1
        let header = FrameHeader::decode(&[0x00, 0x01, 0x0F, 0xA0, 102, 0x31]);
        assert_eq!(header.size, 0x10F);
        assert_eq!(header.property, Property::GsEncrypt);
        assert!(header.priority);
        assert_eq!(header.msg_type, 102);
        assert_eq!(header.sender, 3);
        assert_eq!(header.receiver, 1);
        assert_eq!(header.payload_len(), 0x10F - HEADER_SIZE);
    }

    #[test]
    fn test_encode_matches_layout() {
        let header = FrameHeader {
            size: 0x123456,
            property: Property::Game,
            priority: false,
            msg_type: 219,
            sender: 0xA,
            receiver: 0x5,
        };
        assert_eq!(header.encode(), [0x12, 0x34, 0x56, 0x40, 219, 0xA5]);
    }

    #[test]
    fn test_reserved_bits_are_dropped() {
        // Low 5 bits of byte 3 carry nothing.
        let header = FrameHeader::decode(&[0, 0, 6, 0x1F, 1, 0]);
        assert_eq!(header.property, Property::Gs);
        assert!(!header.priority);
        assert_eq!(header.encode()[3], 0);
    }

    #[test]
    fn test_property_bits_roundtrip() {
        for bits in 0..4u8 {
            assert_eq!(Property::from_bits(bits).bits(), bits);
        }
    }

    #[test]
    fn test_payload_len_saturates() {
        let header = FrameHeader::decode(&[0, 0, 2, 0, 0, 0]);
        assert_eq!(header.payload_len(), 0);
    }
}
