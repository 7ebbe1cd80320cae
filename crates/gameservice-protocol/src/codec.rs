//! Stream framing for `tokio_util::codec::Framed`.
//!
//! The codec only splits the byte stream into frames. Payloads stay
//! encrypted; turning a [`RawFrame`] into a [`Message`](crate::Message)
//! needs the session's keys.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::header::{FrameHeader, HEADER_SIZE, MAX_PACKET_SIZE};
use crate::ProtocolError;

/// A frame as read from or written to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub header: FrameHeader,
    pub payload: Bytes,
}

/// Length-prefixed frame codec.
///
/// Decoding never yields a partial frame: it waits for the full declared
/// size and fails hard on a size outside `HEADER_SIZE..=MAX_PACKET_SIZE`.
/// Encoding rewrites the header's size from the payload length.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec;

impl Decoder for FrameCodec {
    type Item = RawFrame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<RawFrame>, ProtocolError> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(&src[..HEADER_SIZE]);
        let header = FrameHeader::decode(&raw);

        let size = header.size as usize;
        if size > MAX_PACKET_SIZE {
            return Err(ProtocolError::FrameTooLarge { size });
        }
        if size < HEADER_SIZE {
            return Err(ProtocolError::FrameTooSmall { size });
        }

        if src.len() < size {
            src.reserve(size - src.len());
            return Ok(None);
        }

        let mut frame = src.split_to(size);
        frame.advance(HEADER_SIZE);
        Ok(Some(RawFrame {
            header,
            payload: frame.freeze(),
        }))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<RawFrame>, ProtocolError> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None if buf.is_empty() => Ok(None),
            None => Err(ProtocolError::Truncated {
                remaining: buf.len(),
            }),
        }
    }
}

impl Encoder<RawFrame> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, frame: RawFrame, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let size = HEADER_SIZE + frame.payload.len();
        if size > MAX_PACKET_SIZE {
            return Err(ProtocolError::FrameTooLarge { size });
        }

        let mut header = frame.header;
        header.size = size as u32;

        dst.reserve(size);
        dst.extend_from_slice(&header.encode());
        dst.extend_from_slice(&frame.payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Property;

    fn header(size: u32) -> FrameHeader {
        FrameHeader {
            size,
            property: Property::Game,
            priority: false,
            msg_type: 58,
            sender: 1,
            receiver: 3,
        }
    }

    #[test]
    fn test_waits_for_header() {
        let mut buf = BytesMut::from(&[0u8, 0, 9][..]);
        assert!(FrameCodec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_waits_for_full_payload() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&header(10).encode());
        buf.extend_from_slice(b"ab");
        assert!(FrameCodec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"cd");
        let frame = FrameCodec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(&frame.payload[..], b"abcd");
        assert_eq!(frame.header.msg_type, 58);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&header(7).encode());
        buf.extend_from_slice(b"x");
        buf.extend_from_slice(&header(6).encode());

        let first = FrameCodec.decode(&mut buf).unwrap().unwrap();
        let second = FrameCodec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(&first.payload[..], b"x");
        assert!(second.payload.is_empty());
    }

    #[test]
    fn test_oversized_frame_is_fatal() {
        let mut buf = BytesMut::from(&header(0x50001).encode()[..]);
        assert!(matches!(
            FrameCodec.decode(&mut buf),
            Err(ProtocolError::FrameTooLarge { size: 0x50001 })
        ));
    }

    #[test]
    fn test_undersized_frame_is_fatal() {
        let mut buf = BytesMut::from(&header(3).encode()[..]);
        assert!(matches!(
            FrameCodec.decode(&mut buf),
            Err(ProtocolError::FrameTooSmall { size: 3 })
        ));
    }

    #[test]
    fn test_eof_mid_frame_is_fatal() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&header(20).encode());
        buf.extend_from_slice(b"partial");
        assert!(matches!(
            FrameCodec.decode_eof(&mut buf),
            Err(ProtocolError::Truncated { remaining: 13 })
        ));
    }

    #[test]
    fn test_encode_sets_size() {
        let frame = RawFrame {
            header: header(0),
            payload: Bytes::from_static(b"hello"),
        };
        let mut dst = BytesMut::new();
        FrameCodec.encode(frame, &mut dst).unwrap();
        assert_eq!(&dst[..3], &[0, 0, 11]);
        assert_eq!(&dst[6..], b"hello");
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        let frame = RawFrame {
            header: header(0),
            payload: Bytes::from(vec![0u8; MAX_PACKET_SIZE]),
        };
        let mut dst = BytesMut::new();
        assert!(FrameCodec.encode(frame, &mut dst).is_err());
    }
}
