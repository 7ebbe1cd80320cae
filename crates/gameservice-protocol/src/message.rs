//! Decoded messages and the frame <-> message conversion.

use std::fmt;

use bytes::Bytes;

use crate::codec::RawFrame;
use crate::crypto::SymmetricKey;
use crate::header::{FrameHeader, HEADER_SIZE, MAX_PACKET_SIZE, Property};
use crate::types::{MessageType, RouterErrorCode, type_name};
use crate::value::{self, Value};
use crate::{ProtocolError, scramble};

/// A frame with its payload decrypted and decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub property: Property,
    pub priority: bool,
    pub msg_type: u8,
    pub sender: u8,
    pub receiver: u8,
    pub data: Vec<Value>,
}

impl Message {
    pub fn new(msg_type: MessageType, property: Property, data: Vec<Value>) -> Self {
        Self {
            property,
            priority: false,
            msg_type: msg_type.as_u8(),
            sender: 0,
            receiver: 0,
            data,
        }
    }

    /// Builds a reply addressed back to this message's sender. Property,
    /// priority and type are kept.
    pub fn reply(&self, data: Vec<Value>) -> Self {
        Self {
            property: self.property,
            priority: self.priority,
            msg_type: self.msg_type,
            sender: self.receiver,
            receiver: self.sender,
            data,
        }
    }

    /// `GSSUCCESS` reply, always scrambled.
    pub fn success(&self, data: Vec<Value>) -> Self {
        let mut reply = self.reply(data);
        reply.msg_type = MessageType::GsSuccess.as_u8();
        reply.property = Property::Gs;
        reply
    }

    /// `GSFAIL` reply: `[Binary([request type]), [String(code)]]`.
    pub fn failure(&self, code: RouterErrorCode) -> Self {
        let mut reply = self.reply(vec![
            Value::Binary(vec![self.msg_type]),
            Value::List(vec![Value::String(code.code().to_string())]),
        ]);
        reply.msg_type = MessageType::GsFail.as_u8();
        reply.property = Property::Gs;
        reply
    }

    /// Decrypts and decodes a frame. `key` is the session's inbound
    /// symmetric key, required only for `GS_ENCRYPT` frames.
    pub fn open(frame: &RawFrame, key: Option<&SymmetricKey>) -> Result<Self, ProtocolError> {
        let header = &frame.header;
        let data = match header.property {
            Property::Gs => value::decode(&scramble::decrypt(&frame.payload))?,
            Property::GsEncrypt => {
                let key = key.ok_or(ProtocolError::MissingKey)?;
                value::decode_padded(&key.decrypt(&frame.payload)?)?
            }
            Property::Game | Property::Reserved => value::decode(&frame.payload)?,
        };

        Ok(Self {
            property: header.property,
            priority: header.priority,
            msg_type: header.msg_type,
            sender: header.sender,
            receiver: header.receiver,
            data,
        })
    }

    /// Encodes and encrypts this message according to its own property.
    pub fn seal(&self, key: Option<&SymmetricKey>) -> Result<RawFrame, ProtocolError> {
        let plain = value::encode(&self.data);
        let payload = match self.property {
            Property::Gs => scramble::encrypt(&plain),
            Property::GsEncrypt => key.ok_or(ProtocolError::MissingKey)?.encrypt(&plain),
            Property::Game | Property::Reserved => plain,
        };

        let size = HEADER_SIZE + payload.len();
        if size > MAX_PACKET_SIZE {
            return Err(ProtocolError::FrameTooLarge { size });
        }

        Ok(RawFrame {
            header: FrameHeader {
                size: size as u32,
                property: self.property,
                priority: self.priority,
                msg_type: self.msg_type,
                sender: self.sender,
                receiver: self.receiver,
            },
            payload: Bytes::from(payload),
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}->{} ",
            type_name(self.msg_type),
            self.property,
            self.sender,
            self.receiver
        )?;
        write!(f, "{}", Value::List(self.data.clone()))
    }
}
