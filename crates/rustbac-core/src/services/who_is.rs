use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::primitives::{decode_unsigned, encode_ctx_unsigned};
use crate::encoding::reader::Reader;
use crate::encoding::tag::Tag;
use crate::encoding::writer::Writer;
use crate::{DecodeError, EncodeError};

pub const SERVICE_WHO_IS: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhoIsRequest {
    pub low_limit: Option<u32>,
    pub high_limit: Option<u32>,
}

impl WhoIsRequest {
    pub const fn global() -> Self {
        Self {
            low_limit: None,
            high_limit: None,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader {
            service_choice: SERVICE_WHO_IS,
        }
        .encode(w)?;

        if let Some(low) = self.low_limit {
            encode_ctx_unsigned(w, 0, low)?;
        }
        if let Some(high) = self.high_limit {
            encode_ctx_unsigned(w, 1, high)?;
        }
        Ok(())
    }

    /// Decodes the body of a WhoIs unconfirmed request (after the
    /// `UnconfirmedRequestHeader` has already been consumed by the caller).
    /// An empty body is the global WhoIs (no limits).
    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.is_empty() {
            return Ok(Self::global());
        }

        let low_limit = match Tag::decode(r)? {
            Tag::Context { tag_num: 0, len } => Some(decode_unsigned(r, len as usize)?),
            _ => return Err(DecodeError::InvalidTag),
        };

        let high_limit = if r.is_empty() {
            None
        } else {
            match Tag::decode(r)? {
                Tag::Context { tag_num: 1, len } => Some(decode_unsigned(r, len as usize)?),
                _ => return Err(DecodeError::InvalidTag),
            }
        };

        Ok(Self {
            low_limit,
            high_limit,
        })
    }
}
