use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_ctx_character_string, decode_unsigned, encode_ctx_character_string,
        encode_ctx_object_id, encode_ctx_unsigned,
    },
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError};

pub const SERVICE_LIFE_SAFETY_OPERATION: u8 = 0x1B;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LifeSafetyOperationKind {
    None = 0,
    Silence = 1,
    SilenceAudible = 2,
    SilenceVisual = 3,
    Reset = 4,
    ResetAlarm = 5,
    ResetFault = 6,
    Unsilence = 7,
    UnsilenceAudible = 8,
    UnsilenceVisual = 9,
}

impl LifeSafetyOperationKind {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Silence),
            2 => Some(Self::SilenceAudible),
            3 => Some(Self::SilenceVisual),
            4 => Some(Self::Reset),
            5 => Some(Self::ResetAlarm),
            6 => Some(Self::ResetFault),
            7 => Some(Self::Unsilence),
            8 => Some(Self::UnsilenceAudible),
            9 => Some(Self::UnsilenceVisual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeSafetyOperationRequest<'a> {
    pub requesting_process_id: u32,
    pub requesting_source: &'a str,
    pub operation: LifeSafetyOperationKind,
    pub object_id: Option<ObjectId>,
    pub invoke_id: u8,
}

impl<'a> LifeSafetyOperationRequest<'a> {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader {
            segmented: false,
            more_follows: false,
            segmented_response_accepted: false,
            max_segments: 0,
            max_apdu: 5,
            invoke_id: self.invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice: SERVICE_LIFE_SAFETY_OPERATION,
        }
        .encode(w)?;

        encode_ctx_unsigned(w, 0, self.requesting_process_id)?;
        encode_ctx_character_string(w, 1, self.requesting_source)?;
        encode_ctx_unsigned(w, 2, self.operation.to_u32())?;
        if let Some(object_id) = self.object_id {
            encode_ctx_object_id(w, 3, object_id.raw())?;
        }
        Ok(())
    }

    pub fn decode_after_header(r: &mut Reader<'a>, invoke_id: u8) -> Result<Self, DecodeError> {
        let requesting_process_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 0, len } => decode_unsigned(r, len as usize)?,
            _ => return Err(DecodeError::InvalidTag),
        };
        let requesting_source = match Tag::decode(r)? {
            Tag::Context { tag_num: 1, len } => decode_ctx_character_string(r, len as usize)?,
            _ => return Err(DecodeError::InvalidTag),
        };
        let operation = match Tag::decode(r)? {
            Tag::Context { tag_num: 2, len } => {
                LifeSafetyOperationKind::from_u32(decode_unsigned(r, len as usize)?)
                    .ok_or(DecodeError::InvalidValue)?
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        let object_id = if !r.is_empty() && Tag::is_context_tag(r, 3) {
            match Tag::decode(r)? {
                Tag::Context { tag_num: 3, len } => {
                    if len != 4 {
                        return Err(DecodeError::InvalidLength);
                    }
                    Some(ObjectId::from_raw(decode_unsigned(r, len as usize)?))
                }
                _ => return Err(DecodeError::InvalidTag),
            }
        } else {
            None
        };
        Ok(Self {
            requesting_process_id,
            requesting_source,
            operation,
            object_id,
            invoke_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{LifeSafetyOperationKind, LifeSafetyOperationRequest, SERVICE_LIFE_SAFETY_OPERATION};
    use crate::apdu::ConfirmedRequestHeader;
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{ObjectId, ObjectType};

    #[test]
    fn encode_life_safety_operation_request() {
        let req = LifeSafetyOperationRequest {
            requesting_process_id: 1,
            requesting_source: "operator",
            operation: LifeSafetyOperationKind::Silence,
            object_id: Some(ObjectId::new(ObjectType::LifeSafetyZone, 1)),
            invoke_id: 4,
        };

        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let hdr = ConfirmedRequestHeader::decode(&mut r).unwrap();
        assert_eq!(hdr.service_choice, SERVICE_LIFE_SAFETY_OPERATION);
        assert_eq!(hdr.invoke_id, 4);
        assert!(!r.is_empty());
    }

    #[test]
    fn life_safety_operation_request_roundtrips_through_decode_after_header() {
        let req = LifeSafetyOperationRequest {
            requesting_process_id: 1,
            requesting_source: "operator",
            operation: LifeSafetyOperationKind::Silence,
            object_id: Some(ObjectId::new(ObjectType::LifeSafetyZone, 1)),
            invoke_id: 4,
        };

        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let hdr = ConfirmedRequestHeader::decode(&mut r).unwrap();
        let decoded = LifeSafetyOperationRequest::decode_after_header(&mut r, hdr.invoke_id).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn life_safety_operation_request_roundtrips_without_object_id() {
        let req = LifeSafetyOperationRequest {
            requesting_process_id: 1,
            requesting_source: "operator",
            operation: LifeSafetyOperationKind::Reset,
            object_id: None,
            invoke_id: 5,
        };

        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let hdr = ConfirmedRequestHeader::decode(&mut r).unwrap();
        let decoded = LifeSafetyOperationRequest::decode_after_header(&mut r, hdr.invoke_id).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn encode_life_safety_operation_without_object_id() {
        let req = LifeSafetyOperationRequest {
            requesting_process_id: 1,
            requesting_source: "operator",
            operation: LifeSafetyOperationKind::Reset,
            object_id: None,
            invoke_id: 5,
        };

        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let hdr = ConfirmedRequestHeader::decode(&mut r).unwrap();
        assert_eq!(hdr.service_choice, SERVICE_LIFE_SAFETY_OPERATION);
    }
}
