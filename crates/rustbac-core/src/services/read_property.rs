use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{decode_unsigned, encode_ctx_object_id, encode_ctx_unsigned},
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
use crate::services::value_codec::{decode_application_data_value, encode_application_data_value};
use crate::types::{DataValue, ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};

pub const SERVICE_READ_PROPERTY: u8 = 0x0C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub invoke_id: u8,
}

impl ReadPropertyRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader {
            segmented: false,
            more_follows: false,
            segmented_response_accepted: true,
            max_segments: 0,
            max_apdu: 5,
            invoke_id: self.invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice: SERVICE_READ_PROPERTY,
        }
        .encode(w)?;

        encode_ctx_object_id(w, 0, self.object_id.raw())?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 2, idx)?;
        }
        Ok(())
    }

    /// Decodes the body of a ReadProperty confirmed request (after the
    /// `ConfirmedRequestHeader` has already been consumed by the caller).
    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let object_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 0, len } => {
                ObjectId::from_raw(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };

        let property_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 1, len } => {
                PropertyId::from_u32(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };

        let array_index = if r.is_empty() {
            None
        } else if Tag::is_context_tag(r, 2) {
            match Tag::decode(r)? {
                Tag::Context { tag_num: 2, len } => Some(decode_unsigned(r, len as usize)?),
                _ => return Err(DecodeError::InvalidTag),
            }
        } else {
            None
        };

        Ok(Self {
            object_id,
            property_id,
            array_index,
            invoke_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropertyAck<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: DataValue<'a>,
}

impl<'a> ReadPropertyAck<'a> {
    /// Encodes the ack body (after the caller has written the
    /// `ComplexAckHeader`).
    pub fn encode_after_header(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id.raw())?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 2, idx)?;
        }
        Tag::Opening { tag_num: 3 }.encode(w)?;
        encode_application_data_value(w, &self.value)?;
        Tag::Closing { tag_num: 3 }.encode(w)
    }

    pub fn decode_after_header(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let object_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 0, len } => {
                ObjectId::from_raw(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };

        let property_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 1, len } => {
                PropertyId::from_u32(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };

        let next = Tag::decode(r)?;
        let (array_index, value_start_tag) = match next {
            Tag::Context { tag_num: 2, len } => {
                let idx = decode_unsigned(r, len as usize)?;
                (Some(idx), Tag::decode(r)?)
            }
            other => (None, other),
        };

        if value_start_tag != (Tag::Opening { tag_num: 3 }) {
            return Err(DecodeError::InvalidTag);
        }

        let value = decode_application_data_value(r)?;

        match Tag::decode(r)? {
            Tag::Closing { tag_num: 3 } => {}
            _ => return Err(DecodeError::InvalidTag),
        }

        Ok(Self {
            object_id,
            property_id,
            array_index,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadPropertyAck, ReadPropertyRequest};
    use crate::apdu::{ComplexAckHeader, ConfirmedRequestHeader};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{DataValue, ObjectId, ObjectType, PropertyId};

    #[test]
    fn request_roundtrips_through_decode_after_header() {
        let req = ReadPropertyRequest {
            object_id: ObjectId::new(ObjectType::AnalogInput, 5),
            property_id: PropertyId::PresentValue,
            array_index: Some(2),
            invoke_id: 11,
        };

        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let header = ConfirmedRequestHeader::decode(&mut r).unwrap();
        let decoded = ReadPropertyRequest::decode_after_header(&mut r, header.invoke_id).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn request_without_array_index_roundtrips() {
        let req = ReadPropertyRequest {
            object_id: ObjectId::new(ObjectType::Device, 1),
            property_id: PropertyId::ObjectName,
            array_index: None,
            invoke_id: 1,
        };

        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let header = ConfirmedRequestHeader::decode(&mut r).unwrap();
        let decoded = ReadPropertyRequest::decode_after_header(&mut r, header.invoke_id).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn ack_roundtrips_through_encode_after_header() {
        let ack = ReadPropertyAck {
            object_id: ObjectId::new(ObjectType::AnalogInput, 5),
            property_id: PropertyId::PresentValue,
            array_index: None,
            value: DataValue::Real(21.5),
        };

        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        ComplexAckHeader {
            segmented: false,
            more_follows: false,
            invoke_id: 11,
            sequence_number: None,
            proposed_window_size: None,
            service_choice: super::SERVICE_READ_PROPERTY,
        }
        .encode(&mut w)
        .unwrap();
        ack.encode_after_header(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        let _header = ComplexAckHeader::decode(&mut r).unwrap();
        let decoded = ReadPropertyAck::decode_after_header(&mut r).unwrap();
        assert_eq!(decoded, ack);
    }
}
