use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_unsigned, encode_closing_tag, encode_ctx_object_id, encode_ctx_unsigned,
        encode_opening_tag,
    },
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
use crate::services::value_codec::{decode_application_data_value, encode_application_data_value};
use crate::types::{DataValue, ObjectId, PropertyId};
use crate::{DecodeError, EncodeError};

pub const SERVICE_WRITE_PROPERTY: u8 = 0x0F;

#[derive(Debug, Clone, PartialEq)]
pub struct WritePropertyRequest<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub value: DataValue<'a>,
    pub array_index: Option<u32>,
    pub priority: Option<u8>,
    pub invoke_id: u8,
}

impl<'a> Default for WritePropertyRequest<'a> {
    fn default() -> Self {
        Self {
            object_id: ObjectId::new(crate::types::ObjectType::AnalogValue, 0),
            property_id: PropertyId::PresentValue,
            value: DataValue::Null,
            array_index: None,
            priority: None,
            invoke_id: 1,
        }
    }
}

impl<'a> WritePropertyRequest<'a> {
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
            service_choice: SERVICE_WRITE_PROPERTY,
        }
        .encode(w)?;

        encode_ctx_object_id(w, 0, self.object_id.raw())?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 2, idx)?;
        }

        encode_opening_tag(w, 3)?;
        encode_application_data_value(w, &self.value)?;
        encode_closing_tag(w, 3)?;

        if let Some(priority) = self.priority {
            encode_ctx_unsigned(w, 4, priority as u32)?;
        }
        Ok(())
    }

    /// Decodes the body of a WriteProperty confirmed request (after the
    /// `ConfirmedRequestHeader` has already been consumed by the caller).
    pub fn decode_after_header(r: &mut Reader<'a>, invoke_id: u8) -> Result<Self, DecodeError> {
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

        let array_index = if Tag::is_context_tag(r, 2) {
            match Tag::decode(r)? {
                Tag::Context { tag_num: 2, len } => Some(decode_unsigned(r, len as usize)?),
                _ => return Err(DecodeError::InvalidTag),
            }
        } else {
            None
        };

        match Tag::decode(r)? {
            Tag::Opening { tag_num: 3 } => {}
            _ => return Err(DecodeError::InvalidTag),
        }
        let value = decode_application_data_value(r)?;
        match Tag::decode(r)? {
            Tag::Closing { tag_num: 3 } => {}
            _ => return Err(DecodeError::InvalidTag),
        }

        let priority = if !r.is_empty() && Tag::is_context_tag(r, 4) {
            match Tag::decode(r)? {
                Tag::Context { tag_num: 4, len } => Some(decode_unsigned(r, len as usize)? as u8),
                _ => return Err(DecodeError::InvalidTag),
            }
        } else {
            None
        };

        Ok(Self {
            object_id,
            property_id,
            value,
            array_index,
            priority,
            invoke_id,
        })
    }
}
