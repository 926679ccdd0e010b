use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{encode_ctx_object_id, encode_ctx_unsigned},
    tag::Tag,
    writer::Writer,
};
use crate::types::{ObjectId, PropertyId};
use crate::EncodeError;

#[cfg(feature = "alloc")]
use crate::encoding::{primitives::decode_unsigned, reader::Reader};
#[cfg(feature = "alloc")]
use crate::services::value_codec::{
    decode_application_data_value_from_tag, encode_application_data_value,
    encode_property_access_error,
};
#[cfg(feature = "alloc")]
use crate::types::{DataValue, ErrorClass, ErrorCode};
#[cfg(feature = "alloc")]
use crate::DecodeError;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

pub const SERVICE_READ_PROPERTY_MULTIPLE: u8 = 0x0E;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyReference {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadAccessSpecification<'a> {
    pub object_id: ObjectId,
    pub properties: &'a [PropertyReference],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPropertyMultipleRequest<'a> {
    pub specs: &'a [ReadAccessSpecification<'a>],
    pub invoke_id: u8,
}

impl<'a> ReadPropertyMultipleRequest<'a> {
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
            service_choice: SERVICE_READ_PROPERTY_MULTIPLE,
        }
        .encode(w)?;

        for spec in self.specs {
            encode_ctx_object_id(w, 0, spec.object_id.raw())?;
            Tag::Opening { tag_num: 1 }.encode(w)?;
            for prop in spec.properties {
                encode_ctx_unsigned(w, 0, prop.property_id.to_u32())?;
                if let Some(idx) = prop.array_index {
                    encode_ctx_unsigned(w, 1, idx)?;
                }
            }
            Tag::Closing { tag_num: 1 }.encode(w)?;
        }

        Ok(())
    }
}

#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadAccessSpecificationOwned {
    pub object_id: ObjectId,
    pub properties: Vec<PropertyReference>,
}

#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropertyMultipleRequestOwned {
    pub specs: Vec<ReadAccessSpecificationOwned>,
    pub invoke_id: u8,
}

#[cfg(feature = "alloc")]
impl ReadPropertyMultipleRequestOwned {
    /// Decodes the body of a ReadPropertyMultiple confirmed request (after the
    /// `ConfirmedRequestHeader` has already been consumed by the caller).
    pub fn decode_after_header(r: &mut Reader<'_>, invoke_id: u8) -> Result<Self, DecodeError> {
        let mut specs = Vec::new();

        while !r.is_empty() {
            let object_id = match Tag::decode(r)? {
                Tag::Context { tag_num: 0, len } => {
                    ObjectId::from_raw(decode_unsigned(r, len as usize)?)
                }
                _ => return Err(DecodeError::InvalidTag),
            };

            match Tag::decode(r)? {
                Tag::Opening { tag_num: 1 } => {}
                _ => return Err(DecodeError::InvalidTag),
            }

            let mut properties = Vec::new();
            loop {
                let tag = Tag::decode(r)?;
                if tag == (Tag::Closing { tag_num: 1 }) {
                    break;
                }

                let property_id = match tag {
                    Tag::Context { tag_num: 0, len } => {
                        PropertyId::from_u32(decode_unsigned(r, len as usize)?)
                    }
                    _ => return Err(DecodeError::InvalidTag),
                };

                let array_index = if Tag::is_context_tag(r, 1) {
                    match Tag::decode(r)? {
                        Tag::Context { tag_num: 1, len } => Some(decode_unsigned(r, len as usize)?),
                        _ => return Err(DecodeError::InvalidTag),
                    }
                } else {
                    None
                };

                properties.push(PropertyReference {
                    property_id,
                    array_index,
                });
            }

            specs.push(ReadAccessSpecificationOwned {
                object_id,
                properties,
            });
        }

        Ok(Self { specs, invoke_id })
    }
}

#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResultElement<'a> {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: DataValue<'a>,
}

#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadAccessResult<'a> {
    pub object_id: ObjectId,
    pub results: Vec<ReadResultElement<'a>>,
}

#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropertyMultipleAck<'a> {
    pub results: Vec<ReadAccessResult<'a>>,
}

#[cfg(feature = "alloc")]
impl<'a> ReadPropertyMultipleAck<'a> {
    /// Encodes the ack body (after the caller has written the
    /// `ComplexAckHeader`). Property-access errors are written via
    /// `encode_property_access_error`, successful reads via
    /// `encode_application_data_value`.
    pub fn encode_after_header(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        for result in &self.results {
            encode_ctx_object_id(w, 0, result.object_id.raw())?;
            Tag::Opening { tag_num: 1 }.encode(w)?;

            for element in &result.results {
                encode_ctx_unsigned(w, 2, element.property_id.to_u32())?;
                if let Some(idx) = element.array_index {
                    encode_ctx_unsigned(w, 3, idx)?;
                }

                Tag::Opening { tag_num: 4 }.encode(w)?;
                match &element.value {
                    DataValue::Error {
                        error_class,
                        error_code,
                    } => encode_property_access_error(w, *error_class, *error_code)?,
                    other => encode_application_data_value(w, other)?,
                }
                Tag::Closing { tag_num: 4 }.encode(w)?;
            }

            Tag::Closing { tag_num: 1 }.encode(w)?;
        }

        Ok(())
    }

    pub fn decode_after_header(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let mut all_results = Vec::new();

        while !r.is_empty() {
            let object_id = match Tag::decode(r)? {
                Tag::Context { tag_num: 0, len } => {
                    ObjectId::from_raw(decode_unsigned(r, len as usize)?)
                }
                _ => return Err(DecodeError::InvalidTag),
            };

            match Tag::decode(r)? {
                Tag::Opening { tag_num: 1 } => {}
                _ => return Err(DecodeError::InvalidTag),
            }

            let mut elements = Vec::new();
            loop {
                let tag = Tag::decode(r)?;
                if tag == (Tag::Closing { tag_num: 1 }) {
                    break;
                }

                let property_id = match tag {
                    Tag::Context { tag_num: 2, len } => {
                        PropertyId::from_u32(decode_unsigned(r, len as usize)?)
                    }
                    _ => return Err(DecodeError::InvalidTag),
                };

                let next = Tag::decode(r)?;
                let (array_index, read_result_open) = match next {
                    Tag::Context { tag_num: 3, len } => {
                        let idx = decode_unsigned(r, len as usize)?;
                        (Some(idx), Tag::decode(r)?)
                    }
                    other => (None, other),
                };

                if read_result_open != (Tag::Opening { tag_num: 4 }) {
                    return Err(DecodeError::InvalidTag);
                }

                let value_or_error = Tag::decode(r)?;
                let value = if value_or_error == (Tag::Opening { tag_num: 5 }) {
                    // Property access error block [5] errorClass [0] errorCode [1] [5].
                    let error_class = match Tag::decode(r)? {
                        Tag::Context { tag_num: 0, len } => {
                            ErrorClass::from_u32(decode_unsigned(r, len as usize)?)
                                .ok_or(DecodeError::InvalidValue)?
                        }
                        _ => return Err(DecodeError::InvalidTag),
                    };
                    let error_code = match Tag::decode(r)? {
                        Tag::Context { tag_num: 1, len } => {
                            ErrorCode::from_u32(decode_unsigned(r, len as usize)?)
                                .ok_or(DecodeError::InvalidValue)?
                        }
                        _ => return Err(DecodeError::InvalidTag),
                    };
                    match Tag::decode(r)? {
                        Tag::Closing { tag_num: 5 } => {}
                        _ => return Err(DecodeError::InvalidTag),
                    }
                    DataValue::Error {
                        error_class,
                        error_code,
                    }
                } else {
                    decode_application_data_value_from_tag(r, value_or_error)?
                };

                match Tag::decode(r)? {
                    Tag::Closing { tag_num: 4 } => {}
                    _ => return Err(DecodeError::InvalidTag),
                }

                elements.push(ReadResultElement {
                    property_id,
                    array_index,
                    value,
                });
            }

            all_results.push(ReadAccessResult {
                object_id,
                results: elements,
            });
        }

        Ok(Self {
            results: all_results,
        })
    }
}
