use rustbac_core::types::{Date, ErrorClass, ErrorCode, Time};

/// An owned, allocation-backed counterpart to [`rustbac_core::types::DataValue`]
/// used throughout the client façade, where borrowing from the decode buffer
/// across an await point isn't practical.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientDataValue {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    OctetString(Vec<u8>),
    CharacterString(String),
    BitString { unused_bits: u8, data: Vec<u8> },
    Enumerated(u32),
    Date(Date),
    Time(Time),
    ObjectId(rustbac_core::types::ObjectId),
    /// A constructed (complex) value, such as a weekly schedule entry or a
    /// calendar date-list element.
    Constructed {
        tag_num: u8,
        values: Vec<ClientDataValue>,
    },
    /// A property-access error surfaced by ReadPropertyMultiple.
    Error {
        error_class: ErrorClass,
        error_code: ErrorCode,
    },
}

impl<'a> From<rustbac_core::types::DataValue<'a>> for ClientDataValue {
    fn from(value: rustbac_core::types::DataValue<'a>) -> Self {
        use rustbac_core::types::DataValue;
        match value {
            DataValue::Null => ClientDataValue::Null,
            DataValue::Boolean(v) => ClientDataValue::Boolean(v),
            DataValue::Unsigned(v) => ClientDataValue::Unsigned(v),
            DataValue::Signed(v) => ClientDataValue::Signed(v),
            DataValue::Real(v) => ClientDataValue::Real(v),
            DataValue::Double(v) => ClientDataValue::Double(v),
            DataValue::OctetString(v) => ClientDataValue::OctetString(v.to_vec()),
            DataValue::CharacterString(v) => ClientDataValue::CharacterString(v.to_string()),
            DataValue::BitString(v) => ClientDataValue::BitString {
                unused_bits: v.unused_bits,
                data: v.data.to_vec(),
            },
            DataValue::Enumerated(v) => ClientDataValue::Enumerated(v),
            DataValue::Date(v) => ClientDataValue::Date(v),
            DataValue::Time(v) => ClientDataValue::Time(v),
            DataValue::ObjectId(v) => ClientDataValue::ObjectId(v),
            DataValue::Constructed { tag_num, values } => ClientDataValue::Constructed {
                tag_num,
                values: values.into_iter().map(ClientDataValue::from).collect(),
            },
            DataValue::Error {
                error_class,
                error_code,
            } => ClientDataValue::Error {
                error_class,
                error_code,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientDataValue;
    use rustbac_core::types::{DataValue, ErrorClass, ErrorCode};

    #[test]
    fn converts_constructed_value() {
        let src = DataValue::Constructed {
            tag_num: 1,
            values: vec![DataValue::Unsigned(7), DataValue::Boolean(true)],
        };
        let converted: ClientDataValue = src.into();
        assert_eq!(
            converted,
            ClientDataValue::Constructed {
                tag_num: 1,
                values: vec![
                    ClientDataValue::Unsigned(7),
                    ClientDataValue::Boolean(true),
                ],
            }
        );
    }

    #[test]
    fn converts_error_value() {
        let src = DataValue::Error {
            error_class: ErrorClass::Object,
            error_code: ErrorCode::UnknownObject,
        };
        let converted: ClientDataValue = src.into();
        assert_eq!(
            converted,
            ClientDataValue::Error {
                error_class: ErrorClass::Object,
                error_code: ErrorCode::UnknownObject,
            }
        );
    }
}
