use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    reader::Reader,
    tag::{AppTag, Tag},
    writer::Writer,
};
use crate::types::{Date, Time};
use crate::{DecodeError, EncodeError};

pub const SERVICE_TIME_SYNCHRONIZATION: u8 = 0x06;
pub const SERVICE_UTC_TIME_SYNCHRONIZATION: u8 = 0x09;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSynchronizationRequest {
    pub date: Date,
    pub time: Time,
    pub utc: bool,
}

impl TimeSynchronizationRequest {
    pub const fn local(date: Date, time: Time) -> Self {
        Self {
            date,
            time,
            utc: false,
        }
    }

    pub const fn utc(date: Date, time: Time) -> Self {
        Self {
            date,
            time,
            utc: true,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let service_choice = if self.utc {
            SERVICE_UTC_TIME_SYNCHRONIZATION
        } else {
            SERVICE_TIME_SYNCHRONIZATION
        };
        UnconfirmedRequestHeader { service_choice }.encode(w)?;
        Tag::Application {
            tag: AppTag::Date,
            len: 4,
        }
        .encode(w)?;
        w.write_all(&[
            self.date.year_since_1900,
            self.date.month,
            self.date.day,
            self.date.weekday,
        ])?;
        Tag::Application {
            tag: AppTag::Time,
            len: 4,
        }
        .encode(w)?;
        w.write_all(&[
            self.time.hour,
            self.time.minute,
            self.time.second,
            self.time.hundredths,
        ])?;
        Ok(())
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let date = match Tag::decode(r)? {
            Tag::Application {
                tag: AppTag::Date,
                len: 4,
            } => {
                let bytes = r.read_exact(4)?;
                Date {
                    year_since_1900: bytes[0],
                    month: bytes[1],
                    day: bytes[2],
                    weekday: bytes[3],
                }
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        let time = match Tag::decode(r)? {
            Tag::Application {
                tag: AppTag::Time,
                len: 4,
            } => {
                let bytes = r.read_exact(4)?;
                Time {
                    hour: bytes[0],
                    minute: bytes[1],
                    second: bytes[2],
                    hundredths: bytes[3],
                }
            }
            _ => return Err(DecodeError::InvalidTag),
        };
        Ok(Self {
            date,
            time,
            utc: false,
        })
    }
}
