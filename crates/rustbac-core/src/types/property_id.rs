/// BACnet property identifiers.
///
/// Common standard properties are named variants; vendor-specific or
/// unrecognised identifiers use [`Proprietary`](Self::Proprietary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    All,
    AckedTransitions,
    ApduTimeout,
    ApplicationSoftwareVersion,
    ArchiveFlag,
    EventEnable,
    EventState,
    EventTimeStamps,
    FileAccessMethod,
    FileSize,
    FirmwareRevision,
    Location,
    MaxApduLengthAccepted,
    ModelName,
    NotificationClass,
    NotifyType,
    NumberOfApduRetries,
    NumberOfStates,
    ObjectIdentifier,
    ObjectList,
    ObjectName,
    ObjectType,
    OutOfService,
    PresentValue,
    PriorityArray,
    ProtocolRevision,
    ProtocolVersion,
    ReadOnly,
    RecordCount,
    Reliability,
    RelinquishDefault,
    Description,
    SegmentationSupported,
    StateText,
    StatusFlags,
    Units,
    VendorIdentifier,
    VendorName,
    Proprietary(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::All => 8,
            Self::AckedTransitions => 0,
            Self::ApduTimeout => 11,
            Self::ApplicationSoftwareVersion => 12,
            Self::ArchiveFlag => 6,
            Self::EventEnable => 35,
            Self::EventState => 36,
            Self::EventTimeStamps => 130,
            Self::FileAccessMethod => 41,
            Self::FileSize => 42,
            Self::FirmwareRevision => 44,
            Self::Location => 58,
            Self::MaxApduLengthAccepted => 62,
            Self::ModelName => 70,
            Self::NotificationClass => 17,
            Self::NotifyType => 72,
            Self::NumberOfApduRetries => 73,
            Self::NumberOfStates => 74,
            Self::ObjectIdentifier => 75,
            Self::ObjectList => 76,
            Self::ObjectName => 77,
            Self::ObjectType => 79,
            Self::OutOfService => 81,
            Self::PresentValue => 85,
            Self::PriorityArray => 87,
            Self::ProtocolRevision => 139,
            Self::ProtocolVersion => 98,
            Self::ReadOnly => 99,
            Self::RecordCount => 141,
            Self::Reliability => 103,
            Self::RelinquishDefault => 104,
            Self::Description => 28,
            Self::SegmentationSupported => 107,
            Self::StateText => 110,
            Self::StatusFlags => 111,
            Self::Units => 117,
            Self::VendorIdentifier => 120,
            Self::VendorName => 121,
            Self::Proprietary(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            8 => Self::All,
            0 => Self::AckedTransitions,
            11 => Self::ApduTimeout,
            12 => Self::ApplicationSoftwareVersion,
            6 => Self::ArchiveFlag,
            35 => Self::EventEnable,
            36 => Self::EventState,
            130 => Self::EventTimeStamps,
            41 => Self::FileAccessMethod,
            42 => Self::FileSize,
            44 => Self::FirmwareRevision,
            58 => Self::Location,
            62 => Self::MaxApduLengthAccepted,
            70 => Self::ModelName,
            17 => Self::NotificationClass,
            72 => Self::NotifyType,
            73 => Self::NumberOfApduRetries,
            74 => Self::NumberOfStates,
            75 => Self::ObjectIdentifier,
            76 => Self::ObjectList,
            77 => Self::ObjectName,
            79 => Self::ObjectType,
            81 => Self::OutOfService,
            85 => Self::PresentValue,
            87 => Self::PriorityArray,
            139 => Self::ProtocolRevision,
            98 => Self::ProtocolVersion,
            99 => Self::ReadOnly,
            141 => Self::RecordCount,
            103 => Self::Reliability,
            104 => Self::RelinquishDefault,
            28 => Self::Description,
            107 => Self::SegmentationSupported,
            110 => Self::StateText,
            111 => Self::StatusFlags,
            117 => Self::Units,
            120 => Self::VendorIdentifier,
            121 => Self::VendorName,
            v => Self::Proprietary(v),
        }
    }
}
