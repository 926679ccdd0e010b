//! Typed object/property storage for a simulated or real BACnet device.
//!
//! Generalises the flat `HashMap<ObjectId, HashMap<PropertyId, ClientDataValue>>`
//! the teacher's `SimulatedDevice` used into a list of [`StorageObject`]s, each
//! holding a list of [`StorageProperty`]s, with priority-array write semantics
//! and an XML persistence format.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use rustbac_client::ClientDataValue;
use rustbac_core::services::read_property_multiple::PropertyReference;
use rustbac_core::types::{ErrorClass, ErrorCode, ObjectId, ObjectType, PropertyId};

use crate::error::{PersistError, StorageError};

/// Device-instance value meaning "this device, whatever its instance is" —
/// the 22-bit instance field's maximum value.
pub const WILDCARD_DEVICE_INSTANCE: u32 = 0x3F_FFFF;

/// Array-index value meaning "the whole property", distinct from omitting
/// the index (which also means "the whole property" for non-array reads).
pub const ARRAY_INDEX_ALL: u32 = u32::MAX;

/// A single property of a [`StorageObject`].
///
/// `values` is always a list, even for scalar properties (a one-element
/// list) — this is what lets `write_property` replace the whole property
/// uniformly and lets `array_index` addressing fall out of plain indexing.
#[derive(Debug, Clone)]
pub struct StorageProperty {
    pub id: PropertyId,
    pub values: Vec<ClientDataValue>,
}

/// A single object (and its properties) held by [`DeviceStorage`].
#[derive(Debug, Clone)]
pub struct StorageObject {
    pub id: ObjectId,
    pub properties: Vec<StorageProperty>,
}

impl StorageObject {
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            properties: Vec::new(),
        }
    }

    pub fn find_property(&self, id: PropertyId) -> Option<&StorageProperty> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn find_property_mut(&mut self, id: PropertyId) -> Option<&mut StorageProperty> {
        self.properties.iter_mut().find(|p| p.id == id)
    }

    pub fn set_property(&mut self, id: PropertyId, values: Vec<ClientDataValue>) {
        match self.find_property_mut(id) {
            Some(prop) => prop.values = values,
            None => self.properties.push(StorageProperty { id, values }),
        }
    }
}

/// A single result element of [`DeviceStorage::read_property_multiple`] or
/// [`DeviceStorage::read_property_all`] — a successful read carries its
/// value directly, a failed one carries a [`ClientDataValue::Error`].
#[derive(Debug, Clone)]
pub struct PropertyValue {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: ClientDataValue,
}

/// Maps a storage failure to the (error-class, error-code) pair a handler
/// writes onto the wire, per the read/write property error taxonomy.
pub fn storage_error_to_access_error(err: StorageError) -> (ErrorClass, ErrorCode) {
    match err {
        StorageError::UnknownObject => (ErrorClass::Object, ErrorCode::UnknownObject),
        StorageError::NotExist => (ErrorClass::Property, ErrorCode::UnknownProperty),
        StorageError::WriteAccessDenied => (ErrorClass::Property, ErrorCode::WriteAccessDenied),
        StorageError::NotForMe => (ErrorClass::Object, ErrorCode::Other),
        StorageError::GenericError => (ErrorClass::Device, ErrorCode::Other),
    }
}

type ReadHook = dyn Fn(ObjectId, PropertyId, Option<u32>) -> Option<ClientDataValue> + Send + Sync;
type WriteHook =
    dyn Fn(ObjectId, PropertyId, Option<u32>, &[ClientDataValue]) -> Option<Result<(), StorageError>>
        + Send
        + Sync;
type ChangeListener =
    dyn Fn(ObjectId, PropertyId, Option<u32>, &[ClientDataValue]) + Send + Sync;

/// The device's object/property database.
///
/// All access serialises on a single mutex, per the concurrency model's
/// "single mutex; all read/write/load/save serialise" policy for device
/// storage.
pub struct DeviceStorage {
    objects: Mutex<Vec<StorageObject>>,
    read_hook: Option<Arc<ReadHook>>,
    write_hook: Option<Arc<WriteHook>>,
    on_change: Option<Arc<ChangeListener>>,
}

impl std::fmt::Debug for DeviceStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStorage")
            .field("objects", &self.objects.lock().expect("poisoned"))
            .finish()
    }
}

impl Default for DeviceStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            read_hook: None,
            write_hook: None,
            on_change: None,
        }
    }

    /// Installs a hook consulted before every `read_property`; a `Some`
    /// return short-circuits the storage lookup entirely (useful for
    /// properties computed at read time, e.g. a live sensor value).
    pub fn with_read_hook(
        mut self,
        hook: impl Fn(ObjectId, PropertyId, Option<u32>) -> Option<ClientDataValue>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.read_hook = Some(Arc::new(hook));
        self
    }

    /// Installs a hook consulted before every `write_property`; a `Some`
    /// return preempts the normal storage write and becomes the result.
    pub fn with_write_hook(
        mut self,
        hook: impl Fn(ObjectId, PropertyId, Option<u32>, &[ClientDataValue]) -> Option<Result<(), StorageError>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.write_hook = Some(Arc::new(hook));
        self
    }

    /// Installs a ChangeOfValue listener, fired synchronously from inside
    /// the storage mutex on every successful `write_property` or
    /// `write_commandable_property`. Listeners must not call back into
    /// storage.
    pub fn with_change_listener(
        mut self,
        listener: impl Fn(ObjectId, PropertyId, Option<u32>, &[ClientDataValue]) + Send + Sync + 'static,
    ) -> Self {
        self.on_change = Some(Arc::new(listener));
        self
    }

    pub fn add_object(&self, object: StorageObject) {
        self.objects.lock().expect("poisoned").push(object);
    }

    /// Rewrites every `OBJECT_DEVICE` object's instance to `device_id`.
    pub fn rewrite_device_instance(&self, device_id: u32) {
        for object in self.objects.lock().expect("poisoned").iter_mut() {
            if object.id.object_type() == ObjectType::Device {
                object.id = ObjectId::new(ObjectType::Device, device_id);
                if let Some(prop) = object.find_property_mut(PropertyId::ObjectIdentifier) {
                    prop.values = vec![ClientDataValue::ObjectId(object.id)];
                }
            }
        }
    }

    fn normalize(&self, mut object_id: ObjectId) -> ObjectId {
        if object_id.object_type() == ObjectType::Device
            && object_id.instance() == WILDCARD_DEVICE_INSTANCE
        {
            if let Some(device) = self
                .objects
                .lock()
                .expect("poisoned")
                .iter()
                .find(|o| o.id.object_type() == ObjectType::Device)
            {
                object_id = device.id;
            }
        }
        object_id
    }

    pub fn find_object(&self, object_id: ObjectId) -> Option<StorageObject> {
        let object_id = self.normalize(object_id);
        self.objects
            .lock()
            .expect("poisoned")
            .iter()
            .find(|o| o.id == object_id)
            .cloned()
    }

    pub fn read_property(
        &self,
        object_id: ObjectId,
        property_id: PropertyId,
        array_index: Option<u32>,
    ) -> Result<ClientDataValue, StorageError> {
        let object_id = self.normalize(object_id);

        if let Some(hook) = &self.read_hook {
            if let Some(value) = hook(object_id, property_id, array_index) {
                return Ok(value);
            }
        }

        let objects = self.objects.lock().expect("poisoned");
        let object = objects
            .iter()
            .find(|o| o.id == object_id)
            .ok_or(StorageError::UnknownObject)?;
        let property = object
            .find_property(property_id)
            .ok_or(StorageError::NotExist)?;

        match array_index {
            Some(0) => Ok(ClientDataValue::Unsigned(property.values.len() as u32)),
            Some(ARRAY_INDEX_ALL) | None => Ok(values_to_client(&property.values)),
            Some(index) => property
                .values
                .get(index as usize - 1)
                .cloned()
                .ok_or(StorageError::NotExist),
        }
    }

    pub fn write_property(
        &self,
        object_id: ObjectId,
        property_id: PropertyId,
        array_index: Option<u32>,
        values: Vec<ClientDataValue>,
        add_if_missing: bool,
    ) -> Result<(), StorageError> {
        let object_id = self.normalize(object_id);

        if let Some(hook) = &self.write_hook {
            if let Some(result) = hook(object_id, property_id, array_index, &values) {
                return result;
            }
        }

        let mut objects = self.objects.lock().expect("poisoned");
        let object_exists = objects.iter().any(|o| o.id == object_id);
        if !object_exists {
            if !add_if_missing {
                return Err(StorageError::NotExist);
            }
            objects.push(StorageObject::new(object_id));
        }
        let object = objects.iter_mut().find(|o| o.id == object_id).expect("just inserted");

        let property_exists = object.find_property(property_id).is_some();
        if !property_exists && !add_if_missing {
            return Err(StorageError::NotExist);
        }

        object.set_property(property_id, values.clone());

        if let Some(listener) = &self.on_change {
            listener(object_id, property_id, array_index, &values);
        }

        Ok(())
    }

    /// Implements the 16-slot BACnet commandable-property priority array.
    /// Only meaningful for `PROP_PRESENT_VALUE`; any other property returns
    /// [`StorageError::NotForMe`] so callers fall back to `write_property`.
    pub fn write_commandable_property(
        &self,
        object_id: ObjectId,
        property_id: PropertyId,
        value: ClientDataValue,
        priority: u8,
    ) -> Result<(), StorageError> {
        if property_id != PropertyId::PresentValue {
            return Err(StorageError::NotForMe);
        }
        if !(1..=16).contains(&priority) {
            return Err(StorageError::GenericError);
        }

        let object_id = self.normalize(object_id);
        let mut objects = self.objects.lock().expect("poisoned");
        let object = objects
            .iter_mut()
            .find(|o| o.id == object_id)
            .ok_or(StorageError::UnknownObject)?;

        let out_of_service = object
            .find_property(PropertyId::OutOfService)
            .and_then(|p| p.values.first())
            .map(|v| matches!(v, ClientDataValue::Boolean(true)))
            .unwrap_or(false);

        if out_of_service {
            object.set_property(PropertyId::PresentValue, vec![value.clone()]);
            if let Some(listener) = &self.on_change {
                listener(object_id, property_id, None, std::slice::from_ref(&value));
            }
            return Ok(());
        }

        if priority == 6 {
            return Err(StorageError::WriteAccessDenied);
        }

        let mut priority_array = object
            .find_property(PropertyId::PriorityArray)
            .map(|p| p.values.clone())
            .unwrap_or_default();
        priority_array.resize(16, ClientDataValue::Null);
        priority_array[priority as usize - 1] = value;
        object.set_property(PropertyId::PriorityArray, priority_array.clone());

        let relinquish_default = object
            .find_property(PropertyId::RelinquishDefault)
            .and_then(|p| p.values.first())
            .cloned()
            .unwrap_or(ClientDataValue::Null);

        let present_value = priority_array
            .iter()
            .find(|v| !matches!(v, ClientDataValue::Null))
            .cloned()
            .unwrap_or(relinquish_default);

        object.set_property(PropertyId::PresentValue, vec![present_value.clone()]);

        if let Some(listener) = &self.on_change {
            listener(
                object_id,
                PropertyId::PresentValue,
                None,
                std::slice::from_ref(&present_value),
            );
        }

        Ok(())
    }

    pub fn read_property_multiple(
        &self,
        object_id: ObjectId,
        refs: &[PropertyReference],
    ) -> Vec<PropertyValue> {
        refs.iter()
            .map(|r| self.read_one(object_id, r.property_id, r.array_index))
            .collect()
    }

    /// Shortcut for the `PROP_ALL` pseudo-property: every property of the
    /// object, in storage order.
    pub fn read_property_all(&self, object_id: ObjectId) -> Result<Vec<PropertyValue>, StorageError> {
        let object_id = self.normalize(object_id);
        let property_ids: Vec<PropertyId> = {
            let objects = self.objects.lock().expect("poisoned");
            let object = objects
                .iter()
                .find(|o| o.id == object_id)
                .ok_or(StorageError::UnknownObject)?;
            object.properties.iter().map(|p| p.id).collect()
        };

        Ok(property_ids
            .into_iter()
            .map(|id| self.read_one(object_id, id, None))
            .collect())
    }

    fn read_one(
        &self,
        object_id: ObjectId,
        property_id: PropertyId,
        array_index: Option<u32>,
    ) -> PropertyValue {
        match self.read_property(object_id, property_id, array_index) {
            Ok(value) => PropertyValue {
                property_id,
                array_index,
                value,
            },
            Err(err) => {
                let (error_class, error_code) = storage_error_to_access_error(err);
                PropertyValue {
                    property_id,
                    array_index,
                    value: ClientDataValue::Error {
                        error_class,
                        error_code,
                    },
                }
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let objects = self.objects.lock().expect("poisoned");
        let device_id = objects
            .iter()
            .find(|o| o.id.object_type() == ObjectType::Device)
            .map(|o| o.id.instance())
            .unwrap_or(0);

        let mut writer = Writer::new(Vec::new());
        let mut device_start = BytesStart::new("Device");
        device_start.push_attribute(("DeviceId", device_id.to_string().as_str()));
        writer.write_event(Event::Start(device_start))?;

        writer.write_event(Event::Start(BytesStart::new("Objects")))?;
        for object in objects.iter() {
            let mut object_start = BytesStart::new("Object");
            object_start.push_attribute(("Type", object_type_name(object.id.object_type()).as_str()));
            object_start.push_attribute(("Instance", object.id.instance().to_string().as_str()));
            writer.write_event(Event::Start(object_start))?;

            writer.write_event(Event::Start(BytesStart::new("Properties")))?;
            for property in &object.properties {
                let mut property_start = BytesStart::new("Property");
                property_start.push_attribute(("Id", property_id_name(property.id).as_str()));
                writer.write_event(Event::Start(property_start))?;

                let tag = property
                    .values
                    .first()
                    .map(value_tag_name)
                    .unwrap_or("Null");
                writer.write_event(Event::Start(BytesStart::new("Tag")))?;
                writer.write_event(Event::Text(BytesText::new(tag)))?;
                writer.write_event(Event::End(quick_xml::events::BytesEnd::new("Tag")))?;

                for value in &property.values {
                    let text = value_to_text(value)?;
                    writer.write_event(Event::Start(BytesStart::new("Value")))?;
                    writer.write_event(Event::Text(BytesText::new(&text)))?;
                    writer.write_event(Event::End(quick_xml::events::BytesEnd::new("Value")))?;
                }

                writer.write_event(Event::End(quick_xml::events::BytesEnd::new("Property")))?;
            }
            writer.write_event(Event::End(quick_xml::events::BytesEnd::new("Properties")))?;
            writer.write_event(Event::End(quick_xml::events::BytesEnd::new("Object")))?;
        }
        writer.write_event(Event::End(quick_xml::events::BytesEnd::new("Objects")))?;
        writer.write_event(Event::End(quick_xml::events::BytesEnd::new("Device")))?;

        std::fs::write(path, writer.into_inner())?;
        Ok(())
    }

    /// Loads storage from `path`; if no file exists there, falls back to
    /// the compiled-in embedded resource table keyed by file name.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let storage = Self::new();
        storage.load_into(path)?;
        Ok(storage)
    }

    /// Replaces this storage's object list with the contents of `path` (or,
    /// failing that, an embedded resource named after it), preserving any
    /// hooks and change listeners already installed.
    pub fn load_into(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| PersistError::Malformed("non-UTF8 storage path".into()))?;
                embedded_resource(name)
                    .ok_or_else(|| PersistError::NotFound(name.to_string()))?
                    .to_string()
            }
        };
        let objects = parse_xml_objects(&content)?;
        *self.objects.lock().expect("poisoned") = objects;
        Ok(())
    }
}

fn parse_xml_objects(content: &str) -> Result<Vec<StorageObject>, PersistError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text = true;

    let mut objects = Vec::new();
    let mut current_object: Option<StorageObject> = None;
    let mut current_property: Option<PropertyId> = None;
    let mut current_tag: &'static str = "Null";

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"Object" => {
                let mut object_type = ObjectType::AnalogInput;
                let mut instance = 0u32;
                for attr in e.attributes() {
                    let attr = attr?;
                    let value = attr.unescape_value()?.into_owned();
                    match attr.key.as_ref() {
                        b"Type" => {
                            object_type = parse_object_type_name(&value).ok_or_else(|| {
                                PersistError::Malformed(format!("unknown object type {value:?}"))
                            })?;
                        }
                        b"Instance" => {
                            instance = value.parse().map_err(|_| {
                                PersistError::Malformed(format!("bad instance {value:?}"))
                            })?;
                        }
                        _ => {}
                    }
                }
                current_object = Some(StorageObject::new(ObjectId::new(object_type, instance)));
            }
            Event::End(e) if e.name().as_ref() == b"Object" => {
                if let Some(object) = current_object.take() {
                    objects.push(object);
                }
            }
            Event::Start(e) if e.name().as_ref() == b"Property" => {
                let mut id = PropertyId::Proprietary(0);
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"Id" {
                        let value = attr.unescape_value()?.into_owned();
                        id = parse_property_id_name(&value).ok_or_else(|| {
                            PersistError::Malformed(format!("unknown property id {value:?}"))
                        })?;
                    }
                }
                current_property = Some(id);
                if let Some(object) = current_object.as_mut() {
                    object.properties.push(StorageProperty {
                        id,
                        values: Vec::new(),
                    });
                }
            }
            Event::Start(e) if e.name().as_ref() == b"Tag" => {
                let text = reader.read_text(e.name())?;
                current_tag = tag_name_static(&text);
            }
            Event::Start(e) if e.name().as_ref() == b"Value" => {
                let text = reader.read_text(e.name())?;
                let value = text_to_value(current_tag, &text)?;
                if let (Some(object), Some(id)) = (current_object.as_mut(), current_property) {
                    if let Some(prop) = object.find_property_mut(id) {
                        prop.values.push(value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(objects)
}

fn values_to_client(values: &[ClientDataValue]) -> ClientDataValue {
    match values {
        [single] => single.clone(),
        many => ClientDataValue::Constructed {
            tag_num: 0,
            values: many.to_vec(),
        },
    }
}

/// Compile-time-registered fallback storage documents, consulted by `load`
/// only after a filesystem miss. Empty until a deployment registers one via
/// `include_str!`.
const EMBEDDED_RESOURCES: &[(&str, &str)] = &[];

fn embedded_resource(name: &str) -> Option<&'static str> {
    EMBEDDED_RESOURCES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, content)| *content)
}

fn object_type_name(t: ObjectType) -> String {
    format!("{t:?}")
}

fn parse_object_type_name(s: &str) -> Option<ObjectType> {
    const NAMES: &[(&str, ObjectType)] = &[
        ("AnalogInput", ObjectType::AnalogInput),
        ("AnalogOutput", ObjectType::AnalogOutput),
        ("AnalogValue", ObjectType::AnalogValue),
        ("BinaryInput", ObjectType::BinaryInput),
        ("BinaryOutput", ObjectType::BinaryOutput),
        ("BinaryValue", ObjectType::BinaryValue),
        ("Calendar", ObjectType::Calendar),
        ("Command", ObjectType::Command),
        ("Device", ObjectType::Device),
        ("EventEnrollment", ObjectType::EventEnrollment),
        ("File", ObjectType::File),
        ("Group", ObjectType::Group),
        ("Loop", ObjectType::Loop),
        ("MultiStateInput", ObjectType::MultiStateInput),
        ("MultiStateOutput", ObjectType::MultiStateOutput),
        ("NotificationClass", ObjectType::NotificationClass),
        ("Program", ObjectType::Program),
        ("Schedule", ObjectType::Schedule),
        ("Averaging", ObjectType::Averaging),
        ("MultiStateValue", ObjectType::MultiStateValue),
        ("TrendLog", ObjectType::TrendLog),
        ("LifeSafetyPoint", ObjectType::LifeSafetyPoint),
        ("LifeSafetyZone", ObjectType::LifeSafetyZone),
        ("Accumulator", ObjectType::Accumulator),
        ("PulseConverter", ObjectType::PulseConverter),
        ("EventLog", ObjectType::EventLog),
        ("GlobalGroup", ObjectType::GlobalGroup),
        ("TrendLogMultiple", ObjectType::TrendLogMultiple),
        ("StructuredView", ObjectType::StructuredView),
        ("AccessDoor", ObjectType::AccessDoor),
    ];
    if let Some((_, t)) = NAMES.iter().find(|(name, _)| *name == s) {
        return Some(*t);
    }
    let inner = s.strip_prefix("Proprietary(")?.strip_suffix(')')?;
    inner.parse().ok().map(ObjectType::Proprietary)
}

fn property_id_name(id: PropertyId) -> String {
    format!("{id:?}")
}

fn parse_property_id_name(s: &str) -> Option<PropertyId> {
    const NAMES: &[(&str, PropertyId)] = &[
        ("All", PropertyId::All),
        ("AckedTransitions", PropertyId::AckedTransitions),
        ("ApduTimeout", PropertyId::ApduTimeout),
        (
            "ApplicationSoftwareVersion",
            PropertyId::ApplicationSoftwareVersion,
        ),
        ("ArchiveFlag", PropertyId::ArchiveFlag),
        ("EventEnable", PropertyId::EventEnable),
        ("EventState", PropertyId::EventState),
        ("EventTimeStamps", PropertyId::EventTimeStamps),
        ("FileAccessMethod", PropertyId::FileAccessMethod),
        ("FileSize", PropertyId::FileSize),
        ("FirmwareRevision", PropertyId::FirmwareRevision),
        ("Location", PropertyId::Location),
        ("MaxApduLengthAccepted", PropertyId::MaxApduLengthAccepted),
        ("ModelName", PropertyId::ModelName),
        ("NotificationClass", PropertyId::NotificationClass),
        ("NotifyType", PropertyId::NotifyType),
        ("NumberOfApduRetries", PropertyId::NumberOfApduRetries),
        ("NumberOfStates", PropertyId::NumberOfStates),
        ("ObjectIdentifier", PropertyId::ObjectIdentifier),
        ("ObjectList", PropertyId::ObjectList),
        ("ObjectName", PropertyId::ObjectName),
        ("ObjectType", PropertyId::ObjectType),
        ("OutOfService", PropertyId::OutOfService),
        ("PresentValue", PropertyId::PresentValue),
        ("PriorityArray", PropertyId::PriorityArray),
        ("ProtocolRevision", PropertyId::ProtocolRevision),
        ("ProtocolVersion", PropertyId::ProtocolVersion),
        ("ReadOnly", PropertyId::ReadOnly),
        ("RecordCount", PropertyId::RecordCount),
        ("Reliability", PropertyId::Reliability),
        ("RelinquishDefault", PropertyId::RelinquishDefault),
        ("Description", PropertyId::Description),
        ("SegmentationSupported", PropertyId::SegmentationSupported),
        ("StateText", PropertyId::StateText),
        ("StatusFlags", PropertyId::StatusFlags),
        ("Units", PropertyId::Units),
        ("VendorIdentifier", PropertyId::VendorIdentifier),
        ("VendorName", PropertyId::VendorName),
    ];
    if let Some((_, id)) = NAMES.iter().find(|(name, _)| *name == s) {
        return Some(*id);
    }
    let inner = s.strip_prefix("Proprietary(")?.strip_suffix(')')?;
    inner.parse().ok().map(PropertyId::Proprietary)
}

fn value_tag_name(value: &ClientDataValue) -> &'static str {
    match value {
        ClientDataValue::Null => "Null",
        ClientDataValue::Boolean(_) => "Boolean",
        ClientDataValue::Unsigned(_) => "Unsigned",
        ClientDataValue::Signed(_) => "Signed",
        ClientDataValue::Real(_) => "Real",
        ClientDataValue::Double(_) => "Double",
        ClientDataValue::OctetString(_) => "OctetString",
        ClientDataValue::CharacterString(_) => "CharacterString",
        ClientDataValue::BitString { .. } => "BitString",
        ClientDataValue::Enumerated(_) => "Enumerated",
        ClientDataValue::Date(_) => "Date",
        ClientDataValue::Time(_) => "Time",
        ClientDataValue::ObjectId(_) => "ObjectId",
        ClientDataValue::Constructed { .. } => "Null",
        ClientDataValue::Error { .. } => "Null",
    }
}

fn tag_name_static(text: &str) -> &'static str {
    const TAGS: &[&str] = &[
        "Null",
        "Boolean",
        "Unsigned",
        "Signed",
        "Real",
        "Double",
        "OctetString",
        "CharacterString",
        "BitString",
        "Enumerated",
        "Date",
        "Time",
        "ObjectId",
    ];
    TAGS.iter().copied().find(|t| *t == text).unwrap_or("Null")
}

fn value_to_text(value: &ClientDataValue) -> Result<String, PersistError> {
    Ok(match value {
        ClientDataValue::Null => String::new(),
        ClientDataValue::Boolean(v) => v.to_string(),
        ClientDataValue::Unsigned(v) => v.to_string(),
        ClientDataValue::Signed(v) => v.to_string(),
        ClientDataValue::Real(v) => v.to_string(),
        ClientDataValue::Double(v) => v.to_string(),
        ClientDataValue::Enumerated(v) => v.to_string(),
        ClientDataValue::CharacterString(v) => v.clone(),
        ClientDataValue::OctetString(v) => hex_encode(v),
        ClientDataValue::BitString { unused_bits, data } => {
            format!("{unused_bits}:{}", hex_encode(data))
        }
        ClientDataValue::Date(d) => format!(
            "{}-{}-{}-{}",
            d.year_since_1900, d.month, d.day, d.weekday
        ),
        ClientDataValue::Time(t) => {
            format!("{}:{}:{}.{}", t.hour, t.minute, t.second, t.hundredths)
        }
        ClientDataValue::ObjectId(id) => id.raw().to_string(),
        ClientDataValue::Constructed { .. } | ClientDataValue::Error { .. } => {
            return Err(PersistError::Malformed(
                "cannot persist a constructed or error value".into(),
            ))
        }
    })
}

fn text_to_value(tag: &str, text: &str) -> Result<ClientDataValue, PersistError> {
    let bad = || PersistError::Malformed(format!("bad {tag} value {text:?}"));
    Ok(match tag {
        "Null" => ClientDataValue::Null,
        "Boolean" => ClientDataValue::Boolean(text.parse().map_err(|_| bad())?),
        "Unsigned" => ClientDataValue::Unsigned(text.parse().map_err(|_| bad())?),
        "Signed" => ClientDataValue::Signed(text.parse().map_err(|_| bad())?),
        "Real" => ClientDataValue::Real(text.parse().map_err(|_| bad())?),
        "Double" => ClientDataValue::Double(text.parse().map_err(|_| bad())?),
        "Enumerated" => ClientDataValue::Enumerated(text.parse().map_err(|_| bad())?),
        "CharacterString" => ClientDataValue::CharacterString(text.to_string()),
        "OctetString" => ClientDataValue::OctetString(hex_decode(text).ok_or_else(bad)?),
        "BitString" => {
            let (unused, data) = text.split_once(':').ok_or_else(bad)?;
            ClientDataValue::BitString {
                unused_bits: unused.parse().map_err(|_| bad())?,
                data: hex_decode(data).ok_or_else(bad)?,
            }
        }
        "Date" => {
            let mut parts = text.split('-');
            let mut next = || parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad);
            ClientDataValue::Date(rustbac_core::types::Date {
                year_since_1900: next()?,
                month: next()?,
                day: next()?,
                weekday: next()?,
            })
        }
        "Time" => {
            let mut hm = text.splitn(3, ':');
            let hour: u8 = hm.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
            let minute: u8 = hm.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
            let rest = hm.next().ok_or_else(bad)?;
            let (second, hundredths) = rest.split_once('.').ok_or_else(bad)?;
            ClientDataValue::Time(rustbac_core::types::Time {
                hour,
                minute,
                second: second.parse().map_err(|_| bad())?,
                hundredths: hundredths.parse().map_err(|_| bad())?,
            })
        }
        "ObjectId" => ClientDataValue::ObjectId(ObjectId::from_raw(
            text.parse().map_err(|_| bad())?,
        )),
        _ => ClientDataValue::Null,
    })
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

fn hex_decode(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}
