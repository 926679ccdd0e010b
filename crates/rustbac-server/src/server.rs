//! Request-dispatch façade answering WhoIs/IAm/ReadProperty/ReadPropertyMultiple/
//! WriteProperty against a [`DeviceStorage`], built on top of a
//! [`BacnetClient`]'s broadcast dispatcher rather than a second socket.
//!
//! Generalises the teacher's `SimulatedDevice::run`/`handle_frame` loop: one
//! task reads frames off the client's dispatcher and answers them, instead of
//! owning the `DataLink` directly.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rustbac_client::{BacnetClient, ClientDataValue, DispatchedFrame};
use rustbac_core::apdu::{
    ApduType, BacnetError, ComplexAckHeader, ConfirmedRequestHeader, SegmentAck, SimpleAck,
    UnconfirmedRequestHeader,
};
use rustbac_core::encoding::{reader::Reader, writer::Writer};
use rustbac_core::npdu::Npdu;
use rustbac_core::services::i_am::{IAmRequest, SERVICE_I_AM};
use rustbac_core::services::read_property::{
    ReadPropertyAck, ReadPropertyRequest, SERVICE_READ_PROPERTY,
};
use rustbac_core::services::read_property_multiple::{
    ReadAccessResult, ReadPropertyMultipleAck, ReadPropertyMultipleRequestOwned,
    ReadResultElement, SERVICE_READ_PROPERTY_MULTIPLE,
};
use rustbac_core::services::who_is::{WhoIsRequest, SERVICE_WHO_IS};
use rustbac_core::services::write_property::{WritePropertyRequest, SERVICE_WRITE_PROPERTY};
use rustbac_core::types::{DataValue, ErrorClass, ErrorCode, ObjectId, ObjectType, PropertyId};
use rustbac_core::EncodeError;
use rustbac_datalink::{Address, DataLink, DataLinkAddress};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::ServerError;
use crate::storage::{storage_error_to_access_error, DeviceStorage, PropertyValue};

type WriteFilter = dyn Fn(ObjectId, PropertyId) -> bool + Send + Sync;

const MAX_SEGMENTED_REQUEST_BYTES: usize = 1024 * 1024;

/// In-progress reassembly of a segmented confirmed request, keyed by
/// `(source, invoke_id)` so concurrent segmented requests from different
/// peers (or different invoke-ids from the same peer) don't collide.
struct PendingRequest {
    service_choice: u8,
    last_sequence: u8,
    payload: Vec<u8>,
}

type ReassemblyState = Mutex<HashMap<(DataLinkAddress, u8), PendingRequest>>;

fn default_write_filter(object_id: ObjectId, property_id: PropertyId) -> bool {
    object_id.object_type() == ObjectType::AnalogValue && property_id == PropertyId::PresentValue
}

/// A device server façade: a [`BacnetClient`] used purely as a transport and
/// discovery dispatcher, a [`DeviceStorage`], and the instance this device
/// answers to.
pub struct BacnetServer<D: DataLink> {
    client: Arc<BacnetClient<D>>,
    storage: Arc<DeviceStorage>,
    device_id: u32,
    storage_file: Option<PathBuf>,
    write_filter: Arc<WriteFilter>,
}

impl<D: DataLink + 'static> BacnetServer<D> {
    pub fn new(client: BacnetClient<D>, storage: DeviceStorage, device_id: u32) -> Self {
        Self {
            client: Arc::new(client),
            storage: Arc::new(storage),
            device_id,
            storage_file: None,
            write_filter: Arc::new(default_write_filter),
        }
    }

    /// Loads (and, on close, saves) storage from this path, rather than
    /// relying on whatever was already populated into `storage`.
    pub fn with_storage_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_file = Some(path.into());
        self
    }

    /// Replaces the default `(ANALOG_VALUE:*, PRESENT_VALUE)` write
    /// restriction with a custom predicate.
    pub fn with_write_filter(
        mut self,
        filter: impl Fn(ObjectId, PropertyId) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.write_filter = Arc::new(filter);
        self
    }

    /// Loads storage, rewrites every `OBJECT_DEVICE`'s instance to
    /// `device_id`, broadcasts one IAm, and spawns the request-dispatch task.
    pub async fn open(self) -> Result<RunningServer<D>, ServerError> {
        if let Some(path) = &self.storage_file {
            self.storage.load_into(path)?;
        }
        self.storage.rewrite_device_instance(self.device_id);

        send_i_am(
            &self.client,
            &self.storage,
            self.device_id,
            DataLinkAddress::local_broadcast(DataLinkAddress::BACNET_IP_DEFAULT_PORT),
        )
        .await?;

        let client = self.client.clone();
        let storage = self.storage.clone();
        let device_id = self.device_id;
        let write_filter = self.write_filter.clone();
        let mut sub = client.subscribe_frames();
        let reassembly: Arc<ReassemblyState> = Arc::new(Mutex::new(HashMap::new()));

        let task = tokio::spawn(async move {
            loop {
                match sub.recv().await {
                    Ok(frame) => {
                        if let Err(err) = handle_frame(
                            &client,
                            &storage,
                            device_id,
                            &write_filter,
                            &reassembly,
                            frame,
                        )
                        .await
                        {
                            log::debug!("server: error handling frame: {err}");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });

        Ok(RunningServer {
            task,
            storage: self.storage,
            storage_file: self.storage_file,
        })
    }
}

/// A server whose dispatch task is running. Dropping this aborts the task
/// without saving; call [`Self::close`] to save storage first.
pub struct RunningServer<D: DataLink> {
    task: JoinHandle<()>,
    storage: Arc<DeviceStorage>,
    storage_file: Option<PathBuf>,
    _marker: std::marker::PhantomData<D>,
}

impl<D: DataLink> RunningServer<D> {
    /// Stops the dispatch task and, if a storage file is configured, saves
    /// storage to it.
    pub fn close(self) -> Result<(), ServerError> {
        self.task.abort();
        if let Some(path) = &self.storage_file {
            self.storage.save(path)?;
        }
        Ok(())
    }

    pub fn storage(&self) -> &Arc<DeviceStorage> {
        &self.storage
    }
}

impl<D: DataLink> Drop for RunningServer<D> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle_frame<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    storage: &DeviceStorage,
    device_id: u32,
    write_filter: &WriteFilter,
    reassembly: &ReassemblyState,
    frame: DispatchedFrame,
) -> Result<(), ServerError> {
    let mut r = Reader::new(&frame.bytes);
    let _npdu = Npdu::decode(&mut r)?;
    if r.is_empty() {
        return Ok(());
    }

    let first = r.peek_u8()?;
    match ApduType::from_u8(first >> 4) {
        Some(ApduType::UnconfirmedRequest) => {
            let header = UnconfirmedRequestHeader::decode(&mut r)?;
            match header.service_choice {
                SERVICE_WHO_IS => {
                    handle_who_is(client, storage, device_id, &mut r, frame.source).await?
                }
                SERVICE_I_AM => handle_i_am(client, &mut r, frame.source).await?,
                _ => {}
            }
        }
        Some(ApduType::ConfirmedRequest) => {
            let header = ConfirmedRequestHeader::decode(&mut r)?;
            if header.segmented {
                let segment_body = r.read_exact(r.remaining())?;
                let result = reassemble_segment(reassembly, frame.source, header, segment_body)?;

                send_segment_ack(
                    client,
                    frame.source,
                    header.invoke_id,
                    header.sequence_number.unwrap_or(0),
                    header.proposed_window_size.unwrap_or(1),
                )
                .await?;

                let Some((service_choice, body)) = result else {
                    // More segments still expected; nothing to dispatch yet.
                    return Ok(());
                };
                let mut body_r = Reader::new(&body);
                dispatch_confirmed_service(
                    client,
                    storage,
                    write_filter,
                    service_choice,
                    header.invoke_id,
                    frame.source,
                    &mut body_r,
                )
                .await?;
            } else {
                dispatch_confirmed_service(
                    client,
                    storage,
                    write_filter,
                    header.service_choice,
                    header.invoke_id,
                    frame.source,
                    &mut r,
                )
                .await?;
            }
        }
        _ => {}
    }

    Ok(())
}

/// Folds one segment of a segmented confirmed request into its in-progress
/// reassembly entry, returning the full body once the last segment (the one
/// with `more_follows == false`) has arrived.
fn reassemble_segment(
    reassembly: &ReassemblyState,
    source: DataLinkAddress,
    header: ConfirmedRequestHeader,
    segment_body: &[u8],
) -> Result<Option<(u8, Vec<u8>)>, ServerError> {
    let seq = header.sequence_number.unwrap_or(0);
    let mut map = reassembly.lock().expect("poisoned");
    let key = (source, header.invoke_id);

    if seq == 0 {
        map.insert(
            key,
            PendingRequest {
                service_choice: header.service_choice,
                last_sequence: 0,
                payload: segment_body.to_vec(),
            },
        );
    } else {
        let Some(pending) = map.get_mut(&key) else {
            // First segment never seen (or this invoke-id was already
            // completed/evicted); nothing to fold this segment into.
            return Ok(None);
        };
        if seq == pending.last_sequence {
            // Duplicate retransmission of the last segment we already have.
        } else if seq == pending.last_sequence.wrapping_add(1) {
            if pending.payload.len().saturating_add(segment_body.len())
                > MAX_SEGMENTED_REQUEST_BYTES
            {
                map.remove(&key);
                return Err(ServerError::RequestTooLarge);
            }
            pending.payload.extend_from_slice(segment_body);
            pending.last_sequence = seq;
        } else {
            // Out-of-order segment; drop the partial request and wait for a
            // fresh first segment.
            map.remove(&key);
            return Ok(None);
        }
    }

    if !header.more_follows {
        let pending = map.remove(&key).expect("just inserted or updated above");
        return Ok(Some((pending.service_choice, pending.payload)));
    }
    Ok(None)
}

async fn dispatch_confirmed_service<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    storage: &DeviceStorage,
    write_filter: &WriteFilter,
    service_choice: u8,
    invoke_id: u8,
    source: DataLinkAddress,
    r: &mut Reader<'_>,
) -> Result<(), ServerError> {
    match service_choice {
        SERVICE_READ_PROPERTY => handle_read_property(client, storage, r, invoke_id, source).await,
        SERVICE_READ_PROPERTY_MULTIPLE => {
            handle_read_property_multiple(client, storage, r, invoke_id, source).await
        }
        SERVICE_WRITE_PROPERTY => {
            handle_write_property(client, storage, write_filter, r, invoke_id, source).await
        }
        _ => Ok(()),
    }
}

async fn send_segment_ack<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    target: DataLinkAddress,
    invoke_id: u8,
    sequence_number: u8,
    window_size: u8,
) -> Result<(), ServerError> {
    let mut buf = [0u8; 16];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w)?;
    SegmentAck {
        negative_ack: false,
        sent_by_server: true,
        invoke_id,
        sequence_number,
        actual_window_size: window_size,
    }
    .encode(&mut w)?;
    client.send_raw(target, w.as_written()).await?;
    Ok(())
}

async fn handle_who_is<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    storage: &DeviceStorage,
    device_id: u32,
    r: &mut Reader<'_>,
    source: DataLinkAddress,
) -> Result<(), ServerError> {
    let who_is = WhoIsRequest::decode_after_header(r)?;
    let in_range = match (who_is.low_limit, who_is.high_limit) {
        (Some(low), Some(high)) => device_id >= low && device_id <= high,
        _ => true,
    };
    if in_range {
        send_i_am(client, storage, device_id, source).await?;
    }
    Ok(())
}

async fn handle_i_am<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    r: &mut Reader<'_>,
    source: DataLinkAddress,
) -> Result<(), ServerError> {
    let i_am = IAmRequest::decode_after_header(r)?;
    client.observe_i_am(Address::local(source), i_am.device_id).await;
    Ok(())
}

async fn send_i_am<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    storage: &DeviceStorage,
    device_id: u32,
    target: DataLinkAddress,
) -> Result<(), ServerError> {
    let vendor_id = match storage.read_property(
        ObjectId::new(ObjectType::Device, device_id),
        PropertyId::VendorIdentifier,
        None,
    ) {
        Ok(ClientDataValue::Unsigned(v)) => v,
        _ => 0,
    };

    let req = IAmRequest {
        device_id: ObjectId::new(ObjectType::Device, device_id),
        max_apdu: 1476,
        segmentation: 3, // no-segmentation
        vendor_id,
    };

    let mut buf = [0u8; 64];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w)?;
    req.encode(&mut w)?;
    client.send_raw(target, w.as_written()).await?;
    Ok(())
}

async fn handle_read_property<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    storage: &DeviceStorage,
    r: &mut Reader<'_>,
    invoke_id: u8,
    source: DataLinkAddress,
) -> Result<(), ServerError> {
    let req = ReadPropertyRequest::decode_after_header(r, invoke_id)?;
    match storage.read_property(req.object_id, req.property_id, req.array_index) {
        Ok(value) => {
            let ack = ReadPropertyAck {
                object_id: req.object_id,
                property_id: req.property_id,
                array_index: req.array_index,
                value: client_value_to_borrowed(&value),
            };
            let tx = encode_complex_ack(invoke_id, SERVICE_READ_PROPERTY, |w| {
                ack.encode_after_header(w)
            })?;
            client.send_raw(source, &tx).await?;
        }
        Err(err) => {
            let (class, code) = storage_error_to_access_error(err);
            send_error(client, source, invoke_id, SERVICE_READ_PROPERTY, class, code).await?;
        }
    }
    Ok(())
}

async fn handle_read_property_multiple<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    storage: &DeviceStorage,
    r: &mut Reader<'_>,
    invoke_id: u8,
    source: DataLinkAddress,
) -> Result<(), ServerError> {
    let req = ReadPropertyMultipleRequestOwned::decode_after_header(r, invoke_id)?;

    let mut collected: Vec<(ObjectId, Vec<PropertyValue>)> = Vec::with_capacity(req.specs.len());
    for spec in &req.specs {
        if storage.find_object(spec.object_id).is_none() {
            send_error(
                client,
                source,
                invoke_id,
                SERVICE_READ_PROPERTY_MULTIPLE,
                ErrorClass::Object,
                ErrorCode::UnknownObject,
            )
            .await?;
            return Ok(());
        }

        let property_values = if spec.properties.len() == 1 && spec.properties[0].property_id == PropertyId::All
        {
            storage.read_property_all(spec.object_id).unwrap_or_default()
        } else {
            storage.read_property_multiple(spec.object_id, &spec.properties)
        };
        collected.push((spec.object_id, property_values));
    }

    let ack = ReadPropertyMultipleAck {
        results: collected
            .iter()
            .map(|(object_id, values)| ReadAccessResult {
                object_id: *object_id,
                results: values
                    .iter()
                    .map(|pv| ReadResultElement {
                        property_id: pv.property_id,
                        array_index: pv.array_index,
                        value: client_value_to_borrowed(&pv.value),
                    })
                    .collect(),
            })
            .collect(),
    };

    let tx = encode_complex_ack(invoke_id, SERVICE_READ_PROPERTY_MULTIPLE, |w| {
        ack.encode_after_header(w)
    })?;
    client.send_raw(source, &tx).await?;
    Ok(())
}

async fn handle_write_property<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    storage: &DeviceStorage,
    write_filter: &WriteFilter,
    r: &mut Reader<'_>,
    invoke_id: u8,
    source: DataLinkAddress,
) -> Result<(), ServerError> {
    let req = WritePropertyRequest::decode_after_header(r, invoke_id)?;

    if !write_filter(req.object_id, req.property_id) {
        send_error(
            client,
            source,
            invoke_id,
            SERVICE_WRITE_PROPERTY,
            ErrorClass::Property,
            ErrorCode::WriteAccessDenied,
        )
        .await?;
        return Ok(());
    }

    let value: ClientDataValue = req.value.into();
    let priority = req.priority.unwrap_or(16).clamp(1, 16);

    let result = match storage.write_commandable_property(
        req.object_id,
        req.property_id,
        value.clone(),
        priority,
    ) {
        Err(crate::error::StorageError::NotForMe) => {
            storage.write_property(req.object_id, req.property_id, req.array_index, vec![value], false)
        }
        other => other,
    };

    match result {
        Ok(()) => {
            let mut buf = [0u8; 16];
            let mut w = Writer::new(&mut buf);
            Npdu::new(0).encode(&mut w)?;
            SimpleAck {
                invoke_id,
                service_choice: SERVICE_WRITE_PROPERTY,
            }
            .encode(&mut w)?;
            client.send_raw(source, w.as_written()).await?;
        }
        Err(err) => {
            let (class, code) = storage_error_to_access_error(err);
            send_error(client, source, invoke_id, SERVICE_WRITE_PROPERTY, class, code).await?;
        }
    }
    Ok(())
}

fn encode_complex_ack(
    invoke_id: u8,
    service_choice: u8,
    body: impl FnOnce(&mut Writer<'_>) -> Result<(), EncodeError>,
) -> Result<Vec<u8>, ServerError> {
    let mut buf = vec![0u8; 1500];
    let written_len = {
        let mut w = Writer::new(&mut buf);
        Npdu::new(0).encode(&mut w)?;
        ComplexAckHeader {
            segmented: false,
            more_follows: false,
            invoke_id,
            sequence_number: None,
            proposed_window_size: None,
            service_choice,
        }
        .encode(&mut w)?;
        body(&mut w)?;
        w.as_written().len()
    };
    buf.truncate(written_len);
    Ok(buf)
}

async fn send_error<D: DataLink + 'static>(
    client: &BacnetClient<D>,
    target: DataLinkAddress,
    invoke_id: u8,
    service_choice: u8,
    error_class: ErrorClass,
    error_code: ErrorCode,
) -> Result<(), ServerError> {
    let mut buf = [0u8; 16];
    let mut w = Writer::new(&mut buf);
    Npdu::new(0).encode(&mut w)?;
    BacnetError {
        invoke_id,
        service_choice,
        error_class: Some(error_class.to_u32()),
        error_code: Some(error_code.to_u32()),
    }
    .encode(&mut w)?;
    client.send_raw(target, w.as_written()).await?;
    Ok(())
}

/// Shallow conversion borrowing strings/byte arrays from the owned value.
fn client_value_to_borrowed(value: &ClientDataValue) -> DataValue<'_> {
    match value {
        ClientDataValue::Null => DataValue::Null,
        ClientDataValue::Boolean(v) => DataValue::Boolean(*v),
        ClientDataValue::Unsigned(v) => DataValue::Unsigned(*v),
        ClientDataValue::Signed(v) => DataValue::Signed(*v),
        ClientDataValue::Real(v) => DataValue::Real(*v),
        ClientDataValue::Double(v) => DataValue::Double(*v),
        ClientDataValue::OctetString(v) => DataValue::OctetString(v),
        ClientDataValue::CharacterString(v) => DataValue::CharacterString(v),
        ClientDataValue::BitString { unused_bits, data } => {
            DataValue::BitString(rustbac_core::types::BitString {
                unused_bits: *unused_bits,
                data: data.as_slice(),
            })
        }
        ClientDataValue::Enumerated(v) => DataValue::Enumerated(*v),
        ClientDataValue::Date(v) => DataValue::Date(*v),
        ClientDataValue::Time(v) => DataValue::Time(*v),
        ClientDataValue::ObjectId(v) => DataValue::ObjectId(*v),
        ClientDataValue::Constructed { tag_num, values } => DataValue::Constructed {
            tag_num: *tag_num,
            values: values.iter().map(client_value_to_borrowed).collect(),
        },
        ClientDataValue::Error {
            error_class,
            error_code,
        } => DataValue::Error {
            error_class: *error_class,
            error_code: *error_code,
        },
    }
}
