use clap::Parser;
use rustbac_client::{BacnetClient, ClientDataValue};
use rustbac_core::types::{ObjectId, ObjectType, PropertyId};
use rustbac_datalink::bip::transport::BacnetIpTransport;
use rustbac_server::{BacnetServer, DeviceStorage, StorageObject};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bacnet-device")]
struct Args {
    /// Device instance number.
    #[arg(long, default_value_t = 9999)]
    instance: u32,
    /// Number of analog-value objects to create when no storage file exists yet.
    #[arg(long, default_value_t = 3)]
    analog_values: u32,
    /// XML file to load storage from and save it to on exit.
    #[arg(long)]
    storage_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let bind_addr: std::net::SocketAddr = "0.0.0.0:47808".parse()?;
    let transport = BacnetIpTransport::bind(bind_addr).await?;
    let client = BacnetClient::with_datalink(transport);

    let storage = DeviceStorage::new();
    let mut device = StorageObject::new(ObjectId::new(ObjectType::Device, args.instance));
    device.set_property(
        PropertyId::ObjectName,
        vec![ClientDataValue::CharacterString(format!(
            "Device-{}",
            args.instance
        ))],
    );
    storage.add_object(device);

    for i in 0..args.analog_values {
        let oid = ObjectId::new(ObjectType::AnalogValue, i);
        let mut object = StorageObject::new(oid);
        object.set_property(
            PropertyId::ObjectName,
            vec![ClientDataValue::CharacterString(format!("AV-{i}"))],
        );
        object.set_property(PropertyId::PresentValue, vec![ClientDataValue::Real(0.0)]);
        object.set_property(
            PropertyId::PriorityArray,
            vec![ClientDataValue::Null; 16],
        );
        object.set_property(
            PropertyId::RelinquishDefault,
            vec![ClientDataValue::Real(0.0)],
        );
        object.set_property(PropertyId::OutOfService, vec![ClientDataValue::Boolean(false)]);
        storage.add_object(object);
    }

    let mut server = BacnetServer::new(client, storage, args.instance);
    if let Some(path) = args.storage_file {
        server = server.with_storage_file(path);
    }

    println!("Device {} running. Ctrl+C to stop.", args.instance);
    let running = server.open().await?;
    tokio::signal::ctrl_c().await?;
    running.close()?;
    Ok(())
}
