pub mod header;
pub mod message;
pub mod protocol_version;
pub mod submessage;
pub mod submessages;
pub mod vendor_id;
