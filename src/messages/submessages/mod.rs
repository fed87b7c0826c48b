pub mod acknack;
pub mod data;
pub mod gap;
pub mod heartbeat;
pub mod info_dst;
pub mod info_src;
pub mod info_ts;
pub mod parameter;
pub mod parameter_list;
pub mod representation_identifier;
pub mod serialized_payload;
