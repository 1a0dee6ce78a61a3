pub mod api;

pub(crate) mod wire_bytes;
