pub mod collections;
mod constants;
pub mod compute;
pub mod crypto_tools;
pub mod investigation;
pub mod registry;
pub mod sdk;
