//! Domain separation tags for credential derivation

pub const USER_ID_TAG: u8 = 0x00;
pub const PARTY_ID_TAG: u8 = 0x01;
