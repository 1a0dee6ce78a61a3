pub mod commitment;
pub mod credential;
