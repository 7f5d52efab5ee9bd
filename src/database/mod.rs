pub mod connection;
pub mod entities;
pub mod migrations;
#[doc(hidden)]
pub mod test_utils;
