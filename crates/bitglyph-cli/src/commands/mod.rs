//! CLI command implementations

pub mod convert;
pub mod init;
pub mod inspect;
pub mod preview;
