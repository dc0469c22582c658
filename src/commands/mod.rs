pub mod common;
pub mod contract;
pub mod display;
pub mod init;
pub mod stage;
pub mod vendor;
