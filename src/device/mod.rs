pub mod client;
pub mod error;
pub mod mock;

pub use client::{DeviceLink, HttpDevice};
pub use error::DeviceError;
pub use mock::MockDevice;
