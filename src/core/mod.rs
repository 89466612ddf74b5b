pub mod discovery;
pub mod etl;
pub mod naming;
pub mod pipeline;
pub mod qr;

pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, StorageEntry};
pub use crate::utils::error::Result;
