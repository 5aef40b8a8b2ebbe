pub mod engine;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod session;

pub use crate::domain::model::{StatusRecord, TableResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
