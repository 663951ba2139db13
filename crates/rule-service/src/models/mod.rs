//! 服务模型模块

pub mod data_object;

pub use data_object::{DataObject, ObjectStore};
