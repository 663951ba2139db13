//! 中间件模块
//!
//! 提供请求体校验中间件

mod request_body;

pub use request_body::{MAX_BODY_BYTES, validate_request_body};
