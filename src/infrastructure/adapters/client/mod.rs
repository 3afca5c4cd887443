//! REST Client Adapter - 编辑器访问本服务 API 的客户端

mod http_novel_client;

pub use http_novel_client::*;
