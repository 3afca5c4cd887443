//! LLM Adapter - 文本生成服务客户端

mod openai_client;

pub use openai_client::*;
