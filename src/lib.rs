//! Novelist - 小说构思与写作服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Novel Context: 小说、章节、角色、场景与章节重排
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, TextGenerator, ChapterSaver）
//! - Commands: CQRS 命令处理器（含 AI 生成）
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful JSON API
//! - Persistence: SQLite 存储
//! - Adapters: LLM Client, REST Client
//! - Autosave: 编辑器自动保存控制器

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
