//! Tauri 命令模块
//!
//! 提供前端调用的所有 Tauri 命令接口，按功能分组：
//! - record: 使用事件记录命令
//! - query: 使用统计查询命令
//! - chat: 健康助手聊天命令
//! - emotion: 情绪识别命令
//! - config: 配置管理命令

pub mod chat;
pub mod config;
pub mod emotion;
pub mod query;
pub mod record;

// 重新导出所有命令
pub use chat::*;
pub use config::*;
pub use emotion::*;
pub use query::*;
pub use record::*;
