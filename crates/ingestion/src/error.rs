//! Ingestion 错误类型

use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 重建线程无法启动
    #[error("failed to spawn reconstruction worker: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// 重建线程 panic
    #[error("reconstruction worker panicked: {message}")]
    WorkerPanicked {
        /// panic 消息
        message: String,
    },
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
