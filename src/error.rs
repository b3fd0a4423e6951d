//! 错误类型
//!
//! 只有文件级错误会变成 `Err`：行级解析失败、缺失接口绑定等
//! 都在原地记录 warn 日志后跳过。

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no usable link records in {path}")]
    NoLinks { path: PathBuf },

    #[error("no usable traffic demands in {path}")]
    NoDemands { path: PathBuf },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
