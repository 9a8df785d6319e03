use thiserror::Error;

/// 启动阶段的输入与结构错误；逐候选的失败只算未命中，不在此列
#[derive(Debug, Error)]
pub enum CrackError {
    #[error("can't open archive file: {0}")]
    Io(#[from] std::io::Error),

    #[error("alphabet is empty")]
    EmptyAlphabet,

    #[error("invalid length range {min}-{max}")]
    InvalidLengthRange { min: usize, max: usize },

    #[error("unreadable archive: {0}")]
    BadArchive(#[from] zip::result::ZipError),

    #[error("archive has no entries")]
    EmptyArchive,

    #[error("can't build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
