//! 压缩包解码器之上的薄封装：用候选口令打开首个条目并完整读取。

use std::io::{self, Cursor};
use std::sync::Arc;

use zip::ZipArchive;

use crate::error::CrackError;

type ArchiveReader = Cursor<Arc<[u8]>>;

/// 完整验证适配器
///
/// 中央目录只解析一次，工作线程各持一份克隆句柄共享解析结果
pub struct ZipAdapter {
    archive: ZipArchive<ArchiveReader>,
}

impl ZipAdapter {
    pub fn new(data: Arc<[u8]>) -> Result<Self, CrackError> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        if archive.is_empty() {
            return Err(CrackError::EmptyArchive);
        }
        Ok(ZipAdapter { archive })
    }

    /// 压缩包条目数
    pub fn file_count(&self) -> usize {
        self.archive.len()
    }

    /// 为单个工作线程克隆独立句柄
    pub fn worker_handle(&self) -> EntryHandle {
        EntryHandle {
            archive: self.archive.clone(),
        }
    }
}

/// 工作线程私有的首条目句柄，可反复用不同口令打开
pub struct EntryHandle {
    archive: ZipArchive<ArchiveReader>,
}

impl EntryHandle {
    /// 用候选口令打开首个条目并读完整个流
    ///
    /// 解密失败、解压失败或完整性校验不符都视为口令不匹配
    pub fn try_password(&mut self, password: &[u8]) -> bool {
        let Ok(mut entry) = self.archive.by_index_decrypt(0, password) else {
            return false;
        };
        io::copy(&mut entry, &mut io::sink()).is_ok()
    }
}
