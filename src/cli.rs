use clap::{Parser, ValueEnum};

use crate::header::CheckByte;

#[derive(Parser)]
#[command(name = "zipcracker")]
#[command(about = "ZIP 口令暴力破解器 - ZipCrypto 快速预校验 + 多线程", long_about = None)]
pub struct Args {
    /// ZIP 文件路径
    #[arg(short = 'f', long = "file")]
    pub file: String,

    /// 预设字符集
    #[arg(short = 'c', long = "charset", value_enum, default_value = "lower+digits")]
    pub charset: CharsetPreset,

    /// 自定义字符集字符串 (优先于 --charset)
    #[arg(long = "custom", default_value = "")]
    pub custom: String,

    /// 最小口令长度
    #[arg(long = "min", default_value_t = 1)]
    pub min_len: usize,

    /// 最大口令长度
    #[arg(long = "max", default_value_t = 32)]
    pub max_len: usize,

    /// 工作线程数 (0 = 自动: min(10*CPU, 200))
    #[arg(short = 'w', long = "workers", default_value_t = 0)]
    pub workers: usize,

    /// 校验字节来源 (auto 按通用标志位 bit 3 选择)
    #[arg(long = "check-byte", value_enum, default_value = "auto")]
    pub check_byte: CheckByte,

    /// 禁用快速预校验，所有候选都走完整解压
    #[arg(long = "slow")]
    pub slow: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CharsetPreset {
    /// 数字 (0-9, 10字符)
    Digits,
    /// 小写字母 (a-z, 26字符)
    Lower,
    /// 大写字母 (A-Z, 26字符)
    Upper,
    /// 大小写字母 (52字符)
    Alpha,
    /// 字母加数字 (62字符)
    Alnum,
    /// 小写字母加数字 (36字符)
    #[value(name = "lower+digits")]
    LowerDigits,
    /// 大写字母加数字 (36字符)
    #[value(name = "upper+digits")]
    UpperDigits,
    /// 字母数字加常用符号 (88字符)
    All,
}
