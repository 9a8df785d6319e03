//! ZipCrypto 压缩包口令并行恢复引擎。
//!
//! 快速路径用 12 字节加密头的单字节已知明文预校验淘汰约 255/256 的候选，
//! 幸存者再完整解压确认；AES 等其他加密方式退回逐候选完整试解的慢速路径。

pub mod archive;
pub mod attack;
pub mod charset;
pub mod cli;
pub mod error;
pub mod header;
pub mod zipcrypto;

use std::fs;
use std::sync::Arc;

use archive::ZipAdapter;
use attack::{bruteforce_attack, default_workers, BruteforceParams};
use charset::Alphabet;
pub use cli::Args;
pub use error::CrackError;

/// 口令搜索结果
#[derive(Debug, Clone)]
pub struct CrackResult {
    /// 找到的口令（显示用；非 UTF-8 字节做有损转换）
    pub password: Option<String>,
    /// 已枚举候选总数（含预校验淘汰）
    pub checked: u64,
    /// 进入完整解压验证的候选数
    pub attempts: u64,
    /// 总耗时（秒）
    pub elapsed_secs: f64,
}

impl CrackResult {
    /// 是否成功找到口令
    pub fn is_success(&self) -> bool {
        self.password.is_some()
    }

    /// 平均速度（候选/秒）
    pub fn speed(&self) -> f64 {
        if self.elapsed_secs > 0.0 {
            self.checked as f64 / self.elapsed_secs
        } else {
            0.0
        }
    }

    /// 完整验证占比（百分数）
    pub fn attempt_ratio(&self) -> f64 {
        if self.checked > 0 {
            self.attempts as f64 / self.checked as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// 执行口令搜索
///
/// # 参数
/// - `args`: CLI 参数配置
///
/// # 返回
/// 搜索结果，包含口令、计数器与耗时；输入错误返回 [`CrackError`]
///
/// # 示例
/// ```no_run
/// use clap::Parser;
/// use zipcracker::{crack_archive, Args};
///
/// let args = Args::parse_from(["zipcracker", "-f", "file.zip", "-c", "digits", "--max", "6"]);
/// let result = crack_archive(args).unwrap();
/// if let Some(password) = result.password {
///     println!("{password}");
/// }
/// ```
pub fn crack_archive(args: Args) -> Result<CrackResult, CrackError> {
    if args.min_len == 0 || args.min_len > args.max_len {
        return Err(CrackError::InvalidLengthRange {
            min: args.min_len,
            max: args.max_len,
        });
    }

    let alphabet = if args.custom.is_empty() {
        Alphabet::from_bytes(charset::preset_bytes(args.charset))?
    } else {
        Alphabet::from_bytes(args.custom.as_bytes())?
    };

    let data: Arc<[u8]> = fs::read(&args.file)?.into();

    let verifier = if args.slow {
        None
    } else {
        header::build_verifier(&data, args.check_byte)
    };
    if args.slow {
        println!("[+] fast path disabled - every candidate goes through full decryption");
    } else if verifier.is_some() {
        println!("[+] ZipCrypto detected - fast mode enabled");
    } else {
        println!("[+] AES encryption detected");
    }

    let adapter = ZipAdapter::new(Arc::clone(&data))?;

    let workers = if args.workers == 0 {
        default_workers()
    } else {
        args.workers
    };

    println!(
        "\n[*] file: {} KB | charset: {} | length: {}-{} | workers: {}",
        data.len() / 1024,
        alphabet.len(),
        args.min_len,
        args.max_len,
        workers
    );

    let outcome = bruteforce_attack(BruteforceParams {
        alphabet: &alphabet,
        verifier: verifier.as_ref(),
        adapter: &adapter,
        min_len: args.min_len,
        max_len: args.max_len,
        workers,
    })?;

    Ok(CrackResult {
        password: outcome
            .password
            .map(|p| String::from_utf8_lossy(&p).into_owned()),
        checked: outcome.checked,
        attempts: outcome.attempts,
        elapsed_secs: outcome.elapsed_secs,
    })
}
