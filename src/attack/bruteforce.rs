use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::archive::{EntryHandle, ZipAdapter};
use crate::attack::monitor::Monitor;
use crate::charset::Alphabet;
use crate::error::CrackError;
use crate::zipcrypto::ZipCryptoVerifier;

/// 本地计数批量刷新阈值，降低共享原子变量的争用
const FLUSH_BATCH: u64 = 1000;

/// 暴力破解参数
pub struct BruteforceParams<'a> {
    pub alphabet: &'a Alphabet,
    pub verifier: Option<&'a ZipCryptoVerifier>,
    pub adapter: &'a ZipAdapter,
    pub min_len: usize,
    pub max_len: usize,
    pub workers: usize,
}

/// 暴力破解结果
pub struct BruteforceOutcome {
    pub password: Option<Vec<u8>>,
    pub checked: u64,
    pub attempts: u64,
    pub elapsed_secs: f64,
}

/// 工作线程共享状态：计数器、命中标志与结果槽
pub struct SearchShared {
    /// 已枚举候选数（含预校验淘汰）
    pub checked: AtomicU64,
    /// 进入完整解压验证的候选数
    pub attempts: AtomicU64,
    /// 命中标志，只会由赢得 CAS 的线程置位一次
    pub found: AtomicBool,
    result: Mutex<Option<Vec<u8>>>,
}

impl SearchShared {
    pub(crate) fn new() -> Self {
        SearchShared {
            checked: AtomicU64::new(0),
            attempts: AtomicU64::new(0),
            found: AtomicBool::new(false),
            result: Mutex::new(None),
        }
    }

    fn flush(&self, checked: u64, attempts: u64) {
        if checked > 0 {
            self.checked.fetch_add(checked, Ordering::Relaxed);
        }
        if attempts > 0 {
            self.attempts.fetch_add(attempts, Ordering::Relaxed);
        }
    }
}

/// 默认工作线程数：超配以摊平慢速路径的解压开销
pub fn default_workers() -> usize {
    (num_cpus::get() * 10).min(200)
}

/// 把 [0, total) 切成至多 workers 个连续区间
///
/// 区间互不重叠且并集覆盖全域；total 小于 workers 时每个区间一个序号
fn partition(total: u64, workers: usize) -> Vec<(u64, u64)> {
    let effective = (workers as u64).min(total).max(1);
    let chunk = total / effective;
    (0..effective)
        .map(|k| {
            let start = k * chunk;
            let end = if k == effective - 1 {
                total
            } else {
                start + chunk
            };
            (start, end)
        })
        .collect()
}

fn range_worker(
    shared: &SearchShared,
    alphabet: &Alphabet,
    verifier: Option<&ZipCryptoVerifier>,
    mut entry: EntryHandle,
    length: usize,
    start: u64,
    end: u64,
) {
    let mut password = vec![0u8; length];
    let mut local_checked = 0u64;
    let mut local_attempts = 0u64;

    for index in start..end {
        if shared.found.load(Ordering::Relaxed) {
            break;
        }

        alphabet.decode_into(index, &mut password);
        local_checked += 1;

        let survives = match verifier {
            Some(v) => v.check(&password),
            None => true,
        };

        if survives {
            local_attempts += 1;
            if entry.try_password(&password) {
                // 只有赢得 CAS 的线程写入结果槽
                if shared
                    .found
                    .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    *shared.result.lock().unwrap() = Some(password.clone());
                }
                break;
            }
        }

        if local_checked == FLUSH_BATCH {
            shared.flush(local_checked, local_attempts);
            local_checked = 0;
            local_attempts = 0;
        }
    }

    shared.flush(local_checked, local_attempts);
}

/// 执行暴力破解：按长度递增扫描，每个长度切区间并行搜索
pub fn bruteforce_attack(params: BruteforceParams) -> Result<BruteforceOutcome, CrackError> {
    let shared = Arc::new(SearchShared::new());
    let start_time = Instant::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.workers)
        .build()?;
    let monitor = Monitor::spawn(Arc::clone(&shared), start_time);

    for length in params.min_len..=params.max_len {
        if shared.found.load(Ordering::Relaxed) {
            break;
        }

        let Some(total) = params.alphabet.combinations(length) else {
            eprintln!(
                "[-] length {}: {}^{} exceeds the 64-bit search space, stopping",
                length,
                params.alphabet.len(),
                length
            );
            break;
        };

        println!("\n[*] length {} ({} combinations)", length, total);

        let shared_ref = &*shared;
        pool.scope(|scope| {
            for &(range_start, range_end) in &partition(total, params.workers) {
                scope.spawn(move |_| {
                    let entry = params.adapter.worker_handle();
                    range_worker(
                        shared_ref,
                        params.alphabet,
                        params.verifier,
                        entry,
                        length,
                        range_start,
                        range_end,
                    );
                });
            }
        });

        if shared.found.load(Ordering::Relaxed) {
            break;
        }
    }

    monitor.stop();

    let password = shared.result.lock().unwrap().take();
    Ok(BruteforceOutcome {
        password,
        checked: shared.checked.load(Ordering::Relaxed),
        attempts: shared.attempts.load(Ordering::Relaxed),
        elapsed_secs: start_time.elapsed().as_secs_f64(),
    })
}
