use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::attack::bruteforce::SearchShared;

/// 采样间隔
const SAMPLE_INTERVAL: Duration = Duration::from_millis(150);

/// 进度监视线程：定期采样共享计数器，单行覆盖输出吞吐
pub struct Monitor {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Monitor {
    pub fn spawn(shared: Arc<SearchShared>, started: Instant) -> Monitor {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut last_checked = 0u64;
            let mut last_time = Instant::now();

            loop {
                thread::sleep(SAMPLE_INTERVAL);
                if stop_flag.load(Ordering::Relaxed) || shared.found.load(Ordering::Relaxed) {
                    return;
                }

                let checked = shared.checked.load(Ordering::Relaxed);
                let attempts = shared.attempts.load(Ordering::Relaxed);
                let elapsed = started.elapsed().as_secs_f64();

                let now = Instant::now();
                let delta_secs = now.duration_since(last_time).as_secs_f64();
                let (avg_speed, instant_speed) = if elapsed < 0.01 || delta_secs <= 0.0 {
                    (0.0, 0.0)
                } else {
                    (
                        checked as f64 / elapsed,
                        (checked - last_checked) as f64 / delta_secs,
                    )
                };

                let attempt_ratio = if checked > 0 {
                    attempts as f64 / checked as f64 * 100.0
                } else {
                    0.0
                };

                print!(
                    "\r[*] {} checks | {:.1}M/s avg | {:.1}M/s | {:.1}% zip attempts | {:.1}s     ",
                    checked,
                    avg_speed / 1_000_000.0,
                    instant_speed / 1_000_000.0,
                    attempt_ratio,
                    elapsed
                );
                io::stdout().flush().ok();

                last_checked = checked;
                last_time = now;
            }
        });

        Monitor { stop, handle }
    }

    /// 置停止标志并等待线程退出；在共享状态销毁前调用
    pub fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        self.handle.join().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_stops_promptly() {
        let shared = Arc::new(SearchShared::new());
        let monitor = Monitor::spawn(Arc::clone(&shared), Instant::now());
        monitor.stop();
    }

    #[test]
    fn test_monitor_exits_when_found() {
        let shared = Arc::new(SearchShared::new());
        let monitor = Monitor::spawn(Arc::clone(&shared), Instant::now());
        shared.found.store(true, Ordering::Relaxed);
        // 线程观察到命中标志后自行退出，stop 只负责回收
        monitor.stop();
    }
}
