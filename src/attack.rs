pub mod bruteforce;
pub mod monitor;

pub use bruteforce::{bruteforce_attack, default_workers, BruteforceOutcome, BruteforceParams};
