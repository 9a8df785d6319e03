use std::path::Path;
use std::process;

use clap::Parser;

use zipcracker::{crack_archive, Args};

fn main() {
    let args = Args::parse();

    if !Path::new(&args.file).exists() {
        eprintln!("[-] file not found: {}", args.file);
        process::exit(1);
    }

    let result = match crack_archive(args) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("[-] {e}");
            process::exit(1);
        }
    };

    match &result.password {
        Some(password) => {
            println!("\n\n[+] PASSWORD FOUND: '{password}'");
            println!(
                "[*] time: {:.2}s | checks: {} | attempts: {} ({:.1}%) | speed: {:.1}M/s",
                result.elapsed_secs,
                result.checked,
                result.attempts,
                result.attempt_ratio(),
                result.speed() / 1_000_000.0
            );
        }
        None => println!("\n[-] no match found"),
    }
}
