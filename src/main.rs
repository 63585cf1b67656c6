mod capacitor;
mod cli;
mod commands;
mod config;
mod detect;
mod icons;
mod init;
mod open;
mod sync;
mod template;
mod utils;
mod wasm;

use std::process::ExitCode;

use crate::cli::parse_args;

fn main() -> ExitCode {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // 参数错误统一以 1 退出；help/version 以 0 退出
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::from(1) } else { ExitCode::SUCCESS };
        }
    };
    tracing::debug!(?cli, "CLI arguments parsed");

    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("❌ 无法获取当前目录: {}", e);
            return ExitCode::from(1);
        }
    };

    match commands::run(cli, &root) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::from(1)
        }
    }
}
