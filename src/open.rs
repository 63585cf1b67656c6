//! 用系统默认程序打开解决方案文件（通常是 Visual Studio）

use std::{path::Path, process::Command};

use anyhow::{bail, Context, Result};

const WINDOWS_ARGS: &[&str] = &["/C", "start", ""];
const NO_ARGS: &[&str] = &[];

/// 按操作系统返回启动程序与前置参数；未知系统返回 None
pub(crate) fn launcher_for(os: &str) -> Option<(&'static str, &'static [&'static str])> {
    match os {
        "windows" => Some(("cmd", WINDOWS_ARGS)),
        "macos" => Some(("open", NO_ARGS)),
        "linux" => Some(("xdg-open", NO_ARGS)),
        _ => None,
    }
}

pub(crate) fn open_solution(sln: &Path) -> Result<()> {
    if !sln.exists() {
        bail!("未找到解决方案文件: {}", sln.display());
    }
    let os = std::env::consts::OS;
    let Some((program, args)) = launcher_for(os) else {
        bail!("不支持的平台 {}，请手动打开 {}", os, sln.display());
    };
    tracing::debug!(program, ?args, sln = %sln.display(), "启动默认程序");
    let status = Command::new(program)
        .args(args)
        .arg(sln)
        .status()
        .with_context(|| format!("无法启动 {}", program))?;
    if !status.success() {
        bail!("{} 退出状态异常: {}", program, status);
    }
    println!("🚀 已打开: {}", sln.display());
    Ok(())
}
