//! 命令调度模块：
//! - 接收解析好的 CLI 参数，合并环境变量得到“有效参数”
//! - 检查各命令的前置条件后调用初始化、同步、打开等模块

use std::path::Path;

use anyhow::{bail, Result};

use crate::{
    cli::{Cli, Command},
    config::{config_path, load_project_config, CONFIG_FILE},
    detect::require_web_project,
    init::init_project,
    open::open_solution,
    sync::{sync_project, SyncOptions},
    template::TemplateSource,
    utils::env_bool_truthy,
};

/// 在 `root` 下运行指定的子命令
pub(crate) fn run(cli: Cli, root: &Path) -> Result<()> {
    require_web_project(root)?;

    match cli.command {
        Command::Init { yes, .. } => {
            let effective_yes = yes || env_bool_truthy("CAPX_YES").unwrap_or(false);
            let source = TemplateSource::from_env()?;
            init_project(root, &source, effective_yes)?;
            Ok(())
        }
        Command::Sync { patch_wasm, .. } => {
            ensure_initialized(root)?;
            println!("🔄 同步 Capacitor Xbox 工程...");
            let cfg = load_project_config(root)?;
            sync_project(root, &cfg, SyncOptions { patch_wasm })
        }
        Command::Open { .. } => {
            ensure_initialized(root)?;
            let cfg = load_project_config(root)?;
            open_solution(&cfg.solution_path(root))
        }
    }
}

fn ensure_initialized(root: &Path) -> Result<()> {
    if !config_path(root).exists() {
        bail!("Capacitor Xbox 工程尚未初始化（缺少 {}），请先运行 init", CONFIG_FILE);
    }
    Ok(())
}
