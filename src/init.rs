//! 初始化模块：
//! - 探测 Web 项目并交互式确认名称与目录
//! - 安装并改名模板，最后写出 `uwp_js.config.json`

use std::{
    io::{self, BufRead, IsTerminal},
    path::Path,
};

use anyhow::{bail, Context, Result};
use dialoguer::Input;

use crate::{
    capacitor::HeuristicExtractor,
    config::{
        config_path, write_project_config, ProjectConfig, CAPACITOR_CONFIG, CONFIG_FILE, TEMPLATE_ROOT,
    },
    detect::{detect_project, ProjectInfo},
    template::{install_template, TemplateSource},
    utils::env_opt_string,
};

/// init 收集到的答案
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InitAnswers {
    pub(crate) name: String,
    pub(crate) build_dir: String,
    pub(crate) resources_dir: String,
}

impl InitAnswers {
    fn defaults(info: &ProjectInfo) -> Self {
        Self {
            name: info.suggested_name(),
            build_dir: info.suggested_build_dir(),
            resources_dir: info.suggested_resources_dir(),
        }
    }
}

/// 执行 init：`assume_yes` 为真时直接采用全部建议值
pub(crate) fn init_project(root: &Path, source: &TemplateSource, assume_yes: bool) -> Result<ProjectConfig> {
    if config_path(root).exists() {
        bail!("Capacitor Xbox 已初始化（{} 已存在）", CONFIG_FILE);
    }
    let template_root = root.join(TEMPLATE_ROOT);
    if template_root.exists() {
        bail!("目录 '{}' 已存在，请先移除后再初始化", TEMPLATE_ROOT);
    }

    println!("🔧 初始化 Capacitor Xbox 工程...");
    let info = detect_project(root, &HeuristicExtractor)?;
    if info.is_capacitor {
        match info.capacitor {
            Some(_) => println!("ℹ️  检测到 Capacitor 项目，已读取 {}", CAPACITOR_CONFIG),
            None => println!("ℹ️  检测到 Capacitor 项目，但未能解析 {}，改用目录约定", CAPACITOR_CONFIG),
        }
    }
    let defaults = InitAnswers::defaults(&info);
    let answers = if assume_yes { defaults } else { prompt_answers(defaults)? };
    let user = capture_user()?;

    install_template(&template_root, source, &answers.name, &user)?;

    let cfg = ProjectConfig::new(answers.name, answers.build_dir, answers.resources_dir, user);
    let written = write_project_config(root, &cfg)?;
    println!("写入: {}", written.display());
    println!("✅ 初始化完成！接下来运行 sync 同步 Web 构建产物");
    Ok(cfg)
}

fn prompt_answers(defaults: InitAnswers) -> Result<InitAnswers> {
    let name = ask("ℹ️  应用名称", defaults.name)?;
    let build_dir = ask("ℹ️  构建目录", defaults.build_dir)?;
    let resources_dir = ask("ℹ️  资源目录", defaults.resources_dir)?;
    Ok(InitAnswers { name, build_dir, resources_dir })
}

/// 空输入即采用默认值；stdin 不是终端时按行读取管道输入
fn ask(prompt: &str, default: String) -> Result<String> {
    if !io::stdin().is_terminal() {
        return read_answer(&mut io::stdin().lock(), prompt, default);
    }
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn read_answer(input: &mut impl BufRead, prompt: &str, default: String) -> Result<String> {
    eprint!("{} [{}]: ", prompt, default);
    let mut line = String::new();
    input.read_line(&mut line).context("读取输入失败")?;
    let value = line.trim();
    Ok(if value.is_empty() { default } else { value.to_string() })
}

/// 当前用户名：CAPX_USER > USERNAME > USER > LOGNAME
pub(crate) fn capture_user() -> Result<String> {
    ["CAPX_USER", "USERNAME", "USER", "LOGNAME"]
        .iter()
        .find_map(|key| env_opt_string(key))
        .ok_or_else(|| anyhow::anyhow!("无法获取当前用户名，请设置环境变量 CAPX_USER"))
}
