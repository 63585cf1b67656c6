//! 项目探测：检查工作目录中的 Web 项目标记并推导 init 的默认建议值

use std::{fs, path::Path};

use anyhow::{bail, Result};
use serde_json::{Map, Value};

use crate::{
    capacitor::{str_field, ConfigExtractor},
    config::{CAPACITOR_CONFIG, PACKAGE_MANIFEST},
};

/// 探测结果
#[derive(Debug, Default)]
pub(crate) struct ProjectInfo {
    /// package.json 中的 `name`
    pub(crate) package_name: Option<String>,
    /// 是否存在 capacitor.config.ts
    pub(crate) is_capacitor: bool,
    /// 成功解析出的 capacitor 配置
    pub(crate) capacitor: Option<Map<String, Value>>,
    pub(crate) web_dir: Option<String>,
    pub(crate) resources_dir: Option<String>,
}

impl ProjectInfo {
    pub(crate) fn suggested_name(&self) -> String {
        self.capacitor
            .as_ref()
            .and_then(|c| str_field(c, "appName"))
            .map(str::to_string)
            .or_else(|| self.package_name.clone())
            .unwrap_or_else(|| "MyApp".to_string())
    }

    pub(crate) fn suggested_build_dir(&self) -> String {
        self.web_dir.clone().unwrap_or_else(|| "dist".to_string())
    }

    pub(crate) fn suggested_resources_dir(&self) -> String {
        self.resources_dir.clone().unwrap_or_else(|| "assets".to_string())
    }
}

/// 确认工作目录是一个 Web 项目（存在 package.json）
pub(crate) fn require_web_project(root: &Path) -> Result<()> {
    if !root.join(PACKAGE_MANIFEST).is_file() {
        bail!(
            "未找到有效的 Web 项目（缺少 {}）。若未使用 JS 框架，可先运行 `npm init` 生成",
            PACKAGE_MANIFEST
        );
    }
    Ok(())
}

/// 探测工作目录，失败（非 Web 项目）时直接返回错误
pub(crate) fn detect_project(root: &Path, extractor: &dyn ConfigExtractor) -> Result<ProjectInfo> {
    require_web_project(root)?;

    let mut info = ProjectInfo {
        package_name: read_package_name(&root.join(PACKAGE_MANIFEST)),
        ..Default::default()
    };

    let cap_path = root.join(CAPACITOR_CONFIG);
    if cap_path.is_file() {
        info.is_capacitor = true;
        match fs::read_to_string(&cap_path) {
            Ok(text) => info.capacitor = extractor.try_extract_config(&text),
            Err(e) => tracing::warn!(file = %cap_path.display(), error = %e, "读取 capacitor 配置失败"),
        }
    }

    info.web_dir = info
        .capacitor
        .as_ref()
        .and_then(|c| str_field(c, "webDir"))
        .map(str::to_string)
        .or_else(|| first_existing_dir(root, &["dist", "build"]));
    info.resources_dir = first_existing_dir(root, &["resources", "assets"]);

    tracing::debug!(?info, "项目探测完成");
    Ok(info)
}

fn first_existing_dir(root: &Path, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find(|n| root.join(n).exists())
        .map(|n| n.to_string())
}

fn read_package_name(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Value>(&text) {
        Ok(v) => v.get("name").and_then(Value::as_str).map(str::to_string),
        Err(e) => {
            eprintln!("⚠️ {} 不是合法 JSON，忽略其中的项目名: {}", path.display(), e);
            None
        }
    }
}
