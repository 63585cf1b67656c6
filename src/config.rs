//! 配置与常量模块：
//! - 定义持久化的 `ProjectConfig`（`uwp_js.config.json`）
//! - 提供读取（含字段校验）与一次性写出
//! - 汇总工作目录下约定的文件名与模板路径

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// 项目配置文件名（位于工作目录）
pub(crate) const CONFIG_FILE: &str = "uwp_js.config.json";
/// Web 项目清单
pub(crate) const PACKAGE_MANIFEST: &str = "package.json";
/// Capacitor 平台配置脚本
pub(crate) const CAPACITOR_CONFIG: &str = "capacitor.config.ts";
/// 模板根目录
pub(crate) const TEMPLATE_ROOT: &str = "uwp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectConfig {
    pub(crate) name: String,
    pub(crate) build_dir: String,
    pub(crate) resources_dir: String,
    pub(crate) user: String,
    /// 创建配置时的工具版本，仅作记录
    #[serde(default)]
    pub(crate) version: String,
    #[serde(default)]
    pub(crate) platforms: BTreeMap<String, PlatformEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlatformEntry {
    pub(crate) config: String,
}

impl ProjectConfig {
    pub(crate) fn new(name: String, build_dir: String, resources_dir: String, user: String) -> Self {
        let mut platforms = BTreeMap::new();
        platforms.insert(
            "uwp".to_string(),
            PlatformEntry { config: CONFIG_FILE.to_string() },
        );
        Self {
            name,
            build_dir,
            resources_dir,
            user,
            version: env!("CARGO_PKG_VERSION").to_string(),
            platforms,
        }
    }

    /// `uwp/<name>`：重命名后的原生工程目录
    pub(crate) fn project_dir(&self, root: &Path) -> PathBuf {
        root.join(TEMPLATE_ROOT).join(&self.name)
    }

    /// `uwp/<name>/Assets`：图标与横幅输出目录
    pub(crate) fn assets_dir(&self, root: &Path) -> PathBuf {
        self.project_dir(root).join("Assets")
    }

    /// `uwp/<name>/Assets/WP`：Web 构建产物的镜像目录
    pub(crate) fn web_assets_dir(&self, root: &Path) -> PathBuf {
        self.assets_dir(root).join("WP")
    }

    /// `uwp/<name>.sln`
    pub(crate) fn solution_path(&self, root: &Path) -> PathBuf {
        root.join(TEMPLATE_ROOT).join(format!("{}.sln", self.name))
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("buildDir", &self.build_dir),
            ("resourcesDir", &self.resources_dir),
            ("user", &self.user),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                bail!("配置无效：字段 `{}` 为空，请重新初始化项目", key);
            }
        }
        Ok(())
    }
}

pub(crate) fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// 读取并校验工作目录中的项目配置
pub(crate) fn load_project_config(root: &Path) -> Result<ProjectConfig> {
    let path = config_path(root);
    let text = fs::read_to_string(&path)
        .with_context(|| format!("读取配置失败: {}", path.display()))?;
    let cfg: ProjectConfig = serde_json::from_str(&text)
        .with_context(|| format!("解析配置失败: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// 写出项目配置（2 空格缩进）；配置已存在时拒绝覆盖
pub(crate) fn write_project_config(root: &Path, cfg: &ProjectConfig) -> Result<PathBuf> {
    let path = config_path(root);
    if path.exists() {
        bail!("配置已存在: {}", path.display());
    }
    let text = serde_json::to_string_pretty(cfg)?;
    fs::write(&path, text).with_context(|| format!("写入配置失败: {}", path.display()))?;
    Ok(path)
}
