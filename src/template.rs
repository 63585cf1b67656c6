//! 模板安装模块：
//! - 获取模板压缩包（远程下载或本地文件）并解压
//! - 把脚手架目录、解决方案与工程文件重命名为项目名
//! - 在工程树中替换默认名称、作者与占位 GUID

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use url::Url;

use crate::utils::{env_opt_path, env_opt_string, replace_in_files, rewrite_text_lossy};

/// 默认模板地址
pub(crate) const TEMPLATE_URL: &str =
    "https://git.nanodata.cloud/moonpower/uwpjs/raw/branch/main/capacitor-xbox.zip";
/// 下载到模板根目录中的临时压缩包名
pub(crate) const ARCHIVE_NAME: &str = "UWP.js.zip";
/// 脚手架默认名称
pub(crate) const DEFAULT_NAME: &str = "UWP.js";
/// 脚手架默认作者
pub(crate) const DEFAULT_AUTHOR: &str = "Naalf";
/// 模板中的占位 GUID
pub(crate) const PLACEHOLDER_GUID: &str = "4e34859b-2064-4d01-a9c6-f43ce8241ecd";
pub(crate) const PROJECT_EXT: &str = "csproj";

/// 模板来源
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TemplateSource {
    Remote(String),
    Local(PathBuf),
}

impl TemplateSource {
    /// CAPX_TEMPLATE_ZIP > CAPX_TEMPLATE_URL > 内置地址
    pub(crate) fn from_env() -> Result<Self> {
        if let Some(p) = env_opt_path("CAPX_TEMPLATE_ZIP") {
            return Ok(TemplateSource::Local(p));
        }
        match env_opt_string("CAPX_TEMPLATE_URL") {
            Some(u) => Ok(TemplateSource::Remote(validate_url(&u)?)),
            None => Ok(TemplateSource::Remote(TEMPLATE_URL.to_string())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            TemplateSource::Remote(u) => format!("远程 URL: {}", u),
            TemplateSource::Local(p) => format!("本地文件: {}", p.display()),
        }
    }
}

fn validate_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).with_context(|| format!("模板地址无效: {}", raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => bail!("模板地址仅支持 http/https，收到: {}", other),
    }
}

/// 安装模板到 `root`（即 `uwp/`），返回重命名后的工程目录 `uwp/<name>`
pub(crate) fn install_template(
    root: &Path,
    source: &TemplateSource,
    name: &str,
    user: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(root).with_context(|| format!("创建目录失败: {}", root.display()))?;

    println!("🚀 获取 Capacitor Xbox 模板（{}）...", source.describe());
    let archive = root.join(ARCHIVE_NAME);
    fetch_archive(source, &archive)?;
    println!("🎉 模板获取完成");

    println!("🔧 解压模板...");
    extract_archive(&archive, root)?;
    fs::remove_file(&archive)
        .with_context(|| format!("删除压缩包失败: {}", archive.display()))?;

    let project_dir = rename_scaffold(root, name)?;
    rewrite_solution(root, name)?;

    println!("🔄 替换占位符...");
    rebrand_tree(&project_dir, name, user);
    Ok(project_dir)
}

fn fetch_archive(source: &TemplateSource, dest: &Path) -> Result<()> {
    match source {
        TemplateSource::Local(p) => {
            fs::copy(p, dest)
                .with_context(|| format!("复制模板失败: {} -> {}", p.display(), dest.display()))?;
            Ok(())
        }
        TemplateSource::Remote(url) => download(url, dest),
    }
}

#[cfg(feature = "remote")]
fn download(url: &str, dest: &Path) -> Result<()> {
    let call = ureq::get(url)
        .set("User-Agent", concat!("capacitor-xbox/", env!("CARGO_PKG_VERSION")))
        .call();
    let resp = ensure_success(call, url)?;
    let mut reader = resp.into_reader();
    let mut file =
        fs::File::create(dest).with_context(|| format!("创建文件失败: {}", dest.display()))?;
    let bytes = std::io::copy(&mut reader, &mut file)
        .with_context(|| format!("下载模板失败: {}", url))?;
    tracing::debug!(url, bytes, "模板下载完成");
    Ok(())
}

#[cfg(not(feature = "remote"))]
fn download(url: &str, _dest: &Path) -> Result<()> {
    bail!(
        "未启用 remote 特性，无法下载模板 {}。请启用 feature `remote` 或设置 CAPX_TEMPLATE_ZIP",
        url
    );
}

#[cfg(feature = "remote")]
fn ensure_success(resp: Result<ureq::Response, ureq::Error>, url: &str) -> Result<ureq::Response> {
    match resp {
        Ok(r) => Ok(r),
        Err(e) => bail!("HTTP 请求失败 {}: {}", url, e),
    }
}

/// 解压全部条目到 `into`
pub(crate) fn extract_archive(archive: &Path, into: &Path) -> Result<()> {
    let file =
        fs::File::open(archive).with_context(|| format!("打开压缩包失败: {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("不是有效的 zip 文件: {}", archive.display()))?;
    tracing::debug!(entries = zip.len(), "开始解压");
    zip.extract(into)
        .with_context(|| format!("解压失败: {} -> {}", archive.display(), into.display()))?;
    Ok(())
}

/// 重命名脚手架目录、解决方案和工程文件；各项仅在存在时处理
pub(crate) fn rename_scaffold(root: &Path, name: &str) -> Result<PathBuf> {
    let project_dir = root.join(name);

    let scaffold_dir = root.join(DEFAULT_NAME);
    if scaffold_dir.is_dir() {
        fs::rename(&scaffold_dir, &project_dir).with_context(|| {
            format!("重命名失败: {} -> {}", scaffold_dir.display(), project_dir.display())
        })?;
    }

    let sln = root.join(format!("{}.sln", DEFAULT_NAME));
    if sln.exists() {
        let new_sln = root.join(format!("{}.sln", name));
        fs::rename(&sln, &new_sln)
            .with_context(|| format!("重命名失败: {} -> {}", sln.display(), new_sln.display()))?;
    }

    let proj = project_dir.join(format!("{}.{}", DEFAULT_NAME, PROJECT_EXT));
    if proj.exists() {
        let new_proj = project_dir.join(format!("{}.{}", name, PROJECT_EXT));
        fs::rename(&proj, &new_proj)
            .with_context(|| format!("重命名失败: {} -> {}", proj.display(), new_proj.display()))?;
    }
    Ok(project_dir)
}

/// 改写解决方案中的工程引用与名称
pub(crate) fn rewrite_solution(root: &Path, name: &str) -> Result<()> {
    let sln = root.join(format!("{}.sln", name));
    if !sln.exists() {
        return Ok(());
    }
    let old_ref = format!("{0}\\{0}.{1}", DEFAULT_NAME, PROJECT_EXT);
    let new_ref = format!("{0}\\{0}.{1}", name, PROJECT_EXT);
    let old_sln = format!("{}.sln", DEFAULT_NAME);
    let new_sln = format!("{}.sln", name);
    rewrite_text_lossy(&sln, |s| {
        s.replace(&old_ref, &new_ref)
            .replace(&old_sln, &new_sln)
            .replace(DEFAULT_NAME, name)
    })?;
    Ok(())
}

/// 三轮独立替换：默认名称、默认作者、占位 GUID
pub(crate) fn rebrand_tree(project_dir: &Path, name: &str, user: &str) {
    let guid = random_guid();
    let passes = [
        (DEFAULT_NAME, name.to_string()),
        (DEFAULT_AUTHOR, user.to_string()),
        (PLACEHOLDER_GUID, guid),
    ];
    for (old, new) in passes.iter() {
        let changed = replace_in_files(project_dir, old, new);
        tracing::debug!(old, new = new.as_str(), changed, "替换完成");
    }
}

/// `8-4-4-4-12` 格式的随机十六进制串
pub(crate) fn random_guid() -> String {
    uuid::Uuid::new_v4().hyphenated().to_string()
}
