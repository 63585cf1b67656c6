//! 同步模块：
//! - 清空 `uwp/<name>/Assets/WP` 并复制 Web 构建产物
//! - 从资源目录生成图标与横幅
//! - 可选：WASM 改名补丁

use std::{fs, io, path::Path, time::SystemTime};

use anyhow::{bail, Context, Result};

use crate::{
    config::ProjectConfig,
    icons::{generate_banners, generate_icons, ImageOutcome},
    wasm::patch_wasm,
};

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SyncOptions {
    pub(crate) patch_wasm: bool,
}

/// 执行一次完整同步；`root` 为工作目录
pub(crate) fn sync_project(root: &Path, cfg: &ProjectConfig, opts: SyncOptions) -> Result<()> {
    let build_dir = root.join(&cfg.build_dir);
    if !build_dir.exists() {
        bail!("构建目录 '{}' 不存在，请先构建 Web 项目", cfg.build_dir);
    }
    if !build_dir.is_dir() {
        bail!("'{}' 不是目录", cfg.build_dir);
    }

    let web_assets = cfg.web_assets_dir(root);
    fs::create_dir_all(&web_assets)
        .with_context(|| format!("创建目录失败: {}", web_assets.display()))?;

    println!(
        "🚀 同步构建目录 '{}' -> '{}'",
        cfg.build_dir,
        web_assets.strip_prefix(root).unwrap_or(&web_assets).display()
    );
    clear_dir(&web_assets);
    copy_build(&build_dir, &web_assets);

    sync_images(root, cfg);

    if opts.patch_wasm {
        println!("🔄 处理 WASM 文件...");
        let renames = patch_wasm(&cfg.project_dir(root))?;
        println!("✅ 共改名 {} 个 WASM 文件", renames.len());
    }

    println!("✅ 同步完成！Capacitor Xbox 工程 '{}' 已是最新", cfg.name);
    Ok(())
}

/// 删除目录下的直接文件与子目录（目录本身保留）；返回失败项数
pub(crate) fn clear_dir(dir: &Path) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(it) => it,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "无法读取目录");
            return 1;
        }
    };
    let mut failures = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let res = if is_dir { fs::remove_dir_all(&path) } else { fs::remove_file(&path) };
        if let Err(e) = res {
            tracing::warn!(path = %path.display(), error = %e, "无法删除");
            failures += 1;
        }
    }
    failures
}

/// 复制构建目录的每个顶层条目；单项失败只告警。返回失败项数
pub(crate) fn copy_build(from: &Path, to: &Path) -> usize {
    let entries = match fs::read_dir(from) {
        Ok(it) => it,
        Err(e) => {
            tracing::warn!(dir = %from.display(), error = %e, "无法读取构建目录");
            return 1;
        }
    };
    let mut failures = 0;
    for entry in entries.flatten() {
        let src = entry.path();
        let dest = to.join(entry.file_name());
        let res = if src.is_dir() { copy_dir_all(&src, &dest) } else { copy_file(&src, &dest) };
        if let Err(e) = res {
            tracing::warn!("无法复制 '{}' 到 '{}': {:#}", src.display(), dest.display(), e);
            failures += 1;
        }
    }
    failures
}

/// 递归复制目录，允许覆盖已存在的目标
pub(crate) fn copy_dir_all(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        bail!("{} 不是目录", from.display());
    }
    fs::create_dir_all(to).with_context(|| format!("创建目录失败: {}", to.display()))?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let fpath = entry.path();
        let tpath = to.join(entry.file_name());
        // 跟随符号链接，链接到的目录按内容复制
        if fpath.is_dir() {
            copy_dir_all(&fpath, &tpath)?;
        } else {
            copy_file(&fpath, &tpath)?;
        }
    }
    Ok(())
}

/// 复制文件并保留权限与修改时间
fn copy_file(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)
        .with_context(|| format!("复制失败: {} -> {}", from.display(), to.display()))?;
    if let Err(e) = fs::metadata(from).and_then(|m| m.modified()).and_then(|t| set_mtime(to, t)) {
        tracing::warn!(path = %to.display(), error = %e, "未能保留修改时间");
    }
    Ok(())
}

/// Unix 上修改时间只要求文件属主，只读打开即可
#[cfg(unix)]
fn set_mtime(path: &Path, mtime: SystemTime) -> io::Result<()> {
    fs::File::open(path)?.set_modified(mtime)
}

/// 只读文件需先临时去掉只读属性，写完时间后恢复
#[cfg(not(unix))]
fn set_mtime(path: &Path, mtime: SystemTime) -> io::Result<()> {
    let perms = fs::metadata(path)?.permissions();
    if !perms.readonly() {
        return fs::File::options().write(true).open(path)?.set_modified(mtime);
    }
    let mut writable = perms.clone();
    writable.set_readonly(false);
    fs::set_permissions(path, writable)?;
    let applied = fs::File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(mtime));
    fs::set_permissions(path, perms)?;
    applied
}

fn sync_images(root: &Path, cfg: &ProjectConfig) {
    let resources = root.join(&cfg.resources_dir);
    if !resources.is_dir() {
        println!("⚠️ 未找到资源目录 '{}'，跳过图片生成", cfg.resources_dir);
        return;
    }
    println!("📁 资源目录: {}", cfg.resources_dir);
    let assets = cfg.assets_dir(root);

    match generate_icons(&resources, &assets) {
        Ok(ImageOutcome::Written(files)) => println!("🖼  已生成 {} 个图标", files.len()),
        Ok(ImageOutcome::Missing) => println!(
            "⚠️ 未找到图标（icon/logo/icon-only 的 png/jpg），跳过图标生成"
        ),
        Ok(ImageOutcome::Rejected(w, h)) => {
            println!("⚠️ 图标不是正方形（{}x{}），跳过图标生成", w, h)
        }
        Err(e) => tracing::warn!("处理图标失败: {:#}", e),
    }

    match generate_banners(&resources, &assets) {
        Ok(ImageOutcome::Written(files)) => println!("🖼  已生成 {} 个横幅", files.len()),
        Ok(ImageOutcome::Missing) => println!("⚠️ 未找到横幅（banner.png/jpg/jpeg），跳过横幅生成"),
        Ok(ImageOutcome::Rejected(w, h)) => println!(
            "⚠️ 横幅宽高比 {:.2} 超出允许范围，跳过横幅生成",
            w as f64 / h.max(1) as f64
        ),
        Err(e) => tracing::warn!("处理横幅失败: {:#}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectConfig {
        ProjectConfig::new("Game".into(), "dist".into(), "resources".into(), "me".into())
    }

    #[test]
    fn clear_dir_empties_subtree_but_keeps_root() {
        let tmp = tempfile::tempdir().unwrap();
        let wp = tmp.path().join("WP");
        fs::create_dir_all(wp.join("stale/nested")).unwrap();
        fs::write(wp.join("old.html"), "old").unwrap();
        fs::write(wp.join("stale/nested/old.js"), "old").unwrap();

        assert_eq!(clear_dir(&wp), 0);
        assert!(wp.is_dir());
        assert_eq!(fs::read_dir(&wp).unwrap().count(), 0);
    }

    #[test]
    fn copy_build_merges_into_existing_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let dist = tmp.path().join("dist");
        let dest = tmp.path().join("WP");
        fs::create_dir_all(dist.join("js")).unwrap();
        fs::write(dist.join("index.html"), "<html>new</html>").unwrap();
        fs::write(dist.join("js/app.js"), "new").unwrap();
        fs::create_dir_all(dest.join("js")).unwrap();
        fs::write(dest.join("js/app.js"), "old").unwrap();

        assert_eq!(copy_build(&dist, &dest), 0);
        assert_eq!(fs::read_to_string(dest.join("index.html")).unwrap(), "<html>new</html>");
        assert_eq!(fs::read_to_string(dest.join("js/app.js")).unwrap(), "new");
    }

    #[test]
    fn copied_files_keep_modification_time() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("a.txt");
        let dst = tmp.path().join("b.txt");
        fs::write(&src, "x").unwrap();
        let past = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        fs::File::options().write(true).open(&src).unwrap().set_modified(past).unwrap();

        copy_file(&src, &dst).unwrap();
        assert_eq!(fs::metadata(&dst).unwrap().modified().unwrap(), past);
    }

    #[cfg(unix)]
    #[test]
    fn read_only_files_keep_modification_time() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("ro.js");
        let dst = tmp.path().join("copy.js");
        fs::write(&src, "x").unwrap();
        let past = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(978_307_200);
        fs::File::options().write(true).open(&src).unwrap().set_modified(past).unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o444)).unwrap();

        copy_file(&src, &dst).unwrap();
        let meta = fs::metadata(&dst).unwrap();
        assert_eq!(meta.modified().unwrap(), past);
        assert!(meta.permissions().readonly());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_copied_by_content() {
        let tmp = tempfile::tempdir().unwrap();
        let shared = tmp.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("lib.js"), "lib").unwrap();
        let dist = tmp.path().join("dist");
        fs::create_dir_all(dist.join("js")).unwrap();
        std::os::unix::fs::symlink(&shared, dist.join("js/vendor")).unwrap();

        let dest = tmp.path().join("WP");
        assert_eq!(copy_build(&dist, &dest), 0);
        let vendor = dest.join("js/vendor");
        assert!(fs::symlink_metadata(&vendor).unwrap().is_dir());
        assert_eq!(fs::read_to_string(vendor.join("lib.js")).unwrap(), "lib");
    }

    #[test]
    fn stale_assets_are_replaced_by_build_output() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let cfg = project();
        fs::create_dir_all(root.join("dist/css")).unwrap();
        fs::write(root.join("dist/index.html"), "fresh").unwrap();
        fs::write(root.join("dist/css/site.css"), "body{}").unwrap();
        let wp = cfg.web_assets_dir(root);
        fs::create_dir_all(wp.join("old")).unwrap();
        fs::write(wp.join("removed.html"), "stale").unwrap();

        sync_project(root, &cfg, SyncOptions::default()).unwrap();

        assert!(!wp.join("removed.html").exists());
        assert!(!wp.join("old").exists());
        assert_eq!(fs::read_to_string(wp.join("index.html")).unwrap(), "fresh");
        assert!(wp.join("css/site.css").is_file());
    }

    #[test]
    fn missing_build_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = project();
        let err = sync_project(tmp.path(), &cfg, SyncOptions::default()).unwrap_err();
        assert!(err.to_string().contains("dist"));
        assert!(!cfg.project_dir(tmp.path()).exists());
    }

    #[test]
    fn patch_option_renames_wasm_in_synced_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let cfg = project();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("dist/app.wasm"), [0u8, 1, 2]).unwrap();
        fs::write(root.join("dist/loader.js"), "load('app.wasm')").unwrap();

        sync_project(root, &cfg, SyncOptions { patch_wasm: true }).unwrap();

        let wp = cfg.web_assets_dir(root);
        assert!(wp.join("app.txt").is_file());
        assert!(!wp.join("app.wasm").exists());
        assert_eq!(fs::read_to_string(wp.join("loader.js")).unwrap(), "load('app.txt')");
    }
}
