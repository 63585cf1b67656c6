//! 通用辅助函数：
//! - 环境变量读取与解析
//! - 递归列出目录下的全部文件
//! - 以宽松解码方式整体改写文本文件

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// 可选读取 PATH 环境变量为 PathBuf。
pub(crate) fn env_opt_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from).filter(|p| !p.as_os_str().is_empty())
}

/// 可选读取 String 环境变量。
pub(crate) fn env_opt_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// 读取布尔环境变量的真值（1/true/on/yes/y）。
pub(crate) fn env_bool_truthy(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| {
        matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes" | "y")
    })
}

/// 递归收集目录下所有普通文件；无法读取的子目录会被跳过并记录警告。
pub(crate) fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    collect_files(dir, &mut out);
    out.sort();
    out
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(it) => it,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "无法读取目录，已跳过");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => collect_files(&path, out),
            Ok(ft) if ft.is_file() => out.push(path),
            _ => {}
        }
    }
}

/// 以 UTF-8 宽松解码读取文件，交给 `edit` 改写；内容有变化时才写回。
/// 返回是否写回。
pub(crate) fn rewrite_text_lossy<F>(path: &Path, edit: F) -> Result<bool>
where
    F: FnOnce(&str) -> String,
{
    let bytes = fs::read(path).with_context(|| format!("读取失败: {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    let updated = edit(&*content);
    if updated.as_str() == &*content {
        return Ok(false);
    }
    fs::write(path, updated.as_bytes()).with_context(|| format!("写入失败: {}", path.display()))?;
    Ok(true)
}

/// 对目录下每个文件做一次整体子串替换；单个文件失败只告警不中断。
/// 返回实际被改写的文件数。
pub(crate) fn replace_in_files(dir: &Path, old: &str, new: &str) -> usize {
    let mut changed = 0;
    for file in list_files(dir) {
        match rewrite_text_lossy(&file, |s| s.replace(old, new)) {
            Ok(true) => changed += 1,
            Ok(false) => {}
            Err(e) => tracing::warn!(file = %file.display(), "跳过文件: {:#}", e),
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_files_walks_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("top.txt"), "x").unwrap();
        fs::write(tmp.path().join("a/b/deep.txt"), "y").unwrap();

        let files = list_files(tmp.path());
        assert_eq!(files.len(), 2);
        assert!(files.contains(&tmp.path().join("a/b/deep.txt")));
    }

    #[test]
    fn replace_in_files_only_rewrites_matching_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("hit.xml"), "<Name>UWP.js</Name>").unwrap();
        fs::write(tmp.path().join("miss.xml"), "<Name>Other</Name>").unwrap();

        assert_eq!(replace_in_files(tmp.path(), "UWP.js", "MyGame"), 1);
        assert_eq!(
            fs::read_to_string(tmp.path().join("hit.xml")).unwrap(),
            "<Name>MyGame</Name>"
        );
    }

    #[test]
    fn rewrite_keeps_untouched_binary_files_intact() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = tmp.path().join("blob.bin");
        let raw = [0xffu8, 0xfe, 0x00, 0x41];
        fs::write(&bin, raw).unwrap();

        let written = rewrite_text_lossy(&bin, |s| s.replace("UWP.js", "X")).unwrap();
        assert!(!written);
        assert_eq!(fs::read(&bin).unwrap(), raw);
    }
}
