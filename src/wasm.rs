//! WASM 补丁：把工程树中的 `*.wasm` 改名为 `*.txt`，并更新所有文本中的引用。
//! 先完成全部改名得到映射表，再对整棵树做一轮替换。

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::utils::{list_files, rewrite_text_lossy};

const FROM_EXT: &str = ".wasm";
const TO_EXT: &str = ".txt";

/// 返回 (旧文件名, 新文件名) 列表
pub(crate) fn patch_wasm(project_dir: &Path) -> Result<Vec<(String, String)>> {
    let mut renames = Vec::new();
    for path in list_files(project_dir) {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stem) = file_name.strip_suffix(FROM_EXT) else {
            continue;
        };
        let new_name = format!("{}{}", stem, TO_EXT);
        let new_path = path.with_file_name(&new_name);
        fs::rename(&path, &new_path)
            .with_context(|| format!("重命名失败: {} -> {}", path.display(), new_path.display()))?;
        println!("🔁 重命名: {} -> {}", path.display(), new_path.display());
        renames.push((file_name.to_string(), new_name));
    }
    if renames.is_empty() {
        return Ok(renames);
    }

    for file in list_files(project_dir) {
        let result = rewrite_text_lossy(&file, |content| {
            let mut s = content.to_string();
            for (old, new) in &renames {
                if s.contains(old.as_str()) {
                    s = s.replace(old.as_str(), new);
                }
            }
            s
        });
        match result {
            Ok(true) => println!("🔁 已更新引用: {}", file.display()),
            Ok(false) => {}
            Err(e) => tracing::warn!(file = %file.display(), "跳过文件: {:#}", e),
        }
    }
    Ok(renames)
}
