//! 图标与横幅生成模块：
//! - 按约定文件名在资源目录中查找源图
//! - 校验形状（图标须为正方形，横幅宽高比须在窗口内）
//! - 以 Lanczos3 缩放到固定尺寸并写入 `Assets/`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage};

/// 图标输出：文件名 -> (宽, 高)
pub(crate) const ICON_SPECS: [(&str, u32, u32); 5] = [
    ("LockScreenLogo.scale-200.png", 48, 48),
    ("Square44x44Logo.scale-200.png", 88, 88),
    ("Square44x44Logo.targetsize-24_altform-unplated.png", 24, 24),
    ("Square150x150Logo.scale-200.png", 300, 300),
    ("StoreLogo.png", 50, 50),
];

/// 横幅输出：文件名 -> (宽, 高)
pub(crate) const BANNER_SPECS: [(&str, u32, u32); 2] = [
    ("SplashScreen.scale-200.png", 1240, 600),
    ("Wide310x150Logo.scale-200.png", 620, 300),
];

pub(crate) const ICON_CANDIDATES: [&str; 8] = [
    "icon.png",
    "icon.jpg",
    "icon.jpeg",
    "logo.png",
    "logo.jpg",
    "logo.jpeg",
    "icon-only.png",
    "icon-only.jpg",
];

pub(crate) const BANNER_CANDIDATES: [&str; 3] = ["banner.png", "banner.jpg", "banner.jpeg"];

const BANNER_TARGET_RATIO: f64 = 2.067;
const BANNER_TOLERANCE: f64 = 1.5;

/// 资源目录中按顺序找到的第一个存在的候选文件
pub(crate) fn find_first(dir: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().map(|c| dir.join(c)).find(|p| {
        tracing::debug!(candidate = %p.display(), "检查候选图片");
        p.is_file()
    })
}

/// 横幅宽高比校验：2.067 ± 1.5，高为 0 时不合法
pub(crate) fn is_valid_aspect_ratio(width: u32, height: u32) -> bool {
    if height == 0 {
        return false;
    }
    let ratio = width as f64 / height as f64;
    (BANNER_TARGET_RATIO - BANNER_TOLERANCE..=BANNER_TARGET_RATIO + BANNER_TOLERANCE).contains(&ratio)
}

/// 处理结果
#[derive(Debug, PartialEq)]
pub(crate) enum ImageOutcome {
    /// 已生成的文件
    Written(Vec<PathBuf>),
    /// 未找到源图
    Missing,
    /// 源图形状不符，附带宽高
    Rejected(u32, u32),
}

/// 生成图标：源图须为正方形
pub(crate) fn generate_icons(resources_dir: &Path, out_dir: &Path) -> Result<ImageOutcome> {
    let Some(src) = find_first(resources_dir, &ICON_CANDIDATES) else {
        return Ok(ImageOutcome::Missing);
    };
    println!("✅ 找到图标: {}", src.display());
    let img = open_image(&src)?;
    let (w, h) = (img.width(), img.height());
    if w != h {
        return Ok(ImageOutcome::Rejected(w, h));
    }
    resize_all(&img, &ICON_SPECS, out_dir).map(ImageOutcome::Written)
}

/// 生成横幅：源图宽高比须在允许窗口内
pub(crate) fn generate_banners(resources_dir: &Path, out_dir: &Path) -> Result<ImageOutcome> {
    let Some(src) = find_first(resources_dir, &BANNER_CANDIDATES) else {
        return Ok(ImageOutcome::Missing);
    };
    println!("✅ 找到横幅: {}", src.display());
    let img = open_image(&src)?;
    let (w, h) = (img.width(), img.height());
    if !is_valid_aspect_ratio(w, h) {
        return Ok(ImageOutcome::Rejected(w, h));
    }
    resize_all(&img, &BANNER_SPECS, out_dir).map(ImageOutcome::Written)
}

fn open_image(path: &Path) -> Result<DynamicImage> {
    // 按文件内容识别格式，扩展名与实际编码不符时也能读取
    let reader = image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .with_context(|| format!("读取图片失败: {}", path.display()))?;
    reader.decode().with_context(|| format!("解码图片失败: {}", path.display()))
}

fn resize_all(img: &DynamicImage, specs: &[(&str, u32, u32)], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(specs.len());
    for (file_name, w, h) in specs {
        let dest = out_dir.join(file_name);
        img.resize_exact(*w, *h, FilterType::Lanczos3)
            .save(&dest)
            .with_context(|| format!("保存图片失败: {}", dest.display()))?;
        println!("✅ 已生成: {} ({}x{})", dest.display(), w, h);
        written.push(dest);
    }
    Ok(written)
}
