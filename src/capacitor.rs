//! Capacitor 配置提取：
//! 从 `capacitor.config.ts` 中找出 `const config: <Type> = { ... };`，
//! 把对象字面量粗略修整为 JSON 后解析。
//!
//! 只支持一个很窄的写法子集：键为裸标识符、值为字符串/数字/布尔/嵌套对象，
//! 且不含计算表达式与尾逗号。其它写法一律返回 `None`，调用方回退到目录约定。

use regex::Regex;
use serde_json::{Map, Value};

/// 从脚本文本中提取配置对象的能力
pub(crate) trait ConfigExtractor {
    fn try_extract_config(&self, text: &str) -> Option<Map<String, Value>>;
}

/// 基于正则 + JSON 修整的启发式实现
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct HeuristicExtractor;

impl ConfigExtractor for HeuristicExtractor {
    fn try_extract_config(&self, text: &str) -> Option<Map<String, Value>> {
        let assignment = Regex::new(r"(?s)const config:.*?=\s*(\{.*\});").ok()?;
        let bare_key = Regex::new(r"([A-Za-z0-9_]+):").ok()?;

        let literal = assignment.captures(text)?.get(1)?.as_str();
        let quoted = bare_key.replace_all(literal, "\"$1\":");
        let json = quoted.replace('\'', "\"");

        match serde_json::from_str::<Value>(&json) {
            Ok(Value::Object(map)) => Some(map),
            Ok(other) => {
                tracing::warn!(kind = ?other, "capacitor 配置不是对象，已忽略");
                None
            }
            Err(e) => {
                eprintln!("⚠️ 解析 capacitor 配置失败: {}", e);
                tracing::warn!(transformed = %json, "capacitor 配置修整后的文本");
                None
            }
        }
    }
}

/// 读取字符串字段
pub(crate) fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}
