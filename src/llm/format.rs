//! URL 构建与响应文本整理工具

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim().trim_end_matches('/').to_string();

    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let fixed_rest = rest.replace("//", "/");
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 构建 Gemini generateContent 端点
///
/// 兼容以下几种 base_url 写法：
/// - `https://generativelanguage.googleapis.com`
/// - `https://generativelanguage.googleapis.com/v1beta`
/// - 已经是完整的 `...:generateContent` 地址
pub fn build_generate_endpoint(base_url: &str, model: &str) -> String {
    let url = fix_base_url(base_url);
    let model = model.trim().trim_start_matches("models/");

    if url.ends_with(":generateContent") {
        url
    } else if url.ends_with("/v1beta") || url.ends_with("/v1") {
        format!("{}/models/{}:generateContent", url, model)
    } else {
        format!("{}/v1beta/models/{}:generateContent", url, model)
    }
}

/// 去掉模型输出外层的 markdown 代码块
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_base_url() {
        assert_eq!(
            fix_base_url("https://generativelanguage.googleapis.com/"),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(
            fix_base_url("https://generativelanguage.googleapis.com//v1beta"),
            "https://generativelanguage.googleapis.com/v1beta"
        );
    }

    #[test]
    fn test_build_generate_endpoint() {
        assert_eq!(
            build_generate_endpoint("https://generativelanguage.googleapis.com", "gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            build_generate_endpoint("http://127.0.0.1:9000/v1beta/", "models/gemini-pro"),
            "http://127.0.0.1:9000/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(
            build_generate_endpoint("http://proxy/custom/path:generateContent", "ignored"),
            "http://proxy/custom/path:generateContent"
        );
    }

    #[test]
    fn test_strip_json_fences() {
        assert_eq!(strip_json_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_json_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_json_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }
}
