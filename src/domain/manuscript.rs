//! Manuscript - 章节正文处理
//!
//! 章节正文以 HTML 存储（富文本编辑器输出）。生成上下文时需要纯文本摘录。

/// 去掉所有 `<...>` 标签，保留标签之间的文本
///
/// 未闭合的 `<` 之后的内容视为标签残片，直接丢弃。
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    text
}

/// 截取前 `max_chars` 个字符（按字符而非字节计数）
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_removes_tags() {
        let html = "<p>The sun set <em>slowly</em>.</p><p>Night came.</p>";
        assert_eq!(strip_html(html), "The sun set slowly.Night came.");
    }

    #[test]
    fn test_strip_html_keeps_plain_text() {
        assert_eq!(strip_html("no markup here"), "no markup here");
    }

    #[test]
    fn test_strip_html_drops_unclosed_tag() {
        assert_eq!(strip_html("before<div class=\"x"), "before");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let text = "كانت الشمس تغرب";
        assert_eq!(excerpt(text, 4), "كانت");
        assert_eq!(excerpt("short", 500), "short");
    }
}
