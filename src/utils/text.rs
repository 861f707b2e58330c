use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|svg|head)[^>]*>.*?</(script|style|noscript|svg|head)>")
        .unwrap()
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
static BLANK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// 从HTML中提取<title>内容
pub fn extract_html_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_basic_entities(m.as_str()).trim().to_string())
        .filter(|title| !title.is_empty())
}

/// 将HTML转换为可供LLM阅读的纯文本
///
/// 只做轻量清洗：移除脚本与样式、剥离标签、解码常见实体、压缩空白。
pub fn html_to_text(html: &str) -> String {
    let without_blocks = SCRIPT_STYLE_RE.replace_all(html, " ");
    // 块级标签结束处补换行，避免段落粘连
    let with_breaks = without_blocks
        .replace("</p>", "</p>\n")
        .replace("</div>", "</div>\n")
        .replace("</li>", "</li>\n")
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n");
    let without_tags = TAG_RE.replace_all(&with_breaks, " ");
    let decoded = decode_basic_entities(&without_tags);

    let collapsed_spaces = SPACE_RE.replace_all(&decoded, " ");
    let lines: Vec<&str> = collapsed_spaces
        .lines()
        .map(|line| line.trim())
        .collect();
    let joined = lines.join("\n");
    BLANK_RE.replace_all(&joined, "\n\n").trim().to_string()
}

/// 解码常见HTML实体
fn decode_basic_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// 按字符数截断文本，截断时保留完整行并追加标记
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut result = String::new();
    let mut count = 0;
    for line in text.lines() {
        let line_chars = line.chars().count() + 1;
        if count + line_chars > max_chars {
            break;
        }
        result.push_str(line);
        result.push('\n');
        count += line_chars;
    }

    // 单行超长时退化为按字符截断
    if result.is_empty() {
        result = text.chars().take(max_chars).collect();
    }

    result.push_str("\n... (内容已截取) ...\n");
    result
}
