//! Tiny markdown-ish formatter for the content view.
//!
//! Not a markdown parser: a fixed chain of regex rewrites covering what the
//! study content uses (bold, italic, `#`/`##`/`###` headings, `•` bullets,
//! line breaks). Input is HTML-escaped first so agent text cannot inject markup.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

struct Rules {
  bold: Regex,
  italic: Regex,
  h3: Regex,
  h2: Regex,
  h1: Regex,
  bullet: Regex,
  list_item: Regex,
}

fn rules() -> &'static Rules {
  static RULES: OnceLock<Rules> = OnceLock::new();
  RULES.get_or_init(|| {
    let re = |p: &str| Regex::new(p).unwrap_or_else(|e| panic!("invalid built-in pattern {p}: {e}"));
    Rules {
      bold: re(r"\*\*(.*?)\*\*"),
      italic: re(r"\*(.*?)\*"),
      h3: re(r"#{3}\s+(.*?)(<br />|$)"),
      h2: re(r"#{2}\s+(.*?)(<br />|$)"),
      h1: re(r"#\s+(.*?)(<br />|$)"),
      bullet: re(r"•\s+(.*?)(<br />|$)"),
      list_item: re(r"(<li>.*?</li>)"),
    }
  })
}

fn escape_html(s: &str) -> String {
  s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Convert study content to an HTML fragment.
pub fn format_content(content: &str) -> String {
  if content.is_empty() {
    return String::new();
  }
  let r = rules();
  let out = escape_html(content);
  let out = r.bold.replace_all(&out, "<strong>${1}</strong>");
  let out = r.italic.replace_all(&out, "<em>${1}</em>");
  let out = out.replace('\n', "<br />");
  let out = r.h3.replace_all(&out, "<h3>${1}</h3>");
  let out = r.h2.replace_all(&out, "<h2>${1}</h2>");
  let out = r.h1.replace_all(&out, "<h1>${1}</h1>");
  let out = r.bullet.replace_all(&out, "<li>${1}</li>");
  r.list_item.replace_all(&out, "<ul>${1}</ul>").into_owned()
}

/// Standalone HTML page wrapping `format_content`, used for exports.
pub fn render_page(title: &str, content: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<div class=\"ai-content\">{}</div>\n</body>\n</html>\n",
    escape_html(title),
    format_content(content)
  )
}

/// Write an exported page to disk, replacing any existing file.
pub async fn write_page(path: impl AsRef<Path>, page: &str) -> std::io::Result<()> {
  tokio::fs::write(path, page).await
}
