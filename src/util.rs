//! Small utility helpers used across modules.

use std::sync::OnceLock;

use chrono::{SecondsFormat, Utc};
use regex::{Captures, Regex};

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values in a
/// single pass, so substituted values are never re-scanned. Unknown keys stay
/// literal.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
  let re = PLACEHOLDER
    .get_or_init(|| Regex::new(r"\{(\w+)\}").unwrap_or_else(|e| panic!("invalid placeholder pattern: {e}")));
  re.replace_all(tpl, |caps: &Captures| {
    pairs
      .iter()
      .find(|(k, _)| *k == &caps[1])
      .map(|(_, v)| v.to_string())
      .unwrap_or_else(|| caps[0].to_string())
  })
  .into_owned()
}

/// Current UTC time as RFC 3339 with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`.
pub fn now_iso() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Remove every double quote from an env value (`"my-project"` -> `my-project`).
pub fn strip_quotes(s: &str) -> String {
  s.replace('"', "")
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}
