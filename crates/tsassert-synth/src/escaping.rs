//! ECMA-404-compliant string escaping shared between the hand-rolled
//! stringify builder and emitted literal/template checks (§4.2, P4).

/// Produces a JS double-quoted string literal for `s`, escaping
/// exactly the set `JSON.stringify` escapes plus the two line
/// separators it additionally escapes in practice (` `, ` `).
pub fn js_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        let code = c as u32;
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            _ if code < 0x20 || code == 0x2028 || code == 0x2029 => {
                out.push_str(&format!("\\u{code:04x}"));
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Runtime helper emitted once per file when the stringify builder
/// path is used: escapes a string exactly as `JSON.stringify` would.
pub const JSON_ESCAPE_HELPER_NAME: &str = "_jsonEscapeString";
pub const JSON_ESCAPE_HELPER_SRC: &str = r#"function _jsonEscapeString(s) {
  let out = "\"";
  for (const ch of s) {
    const code = ch.codePointAt(0);
    if (ch === "\"") out += "\\\"";
    else if (ch === "\\") out += "\\\\";
    else if (ch === "\n") out += "\\n";
    else if (ch === "\r") out += "\\r";
    else if (ch === "\t") out += "\\t";
    else if (code === 0x08) out += "\\b";
    else if (code === 0x0c) out += "\\f";
    else if (code < 0x20 || code === 0x2028 || code === 0x2029) out += "\\u" + code.toString(16).padStart(4, "0");
    else out += ch;
  }
  return out + "\"";
}"#;

/// Runtime helper pairing with `_jsonEscapeString`: formats a single
/// leaf value (string, number, boolean, bigint, or anything with a
/// `toJSON`) the way `JSON.stringify` would, returning `undefined` for
/// `undefined` so callers can omit the key entirely.
pub const JSON_VALUE_HELPER_NAME: &str = "_jsonValue";
pub const JSON_VALUE_HELPER_SRC: &str = r#"function _jsonValue(x) {
  if (x === null) return "null";
  if (x === undefined) return undefined;
  const t = typeof x;
  if (t === "string") return _jsonEscapeString(x);
  if (t === "number") return Number.isFinite(x) ? String(x) : "null";
  if (t === "boolean") return x ? "true" : "false";
  if (t === "bigint") return String(x);
  if (typeof x.toJSON === "function") return _jsonValue(x.toJSON());
  if (Array.isArray(x)) return "[" + x.map((el) => _jsonValue(el) ?? "null").join(",") + "]";
  return JSON.stringify(x);
}"#;

#[cfg(test)]
#[path = "tests/escaping.rs"]
mod tests;
