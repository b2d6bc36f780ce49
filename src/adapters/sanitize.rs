//! Log redaction for profile attributes.
//!
//! Profiles contain personal data (age, body measurements, income, city).
//! Call sites avoid logging them, and this module is the fallback: every
//! formatted log line passes through `redact()` before reaching the sink.
//!
//! Both `key=value` (tracing fields, Debug output) and `"key": value` (JSON)
//! shapes are matched. Input longer than `PREMIUM_REDACT_MAX_BYTES`
//! (default 16 KiB) is truncated before scanning.

use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static RULES: OnceLock<Vec<RedactionRule>> = OnceLock::new();

const DEFAULT_REDACT_MAX_BYTES: usize = 16 * 1024;

struct RedactionRule {
    regex: Regex,
    replacement: &'static str,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_redact_bytes() -> usize {
    std::env::var("PREMIUM_REDACT_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_REDACT_MAX_BYTES)
}

fn rules() -> &'static [RedactionRule] {
    RULES.get_or_init(|| {
        let specs: [(&str, &'static str); 2] = [
            // Numeric attributes: age=30, weight_kg: 90.0, "income_lpa":12
            (
                r#"(?i)"?\b(age|weight_kg|weight|height_m|height|income_lpa|income|bmi)\b"?(\s*[=:]\s*)-?\d+(?:\.\d+)?(?:e[+-]?\d+)?"#,
                "$1$2[REDACTED]",
            ),
            // City: city=Pune, city: "New Delhi", "city":"Pune"
            (
                r#"(?i)"?\b(city)\b"?(\s*[=:]\s*)(?:"[^"\n]*"|[^\s,}\)]+)"#,
                "$1$2[REDACTED]",
            ),
        ];
        specs
            .into_iter()
            .map(|(pattern, replacement)| RedactionRule {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect()
    })
}

/// Replace profile attribute values with `[REDACTED]`.
#[must_use]
pub fn redact(input: &str) -> String {
    redact_with_limit(input, max_redact_bytes())
}

fn redact_with_limit(input: &str, max_bytes: usize) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut out = prefix.to_string();
    for rule in rules() {
        if rule.regex.is_match(&out) {
            out = rule.regex.replace_all(&out, rule.replacement).into_owned();
        }
    }

    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// Whether `input` contains a profile attribute value.
#[cfg(test)]
fn contains_profile_data(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_redact_bytes());
    rules().iter().any(|r| r.regex.is_match(prefix))
}

/// `MakeWriter` wrapper that redacts each formatted log line.
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by `RedactingMakeWriter`.
pub struct RedactingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> RedactingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn write_redacted(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(redact(&text).as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_redacted(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single enormous line without a newline is flushed as-is (redacted
        // and truncated) instead of growing the buffer without bound.
        if self.buffer.len() > max_redact_bytes().saturating_mul(2) {
            let pending = std::mem::take(&mut self.buffer);
            self.write_redacted(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_redacted(&pending)?;
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_redacts_key_value_fields() {
        let out = redact("quote requested age=30 weight_kg=90.5 height_m=1.75 income_lpa=12");
        assert!(!out.contains("30"));
        assert!(!out.contains("90.5"));
        assert!(!out.contains("1.75"));
        assert!(out.contains("age=[REDACTED]"));
        assert!(out.contains("income_lpa=[REDACTED]"));
    }

    #[test]
    fn test_redacts_json_and_debug_shapes() {
        let json = redact(r#"{"bmi":29.38,"city":"Mumbai","occupation":"private_job"}"#);
        assert!(!json.contains("29.38"));
        assert!(!json.contains("Mumbai"));
        assert!(json.contains("private_job"));

        let debug = redact(r#"UserProfile { age: 44, city: "New Delhi" }"#);
        assert!(!debug.contains("44"));
        assert!(!debug.contains("New Delhi"));
    }

    #[test]
    fn test_leaves_ordinary_text_alone() {
        let line = "Loaded premium model from models (3 classes)";
        assert_eq!(redact(line), line);
        assert!(!contains_profile_data(line));
        assert!(contains_profile_data("bmi=22.1"));
    }

    #[test]
    fn test_does_not_match_inside_words() {
        let line = "stage=predicting pages=3";
        assert_eq!(redact(line), line);
    }

    #[test]
    fn test_truncates_large_inputs() {
        let out = redact_with_limit("income=1234 and a long tail of text", 12);
        assert!(out.ends_with("[TRUNCATED]"));
        assert!(!out.contains("1234"));
    }

    #[test]
    fn test_writer_redacts_per_line() {
        let mut sink = Vec::new();
        {
            let mut writer = RedactingWriter::new(&mut sink);
            writer.write_all(b"first age=").expect("write");
            writer.write_all(b"52\nsecond line\n").expect("write");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(sink).expect("utf8");
        assert_eq!(text, "first age=[REDACTED]\nsecond line\n");
    }
}
