//! Log sanitization for PII filtering.
//!
//! String-based redaction applied to formatted log output before it reaches
//! the sink:
//! - SSN-like identifiers
//! - Medical record numbers (MRNs)
//! - Email addresses
//! - Phone numbers
//!
//! Patient names cannot be pattern-matched; the primary protection for them
//! is that no logging call ever formats one. This module is the fallback for
//! identifiers that can.
//!
//! # Performance
//!
//! Even with linear-time regex engines, scanning and allocating on large
//! inputs can be expensive. `sanitize()` enforces a maximum input size (see
//! `LABSCOPE_SANITIZE_MAX_BYTES`).

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// Compiled patterns for PII detection and sanitization.
static PII_PATTERNS: OnceLock<PiiPatterns> = OnceLock::new();

/// Maximum number of bytes to sanitize per call.
///
/// Defaults to 16 KiB; can be overridden via `LABSCOPE_SANITIZE_MAX_BYTES`.
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// A compiled PII pattern with its replacement text.
struct PiiPattern {
    regex: Regex,
    replacement: &'static str,
}

struct PiiPatterns {
    set: RegexSet,
    patterns: Vec<PiiPattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    // Ensure we don't panic on UTF-8 boundaries.
    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("LABSCOPE_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static PiiPatterns {
    PII_PATTERNS.get_or_init(|| {
        let rules: Vec<(&'static str, &'static str)> = vec![
            // SSN-like patterns (xxx-xx-xxxx)
            (r"\b\d{3}-\d{2}-\d{4}\b", "[REDACTED-SSN]"),
            // MRN patterns (common formats)
            (r"\bMRN[:\s]?\d{6,10}\b", "[REDACTED-MRN]"),
            // Email patterns (bounded labels; case-insensitive)
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            // Phone patterns
            (
                r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b",
                "[REDACTED-PHONE]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let patterns = rules
            .into_iter()
            .map(|(pattern, replacement)| PiiPattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        PiiPatterns { set, patterns }
    })
}

/// Sanitize a string by replacing PII patterns.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();

    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    // Fast path: single scan for "any match".
    if !patterns.set.is_match(prefix) {
        let mut out = prefix.to_string();
        if truncated {
            out.push_str(" [TRUNCATED]");
        }
        return out;
    }

    // Only apply patterns that matched the original prefix.
    let matched: Vec<usize> = patterns.set.matches(prefix).into_iter().collect();
    let mut result = prefix.to_string();
    for idx in matched {
        let pattern = &patterns.patterns[idx];
        result = pattern
            .regex
            .replace_all(&result, pattern.replacement)
            .to_string();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check if a string contains potential PII.
#[must_use]
pub fn contains_pii(input: &str) -> bool {
    let patterns = get_patterns();
    let (prefix, _truncated) = truncate_to_char_boundary(input, max_sanitize_bytes());
    patterns.set.is_match(prefix)
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// before it is written to the underlying sink.
///
/// Keeps sanitization centralized: no need to call `sanitize()` at every
/// callsite.
#[derive(Debug)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M> Clone for SanitizingMakeWriter<M>
where
    M: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let line_str = String::from_utf8_lossy(&line);
            let sanitized = sanitize(&line_str);
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // Prevent unbounded buffering if the formatter writes a huge line
        // with no newlines.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if hard_cap > 0 && self.buffer.len() > hard_cap {
            let s = String::from_utf8_lossy(&self.buffer).to_string();
            let sanitized = sanitize(&s);
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n[TRUNCATED]\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let s = String::from_utf8_lossy(&self.buffer);
            let sanitized = sanitize(&s);
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_sanitize_ssn() {
        let sanitized = sanitize("SSN: 123-45-6789");
        assert!(sanitized.contains("[REDACTED-SSN]"));
        assert!(!sanitized.contains("123-45-6789"));
    }

    #[test]
    fn test_sanitize_mrn() {
        let sanitized = sanitize("MRN:12345678 found");
        assert!(sanitized.contains("[REDACTED-MRN]"));
    }

    #[test]
    fn test_sanitize_email() {
        let sanitized = sanitize("Contact: patient@hospital.com");
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
        assert!(!sanitized.contains("hospital.com"));
    }

    #[test]
    fn test_sanitize_phone() {
        let sanitized = sanitize("Callback 555-867-5309 requested");
        assert!(sanitized.contains("[REDACTED-PHONE]"));
    }

    #[test]
    fn test_contains_pii() {
        assert!(contains_pii("SSN: 123-45-6789"));
        assert!(contains_pii("patient@hospital.com"));
        assert!(!contains_pii("history fetch failed: connection refused"));
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let input = "prefix patient@hospital.com suffix";
        let sanitized = sanitize_with_limit(input, 16);
        assert!(sanitized.contains("[TRUNCATED]"));
    }

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    struct SinkGuard(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SinkGuard {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedSink {
        type Writer = SinkGuard;

        fn make_writer(&'a self) -> Self::Writer {
            SinkGuard(self.0.clone())
        }
    }

    #[test]
    fn test_writer_redacts_before_sink() {
        let sink = SharedSink::default();
        let make_writer = SanitizingMakeWriter::new(sink.clone());

        let mut writer = make_writer.make_writer();
        writer
            .write_all(b"report sent to patient@hospital.com for MRN:12345678\n")
            .unwrap();
        writer.flush().unwrap();

        let written = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(written.contains("[REDACTED-EMAIL]"));
        assert!(written.contains("[REDACTED-MRN]"));
        assert!(!written.contains("patient@hospital.com"));
    }
}
