//! Pre-processing of raw model output.
//!
//! Models like to wrap JSON in Markdown code fences (```` ```json ... ``` ````).
//! Every fence marker, together with any info string directly attached to
//! it, is replaced by a newline so the payload underneath can be parsed.

use regex_lite::Regex;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[a-zA-Z0-9_-]*").expect("fence pattern is valid"));

/// Remove code-fence markers. Applying it twice is the same as applying it once.
pub fn strip_fences(input: &str) -> String {
    FENCE.replace_all(input, "\n").into_owned()
}

/// Fence stripping followed by whitespace trimming: the form in which the
/// orchestrator inspects, logs and records every model reply.
pub fn clean_reply(input: &str) -> String {
    strip_fences(input).trim().to_string()
}
