//! Small string helpers shared by the api and components modules.

/// Create a simple slug from a string suitable for URLs and option values.
/// Lowercases the string, converts groups of non-alphanumeric chars to single hyphens,
/// and trims leading/trailing hyphens.
pub fn slugify<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref().to_lowercase();
    let mut out = String::with_capacity(s.len());
    let mut prev_dash = false;

    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            prev_dash = false;
        } else if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }

    out.trim_matches('-').to_string()
}

/// Format seconds as `m:ss` for the transport bar.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
