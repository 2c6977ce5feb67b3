//! Conversion of flag names into environment variable keys.
//!
//! Keys only ever contain `A-Z`, `0-9` and `_`:
//!
//! - Non-ASCII characters are dropped.
//! - Uppercase letters, digits and underscores are preserved.
//! - Lowercase letters are changed to uppercase.
//! - Hyphens are changed to underscores.
//! - All other characters are dropped.
//! - An underscore is prepended when the key would otherwise begin with a
//!   digit.
//!
//! A non-empty prefix is rewritten the same way and joined to the name with a
//! single underscore.

/// Transforms a flag name, plus an optional prefix, into an environment key.
///
/// # Examples
///
/// ```
/// use envflag::rewrite;
///
/// assert_eq!(rewrite("myapp", "listen-addr"), "MYAPP_LISTEN_ADDR");
/// assert_eq!(rewrite("", "0a"), "_0A");
/// ```
#[must_use]
pub fn rewrite(prefix: &str, name: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + name.len() + 1);
    if !prefix.is_empty() {
        rewrite_into(&mut key, prefix);
        key.push('_');
    }
    rewrite_into(&mut key, name);
    key
}

fn rewrite_into(out: &mut String, segment: &str) {
    for ch in segment.chars() {
        let mapped = match ch {
            'A'..='Z' | '_' => ch,
            'a'..='z' => ch.to_ascii_uppercase(),
            '0'..='9' => {
                // keys cannot begin with a digit
                if out.is_empty() {
                    out.push('_');
                }
                ch
            }
            '-' => '_',
            _ => continue,
        };
        out.push(mapped);
    }
}
