//! Output grouping for converted messages.

/// Splits `msg` into groups of `size` symbols separated by single spaces.
/// The last group may be shorter. A `size` of 0 leaves `msg` ungrouped.
///
/// # Parameters
/// - `msg`: Symbols to group.
/// - `size`: Symbols per group.
///
/// # Returns
/// The grouped string, e.g. `"QVPQS OKOIL PUBKJ"`.
pub fn group_symbols(msg: &str, size: usize) -> String {
    if size == 0 {
        return msg.to_string();
    }
    let mut out = String::with_capacity(msg.len() + msg.len() / size);
    for (i, ch) in msg.chars().enumerate() {
        if i > 0 && i % size == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
