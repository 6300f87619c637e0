//! Text rendering of raw IPv6 addresses.

use std::fmt::Write;

/// Renders 16 raw octets as shortened colon-hex text.
///
/// Groups are printed in lowercase without leading zeros, and the longest run
/// of all-zero groups (the leftmost one on a tie) collapses to `::`. A run of
/// a single zero group collapses too.
///
/// ```text
/// 2001:0db8:0000:0000:0000:0000:0000:0001  ->  2001:db8::1
/// ```
pub fn render_ipv6(octets: &[u8; 16]) -> String {
    let mut groups = [0u16; 8];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = u16::from_be_bytes([octets[2 * i], octets[2 * i + 1]]);
    }

    let (run_start, run_len) = longest_zero_run(&groups);

    let mut text = String::with_capacity(39);
    let mut i = 0;
    while i < groups.len() {
        if run_len > 0 && i == run_start {
            text.push_str("::");
            i += run_len;
            continue;
        }
        if i > 0 && !text.ends_with(':') {
            text.push(':');
        }
        let _ = write!(text, "{:x}", groups[i]);
        i += 1;
    }
    text
}

/// Start and length of the first longest run of zero groups; length 0 if none.
fn longest_zero_run(groups: &[u16; 8]) -> (usize, usize) {
    let mut best = (0, 0);
    let mut current_start = 0;
    let mut current_len = 0;

    for (i, &group) in groups.iter().enumerate() {
        if group == 0 {
            if current_len == 0 {
                current_start = i;
            }
            current_len += 1;
            if current_len > best.1 {
                best = (current_start, current_len);
            }
        } else {
            current_len = 0;
        }
    }
    best
}
