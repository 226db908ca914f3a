//! Goroutine count scraped from a Go process's `/debug/pprof/` index.
//!
//! The index renders one table row per profile:
//!
//! ```html
//! <tr><td>57</td><td><a href='goroutine?debug=1'>goroutine</a></td></tr>
//! ```
//!
//! Older Go releases leave the cells unclosed (`<td align=right>57<td><a ...>`).

use once_cell::sync::Lazy;
use regex::Regex;

use super::remote_output::OutputByVm;

static GOROUTINE_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<td[^>]*>\s*(\d+)\s*(?:</td>)?\s*<td[^>]*>\s*<a[^>]*>\s*goroutine\s*</a>")
        .expect("valid goroutine row regex")
});

/// Remote command fetching the pprof index served on `port`.
pub fn pprof_command(port: &str) -> String {
    format!("curl -s http://127.0.0.1:{port}/debug/pprof/")
}

pub fn goroutines_in_line(line: &str) -> Option<u64> {
    GOROUTINE_ROW
        .captures(line)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First goroutine count found, VMs and lines in insertion order.
pub fn goroutine_count(stdout: &OutputByVm) -> Option<u64> {
    stdout.lines().find_map(goroutines_in_line)
}
