//! Display formatting shared by hosts.

/// `MM:SS` for a countdown value. Minutes are not wrapped at 60.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `MM:SS.hh` for a stopwatch value in hundredths of a second.
pub fn format_hundredths(hundredths: u64) -> String {
    let minutes = hundredths / 6000;
    let seconds = (hundredths % 6000) / 100;
    let rest = hundredths % 100;
    format!("{minutes:02}:{seconds:02}.{rest:02}")
}
