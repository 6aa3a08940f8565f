//! Human readable sizes

/// Placeholder shown while a size is unset or could not be probed
pub const UNKNOWN_SIZE: &str = "--.-";

/// Format a byte count with a binary unit, e.g. "12.40 MiB"
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        // compare what will be printed, so 1023.999 KiB shows as 1.00 MiB
        if (value * 100.0).round() < 102_400.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.2} {}", value, unit)
}
