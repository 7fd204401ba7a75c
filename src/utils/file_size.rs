const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Binary-prefixed size with one decimal, e.g. `3.2 GB`. Plain bytes below 1 KB.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let exponent = ((bytes.ilog2() / 10) as usize).min(UNITS.len() - 1);
    let scaled = bytes as f64 / (1u64 << (10 * exponent)) as f64;
    format!("{:.1} {}", scaled, UNITS[exponent])
}

/// `loaded of total` readout shown under the progress bar.
pub fn format_transfer(loaded: u64, total: u64) -> String {
    format!("{} of {}", format_size(loaded.min(total)), format_size(total))
}
