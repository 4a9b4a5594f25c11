//! Search-volume normalization for chart scaling.

/// Convert a free-form search-volume string into a non-negative magnitude.
///
/// The model reports volume as anything from an exact count ("12,500") to a
/// range ("1k-10k") to a qualitative band ("High"). Charting needs a single
/// comparable number, so this maps bands to fixed representative magnitudes
/// and averages ranges. The conversion is lossy on purpose and total: any
/// string without a usable numeral yields 0.
pub fn normalize_volume(raw: &str) -> f64 {
    let s = raw.trim().to_lowercase();
    if s.is_empty() {
        return 0.0;
    }
    if s.contains("unavailable") || s.contains("n/a") || s.contains("unknown") {
        return 0.0;
    }

    if s.contains("high") {
        return 80.0;
    }
    if s.contains("medium") {
        return 50.0;
    }
    if s.contains("low") {
        return 20.0;
    }

    let mut clean = s.replace(',', "");

    if clean.contains('-') {
        let parts: Vec<&str> = clean.split('-').collect();
        if parts.len() == 2 {
            let mean = (normalize_volume(parts[0]) + normalize_volume(parts[1])) / 2.0;
            return mean.round();
        }
    }

    let mut multiplier = 1.0;
    if clean.contains('k') {
        multiplier = 1_000.0;
        clean = clean.replacen('k', "", 1);
    } else if clean.contains('m') {
        multiplier = 1_000_000.0;
        clean = clean.replacen('m', "", 1);
    } else if clean.contains('+') {
        clean = clean.replacen('+', "", 1);
    }

    match leading_number(&clean) {
        Some(n) => n * multiplier,
        None => 0.0,
    }
}

/// Parse the leading numeral of a string, ignoring whatever trails it.
fn leading_number(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in t.char_indices() {
        if c.is_ascii_digit() {
            end = i + c.len_utf8();
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    t[..end].parse::<f64>().ok()
}
