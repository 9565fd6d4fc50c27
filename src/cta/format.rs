/// Compact subscriber count: `1000 -> "1K"`, `1500 -> "1.5K"`, `999 -> "999"`.
///
/// Non-integral thousands keep one decimal. Halfway cases (`1250 -> "1.3K"`) round up.
pub fn format_sub_count(count: u64) -> String {
    if count < 1000 {
        return count.to_string();
    }
    if count.is_multiple_of(1000) {
        return format!("{}K", count / 1000);
    }
    if count.is_multiple_of(250) && !count.is_multiple_of(500) {
        // `count / 1000` is an exact binary tie here; `{:.1}` would round it to even.
        let tenths = count / 100 + 1;
        return format!("{}.{}K", tenths / 10, tenths % 10);
    }
    format!("{:.1}K", count as f64 / 1000.0)
}

/// `"{formatted} subscribers"`.
pub fn subscribers_label(count: u64) -> String {
    format!("{} subscribers", format_sub_count(count))
}

#[cfg(test)]
#[path = "../../tests/unit/cta/format.rs"]
mod tests;
