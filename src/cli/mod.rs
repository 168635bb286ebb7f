//! Command implementations

pub mod ask;
pub mod customers;
pub mod products;
pub mod purchases;
pub mod report;
pub mod sell;
pub mod status;

/// Money formatting shared by the table views.
pub(crate) fn pretty_money(value: f64, currency: &str) -> String {
    if currency.is_empty() {
        format!("${value:.2}")
    } else {
        format!("{currency} {value:.2}")
    }
}

/// Truncate long cells so tables stay readable.
pub(crate) fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return text.chars().take(max_width).collect();
    }
    let head: String = text.chars().take(max_width - 3).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_money_formats_two_decimals() {
        assert_eq!(pretty_money(99.0, "USD"), "USD 99.00");
        assert_eq!(pretty_money(0.5, ""), "$0.50");
    }

    #[test]
    fn truncate_marks_shortened_cells() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a rather long cell", 10), "a rathe...");
    }
}
