use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy};

pub trait Sign {
    fn negative(&self) -> bool;
    fn sign(&self) -> Ordering;
}

impl Sign for Decimal {
    fn negative(&self) -> bool {
        self.is_sign_negative() && !self.is_zero()
    }

    fn sign(&self) -> Ordering {
        if self.negative() {
            Ordering::Less
        } else if self.is_zero() {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }
}

/// Two decimal places, e.g. `12.5` → `12.50`
pub fn format_price(value: Decimal) -> String {
    let value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{value:.2}")
}

/// Signed percentage badge, e.g. `+20.00%` / `-3.10%`
pub fn format_percent(value: Decimal) -> String {
    let text = format_price(value);
    if value.negative() {
        format!("{text}%")
    } else {
        format!("+{text}%")
    }
}

/// Format volume to short format
/// Example: 1234567 → 1.23M
pub fn format_volume(volume: u64) -> String {
    if volume == 0 {
        return "--".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let volume_f = volume as f64;

    if volume >= 1_000_000_000 {
        format!("{:.2}B", volume_f / 1_000_000_000.0)
    } else if volume >= 1_000_000 {
        format!("{:.2}M", volume_f / 1_000_000.0)
    } else if volume >= 1_000 {
        format!("{:.2}K", volume_f / 1_000.0)
    } else {
        volume.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_volume_short() {
        assert_eq!(format_volume(0), "--");
        assert_eq!(format_volume(532), "532");
        assert_eq!(format_volume(12_300), "12.30K");
        assert_eq!(format_volume(3_456_700), "3.46M");
        assert_eq!(format_volume(9_876_543_210), "9.88B");
    }

    #[test]
    fn format_volume_boundary_values() {
        assert_eq!(format_volume(999), "999");
        assert_eq!(format_volume(1_000), "1.00K");
        assert_eq!(format_volume(999_999), "1000.00K");
        assert_eq!(format_volume(1_000_000), "1.00M");
    }

    #[test]
    fn prices_have_two_decimals() {
        assert_eq!(format_price(dec!(12)), "12.00");
        assert_eq!(format_price(dec!(12.5)), "12.50");
        assert_eq!(format_price(dec!(0.125)), "0.13");
    }

    #[test]
    fn percent_badge_is_signed() {
        assert_eq!(format_percent(dec!(20.00)), "+20.00%");
        assert_eq!(format_percent(dec!(0)), "+0.00%");
        assert_eq!(format_percent(dec!(-3.1)), "-3.10%");
    }

    #[test]
    fn sign_treats_negative_zero_as_zero() {
        assert_eq!(dec!(-0.00).sign(), Ordering::Equal);
        assert_eq!(dec!(-0.01).sign(), Ordering::Less);
        assert_eq!(dec!(0.01).sign(), Ordering::Greater);
    }
}
