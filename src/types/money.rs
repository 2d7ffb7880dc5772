//! Money formatting shared by reports, anomaly texts and rejection messages

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount with two decimal places, rounding half away from zero
///
/// Example: 0.999 -> "1.00", 12.345 -> "12.35", -1000 -> "-1000.00"
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
