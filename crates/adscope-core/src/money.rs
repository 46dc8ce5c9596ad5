//! Micro-currency formatting

/// Currency symbol prefixed to every formatted amount
pub const CURRENCY_SYMBOL: &str = "R$";

/// Micros per currency unit
pub const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// Format a micro-currency amount for display, e.g. `1_500_000` -> `"R$ 1.50"`.
///
/// A missing amount formats as zero. Integer micro amounts are passed as `f64`
/// so the same function covers `cost_micros` (int64) and `average_cpc` (double).
pub fn format_money(micros: Option<f64>) -> String {
    let units = micros.unwrap_or(0.0) / MICROS_PER_UNIT;
    format!("{} {:.2}", CURRENCY_SYMBOL, units)
}
