//! Safe-range classification.

/// Returns true iff `min <= value <= max`.
pub fn classify(value: f64, min: f64, max: f64) -> bool {
    min <= value && value <= max
}
