pub fn geometric_mean(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let product: f64 = returns.iter().map(|r| 1.0 + r).product();
    product.powf(1.0 / returns.len() as f64) - 1.0
}

pub fn arithmetic_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population (not sample) standard deviation.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = arithmetic_mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Rounds to whole currency units, halves away from zero.
pub fn round_money(amount: f64) -> f64 {
    amount.round()
}
