//! Exponential Moving Average.
//!
//! α = 2/(span+1), seeded with the first value, then
//! EMA[i] = x[i]*α + EMA[i-1]*(1-α). Every position has a value.

pub fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());

    for (i, &x) in values.iter().enumerate() {
        let ema = if i == 0 {
            x
        } else {
            x * alpha + out[i - 1] * (1.0 - alpha)
        };
        out.push(ema);
    }

    out
}
