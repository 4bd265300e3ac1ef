/// Percent change against the previous row.
///
/// `out[0]` is undefined. A missing value on either side, or a zero prior
/// price, propagates as undefined.
pub fn daily_return(prices: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(prices.len());
    let mut last_price: Option<f64> = None;

    for &price in prices {
        let ret = match last_price {
            Some(prev) if prev != 0.0 && !prev.is_nan() && !price.is_nan() => price / prev - 1.0,
            _ => f64::NAN,
        };
        out.push(ret);
        last_price = Some(price);
    }
    out
}
