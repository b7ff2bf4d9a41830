/// Fold a periodic sequence into one representative cycle.
///
/// Returns `length` values where entry `p` is the mean of
/// `values[p], values[p + length], values[p + 2 * length], ...`, skipping
/// `None`. A phase with no present value stays `None`. A trailing partial
/// cycle is averaged in as far as it goes.
pub fn average_over_cycle(values: &[Option<f64>], length: usize) -> Vec<Option<f64>> {
    if length == 0 {
        return Vec::new();
    }

    let mut total = vec![0.0f64; length];
    let mut count = vec![0usize; length];
    for (k, value) in values.iter().enumerate() {
        if let Some(v) = value {
            total[k % length] += v;
            count[k % length] += 1;
        }
    }

    total
        .into_iter()
        .zip(count)
        .map(|(sum, n)| if n > 0 { Some(sum / n as f64) } else { None })
        .collect()
}
