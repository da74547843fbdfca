/// Course rating shown in the catalog: arithmetic mean of all review
/// ratings rounded to one decimal place. A course without reviews is 0.0.
pub(crate) fn rounded_mean(ratings: &[i16]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|rating| i64::from(*rating)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}
