use super::series::Field;

/// Maps a metric value to a whole-number progress percentage in [0, 100].
///
/// Loss progress is `1 - loss`, so lower loss reads as more progress. Accuracy maps
/// directly. NaN maps to 0.
pub fn to_progress_percent(field: Field, value: f64) -> u8 {
    let fraction = match field {
        Field::Loss => 1.0 - value,
        Field::Accuracy => value,
    };
    if fraction.is_nan() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}
