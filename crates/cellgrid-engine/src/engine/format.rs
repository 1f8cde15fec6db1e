/// Format a number for display: shortest representation that round-trips,
/// with no trailing zeros (`10`, `0.5`, `-3.25`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n == 0.0 {
        // Avoid printing "-0".
        "0".to_string()
    } else {
        format!("{}", n)
    }
}
