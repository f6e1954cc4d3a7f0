/// Bold emphasis and code markers removed from every text token.
const MARKERS: [&str; 2] = ["**", "`"];

/// Removes `**` emphasis and backtick code markup, keeping the text they
/// wrap. Underscore forms are left alone: `__init__.py` and `snake_case`
/// names are far more common in incident text than `__emphasis__`.
pub fn strip_inline(text: &str) -> String {
    MARKERS
        .iter()
        .fold(text.to_string(), |acc, marker| acc.replace(marker, ""))
}
