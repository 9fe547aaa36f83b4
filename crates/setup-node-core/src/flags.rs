/// Interpret a string-typed boolean input.
///
/// `"true"` and `"false"` are matched case-insensitively; an empty or
/// unrecognised value yields `default`.
#[must_use]
pub fn parse_flag(raw: &str, default: bool) -> bool {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        true
    } else if raw.eq_ignore_ascii_case("false") {
        false
    } else {
        default
    }
}
