/// Number of leading characters kept visible by [`mask_secret`].
const VISIBLE_PREFIX: usize = 6;

/// Shorten a broker token for log output: the first few characters followed by
/// an ellipsis. Values too short to leave anything hidden are fully masked.
pub fn mask_secret(value: &str) -> String {
    if value.chars().count() <= VISIBLE_PREFIX * 2 {
        return "…".to_string();
    }
    let prefix: String = value.chars().take(VISIBLE_PREFIX).collect();
    format!("{}…", prefix)
}
