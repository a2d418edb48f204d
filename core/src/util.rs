use rand::Rng;

/// Timestamp format used for created/changed/due dates
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time as a sortable `YYYY-MM-DD HH:MM:SS` string
pub fn current_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Random 64-character uppercase hex token used for note ids, body
/// delimiters and public share tokens.
pub fn create_id() -> String {
    let mut rng = rand::thread_rng();
    format!("{:032X}{:032X}", rng.gen::<u128>(), rng.gen::<u128>())
}

/// Strips line breaks and surrounding whitespace so the value fits on one
/// `KEY value` line.
pub fn sanitize_single_line(unsafe_value: &str) -> String {
    unsafe_value
        .replace(['\n', '\r'], "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_id_shape() {
        let id = create_id();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        assert_ne!(id, create_id());
    }

    #[test]
    fn test_sanitize_single_line() {
        assert_eq!(sanitize_single_line("  a\r\nb \n"), "ab");
        assert_eq!(sanitize_single_line("plain"), "plain");
    }

    #[test]
    fn test_timestamp_is_sortable_shape() {
        let ts = current_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}
