//! Shell quoting for commands shown to the user

/// Quote a string for display in a shell command line.
///
/// Strings made only of safe characters are returned unchanged, everything
/// else is wrapped in single quotes.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    if s.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '=' | '/' | '.' | ':' | ','))
    {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', r"'\''"))
}
