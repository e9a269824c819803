/// Characters the backend accepts in a password besides ASCII letters and digits.
const PASSWORD_SPECIALS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

/// Characters rejected anywhere in an uploaded file name.
const UNSAFE_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

const MAX_FILENAME_LEN: usize = 255;

/// Validates a username.
/// Rules:
/// - 3-20 characters
/// - Only ASCII letters, digits and underscores
pub fn is_valid_username(username: &str) -> bool {
    (3..=20).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates a signup password.
/// Rules:
/// - At least 8 characters
/// - At least one lowercase letter, one uppercase letter and one digit
/// - Only ASCII letters, digits and `@$!%*?&`
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(&c))
}

/// Returns the reason a signup form would be rejected, if any.
pub fn signup_rejection(username: &str, password: &str) -> Option<&'static str> {
    if !is_valid_username(username) {
        return Some(
            "Username must be 3-20 characters long and contain only letters, numbers, and underscores",
        );
    }
    if !is_valid_password(password) {
        return Some(
            "Password must be at least 8 characters long and contain at least one uppercase letter, one lowercase letter, and one number",
        );
    }
    None
}

/// Returns the reason a login form would be rejected, if any.
/// Only emptiness is checked; the backend decides the rest.
pub fn login_rejection(username: &str, password: &str) -> Option<&'static str> {
    if username.trim().is_empty() {
        return Some("Username cannot be empty");
    }
    if password.is_empty() {
        return Some("Password cannot be empty");
    }
    None
}

/// Whether a file name is safe to send as a multipart file name.
pub fn is_safe_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && file_name.len() <= MAX_FILENAME_LEN
        && !file_name.contains("..")
        && !file_name.contains(UNSAFE_FILENAME_CHARS)
}
