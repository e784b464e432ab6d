/// Input checks shared by the user routes.

/// LeetCode handle: 1-64 characters of ASCII letters, digits, `_`, `-` or `.`.
/// Surrounding whitespace is ignored; the trimmed handle is returned.
pub fn validate_username(username: &str) -> Result<&str, &'static str> {
    let username = username.trim();
    if username.is_empty() {
        return Err("Username is required");
    }
    if username.len() > 64 {
        return Err("Username must be at most 64 characters");
    }
    if !username
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err("Username may only contain letters, digits, '_', '-' and '.'");
    }
    Ok(username)
}

/// Problem slug as it appears in problem URLs, e.g. `two-sum`.
pub fn validate_problem_slug(slug: &str) -> Result<&str, &'static str> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err("Problem slug is required");
    }
    if slug.len() > 128 {
        return Err("Problem slug must be at most 128 characters");
    }
    if !slug
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err("Problem slug may only contain lowercase letters, digits and '-'");
    }
    Ok(slug)
}

pub fn parse_submission_id(raw: &str) -> Result<u64, &'static str> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err("Submission id must be a positive integer"),
    }
}
