use crate::core::SiftError;

const READ_KEYWORD: &str = "select";

/// Textual gate run before a statement reaches the engine: trims the input,
/// strips trailing separators and requires a leading `SELECT`.
///
/// This is an allow-list on the first token, not a parser. The engine
/// additionally plans the statement in read-only mode.
pub fn prepare_statement(sql: &str) -> Result<&str, SiftError> {
    let statement = sql
        .trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if statement.is_empty() {
        return Err(SiftError::EmptyQuery);
    }
    if !first_token(statement).eq_ignore_ascii_case(READ_KEYWORD) {
        return Err(SiftError::NotAReadQuery);
    }
    Ok(statement)
}

fn first_token(statement: &str) -> &str {
    let end = statement
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(statement.len());
    &statement[..end]
}
