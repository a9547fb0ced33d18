//! SQL identifier quoting.

/// Quote an identifier with ANSI double quotes, doubling embedded quotes.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote an identifier with MySQL backticks, doubling embedded backticks.
#[must_use]
pub fn quote_ident_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
