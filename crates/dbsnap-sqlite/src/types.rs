//! Mapping of SQLite declared types onto `java.sql.Types` codes.
//!
//! SQLite columns have a declared type but only an [affinity]. The code
//! reported for a column follows the affinity rules, so `VARCHAR(80)` and
//! `NVARCHAR` both report as `VARCHAR`.
//!
//! [affinity]: https://www.sqlite.org/datatype3.html#determination_of_column_affinity

/// `java.sql.Types.INTEGER`
pub const INTEGER: i32 = 4;
/// `java.sql.Types.VARCHAR`
pub const VARCHAR: i32 = 12;
/// `java.sql.Types.BLOB`
pub const BLOB: i32 = 2004;
/// `java.sql.Types.DOUBLE`
pub const DOUBLE: i32 = 8;
/// `java.sql.Types.NUMERIC`
pub const NUMERIC: i32 = 2;

/// Returns the type code for a declared column type.
#[must_use]
pub fn type_code(declared: &str) -> i32 {
    let upper = declared.to_uppercase();
    if upper.contains("INT") {
        INTEGER
    } else if ["CHAR", "CLOB", "TEXT"].iter().any(|t| upper.contains(t)) {
        VARCHAR
    } else if upper.contains("BLOB") || upper.trim().is_empty() {
        BLOB
    } else if ["REAL", "FLOA", "DOUB"].iter().any(|t| upper.contains(t)) {
        DOUBLE
    } else {
        NUMERIC
    }
}

/// Parses `(size)` or `(precision, scale)` out of a declared type.
///
/// Returns `(0, 0)` when the declaration carries no such arguments.
#[must_use]
pub fn size_and_digits(declared: &str) -> (i32, i32) {
    let Some(args) = declared
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(args, _)| args)
    else {
        return (0, 0);
    };

    let mut parts = args.split(',').map(|p| p.trim().parse::<i32>().unwrap_or(0));
    let size = parts.next().unwrap_or(0);
    let digits = parts.next().unwrap_or(0);
    (size, digits)
}
