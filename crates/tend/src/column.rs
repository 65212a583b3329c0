//! Column specifications and SQL rendering.

use std::fmt;

/// Semantic type tag for a column.
///
/// `Display` renders the Postgres spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColType {
    /// SMALLINT (2 bytes)
    SmallInt,
    /// INTEGER (4 bytes)
    Integer,
    /// BIGINT (8 bytes)
    BigInt,
    /// REAL (4 bytes floating point)
    Real,
    /// DOUBLE PRECISION (8 bytes floating point)
    DoublePrecision,
    /// NUMERIC (arbitrary precision)
    Numeric,
    /// BOOLEAN
    Boolean,
    /// TEXT
    Text,
    /// VARCHAR with a length limit
    Varchar(u32),
    /// TIMESTAMP (without time zone)
    Timestamp,
    /// TIMESTAMPTZ
    Timestamptz,
    /// DATE
    Date,
    /// UUID
    Uuid,
    /// JSONB
    Jsonb,
}

impl fmt::Display for ColType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColType::SmallInt => write!(f, "SMALLINT"),
            ColType::Integer => write!(f, "INTEGER"),
            ColType::BigInt => write!(f, "BIGINT"),
            ColType::Real => write!(f, "REAL"),
            ColType::DoublePrecision => write!(f, "DOUBLE PRECISION"),
            ColType::Numeric => write!(f, "NUMERIC"),
            ColType::Boolean => write!(f, "BOOLEAN"),
            ColType::Text => write!(f, "TEXT"),
            ColType::Varchar(n) => write!(f, "VARCHAR({})", n),
            ColType::Timestamp => write!(f, "TIMESTAMP"),
            ColType::Timestamptz => write!(f, "TIMESTAMPTZ"),
            ColType::Date => write!(f, "DATE"),
            ColType::Uuid => write!(f, "UUID"),
            ColType::Jsonb => write!(f, "JSONB"),
        }
    }
}

/// Declarative description of one column the application expects.
///
/// Names are declared lowercase; membership checks against the live
/// catalog fold case the way Postgres folds unquoted identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Semantic type
    pub col_type: ColType,
    /// Whether the column allows NULL
    pub nullable: bool,
    /// Default value expression (raw SQL, e.g. `now()`)
    pub default: Option<String>,
}

impl ColumnSpec {
    /// A nullable column of the given type with no default.
    pub fn new(name: impl Into<String>, col_type: ColType) -> Self {
        Self {
            name: name.into(),
            col_type,
            nullable: true,
            default: None,
        }
    }

    /// Shorthand for a nullable TEXT column.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColType::Text)
    }

    /// Mark the column NOT NULL.
    ///
    /// A NOT NULL addition to a non-empty table needs a default, or the
    /// server will reject the statement; that rejection surfaces in the
    /// migration report like any other per-column failure.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Attach a default value expression.
    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    /// Render the single-column `ALTER TABLE ... ADD COLUMN` statement.
    pub fn add_column_sql(&self, table: &str) -> String {
        let not_null = if self.nullable { "" } else { " NOT NULL" };
        let default = self
            .default
            .as_ref()
            .map(|d| format!(" DEFAULT {}", d))
            .unwrap_or_default();
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}{}{};",
            quote_ident(table),
            quote_ident(&self.name),
            self.col_type,
            not_null,
            default
        )
    }
}

/// Quote a Postgres identifier, escaping embedded double quotes.
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("bla\"h"), "\"bla\"\"h\"");
    }

    #[test]
    fn test_col_type_display() {
        assert_eq!(ColType::DoublePrecision.to_string(), "DOUBLE PRECISION");
        assert_eq!(ColType::Varchar(20).to_string(), "VARCHAR(20)");
        assert_eq!(ColType::Timestamp.to_string(), "TIMESTAMP");
    }

    #[test]
    fn snapshot_nullable_column_sql() {
        let spec = ColumnSpec::new("charging_port_type", ColType::Varchar(20));
        insta::assert_snapshot!(
            spec.add_column_sql("vehicle"),
            @r#"ALTER TABLE "vehicle" ADD COLUMN "charging_port_type" VARCHAR(20);"#
        );
    }

    #[test]
    fn snapshot_not_null_column_with_default_sql() {
        let spec = ColumnSpec::new("fast_charging_supported", ColType::Boolean)
            .not_null()
            .with_default("false");
        insta::assert_snapshot!(
            spec.add_column_sql("vehicle"),
            @r#"ALTER TABLE "vehicle" ADD COLUMN "fast_charging_supported" BOOLEAN NOT NULL DEFAULT false;"#
        );
    }

    #[test]
    fn test_reserved_word_table_is_quoted() {
        let spec = ColumnSpec::text("municipality");
        assert_eq!(
            spec.add_column_sql("user"),
            "ALTER TABLE \"user\" ADD COLUMN \"municipality\" TEXT;"
        );
    }
}
