//! Storage affinities and their SQL column types.

use std::fmt;

/// Coarse storage shape of a native type.
///
/// Byte-oriented backends use it to pick a packing width; relational
/// backends use it to pick a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affinity {
    Boolean,
    /// A fixed-width integer of `width` bytes, signed or not.
    Integer { width: u8 },
    Float,
    Double,
    Text,
    Blob,
}

impl Affinity {
    /// Size of the fixed-width byte image, or `None` for text and blob.
    pub const fn width(self) -> Option<usize> {
        match self {
            Affinity::Boolean => Some(1),
            Affinity::Integer { width } => Some(width as usize),
            Affinity::Float => Some(4),
            Affinity::Double => Some(8),
            Affinity::Text | Affinity::Blob => None,
        }
    }

    /// Column type keyword for this affinity in the given SQL dialect.
    pub const fn column_type(self, dialect: Dialect) -> &'static str {
        dialect.column_type(self)
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Affinity::Boolean => f.write_str("boolean"),
            Affinity::Integer { width } => write!(f, "integer-{}", u32::from(*width) * 8),
            Affinity::Float => f.write_str("float"),
            Affinity::Double => f.write_str("double"),
            Affinity::Text => f.write_str("text"),
            Affinity::Blob => f.write_str("blob"),
        }
    }
}

/// SQL dialect of a relational backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    /// Column type keyword for an affinity.
    ///
    /// SQLite folds every integer width into `INTEGER`; PostgreSQL keeps
    /// 16, 32 and 64-bit integers apart and has no 8-bit type.
    pub const fn column_type(self, affinity: Affinity) -> &'static str {
        match (self, affinity) {
            (Dialect::Sqlite, Affinity::Boolean | Affinity::Integer { .. }) => "INTEGER",
            (Dialect::Sqlite, Affinity::Float | Affinity::Double) => "REAL",
            (Dialect::Sqlite, Affinity::Text) => "TEXT",
            (Dialect::Sqlite, Affinity::Blob) => "BLOB",
            (Dialect::Postgres, Affinity::Boolean) => "BOOLEAN",
            (Dialect::Postgres, Affinity::Integer { width: 0..=2 }) => "SMALLINT",
            (Dialect::Postgres, Affinity::Integer { width: 3..=4 }) => "INTEGER",
            (Dialect::Postgres, Affinity::Integer { .. }) => "BIGINT",
            (Dialect::Postgres, Affinity::Float) => "REAL",
            (Dialect::Postgres, Affinity::Double) => "DOUBLE PRECISION",
            (Dialect::Postgres, Affinity::Text) => "TEXT",
            (Dialect::Postgres, Affinity::Blob) => "BYTEA",
        }
    }

    /// Positional parameter placeholder for the 1-based `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Sqlite => format!("?{index}"),
            Dialect::Postgres => format!("${index}"),
        }
    }
}
