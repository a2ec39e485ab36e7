//! Document counter repository.
//!
//! Allocates sequential document numbers from a per-(class, year)
//! counter row with a single atomic upsert. Numbers are never derived
//! from row counts, so they stay unique under concurrent creation and
//! after deletions.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

use atelier_core::numbering::{self, DocumentKind};

/// Repository for atomic document number allocation.
///
/// Methods are generic over `ConnectionTrait` so allocation can join the
/// surrounding database transaction of a document insert.
pub struct CounterRepository;

impl CounterRepository {
    /// Advances the counter for `(kind, year)` and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn allocate<C: ConnectionTrait>(
        conn: &C,
        kind: DocumentKind,
        year: i32,
    ) -> Result<u64, DbErr> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"
            INSERT INTO document_counters (doc_class, year, last_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (doc_class, year)
            DO UPDATE SET last_value = document_counters.last_value + 1
            RETURNING last_value
            ",
            [kind.as_str().into(), year.into()],
        );

        let row = conn
            .query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("document counter row".to_string()))?;
        let value: i64 = row.try_get("", "last_value")?;

        u64::try_from(value)
            .map_err(|_| DbErr::Custom(format!("counter value out of range: {value}")))
    }

    /// Allocates the next document number for `(kind, year)` and formats
    /// it with the given prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn next_number<C: ConnectionTrait>(
        conn: &C,
        kind: DocumentKind,
        prefix: &str,
        year: i32,
    ) -> Result<String, DbErr> {
        let sequence = Self::allocate(conn, kind, year).await?;
        Ok(numbering::format_number(prefix, year, sequence))
    }
}
