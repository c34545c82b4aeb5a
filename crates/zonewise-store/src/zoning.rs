use rusqlite::types::ToSql;
use tracing::{debug, instrument};

use zonewise_core::zoning::{ZoningQuery, ZoningRecord};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

const COLUMNS: &str = "zone_code, jurisdiction, zone_name, front_setback, side_setback, \
                       rear_setback, max_height, permitted_uses";

/// Read access to the `zoning_districts` table, plus bulk loading for seeding.
#[derive(Clone)]
pub struct ZoningRepo {
    db: Database,
}

impl ZoningRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Case-insensitive substring match on whichever fields are set, in rowid
    /// order. An unfiltered query returns the first `limit` rows.
    #[instrument(skip(self), fields(zone_code = ?query.zone_code, jurisdiction = ?query.jurisdiction))]
    pub fn search(&self, query: &ZoningQuery) -> Result<Vec<ZoningRecord>, StoreError> {
        let mut clauses = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(code) = &query.zone_code {
            params.push(row_helpers::contains_pattern(code));
            clauses.push(format!("zone_code LIKE ?{} ESCAPE '\\'", params.len()));
        }
        if let Some(jurisdiction) = &query.jurisdiction {
            params.push(row_helpers::contains_pattern(jurisdiction));
            clauses.push(format!("jurisdiction LIKE ?{} ESCAPE '\\'", params.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {COLUMNS} FROM zoning_districts {where_clause} ORDER BY rowid LIMIT {}",
            query.limit
        );

        let records = self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
            let mut rows = stmt.query(refs.as_slice())?;
            let mut results = Vec::new();
            while let Some(row) = rows.next()? {
                results.push(row_to_record(row)?);
            }
            Ok(results)
        })?;

        debug!(matched = records.len(), "zoning search");
        Ok(records)
    }

    #[instrument(skip(self, record), fields(zone_code = %record.zone_code, jurisdiction = %record.jurisdiction))]
    pub fn insert(&self, record: &ZoningRecord) -> Result<(), StoreError> {
        self.db.with_conn(|conn| insert_record(conn, record))
    }

    /// Insert all records in one transaction. Returns the number inserted.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn insert_many(&self, records: &[ZoningRecord]) -> Result<usize, StoreError> {
        self.db.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            for record in records {
                insert_record(&tx, record)?;
            }
            tx.commit()?;
            Ok(records.len())
        })
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        self.db.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM zoning_districts", [], |row| row.get(0))?;
            Ok(n as u64)
        })
    }
}

fn insert_record(conn: &rusqlite::Connection, record: &ZoningRecord) -> Result<(), StoreError> {
    conn.execute(
        &format!("INSERT INTO zoning_districts ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        rusqlite::params![
            record.zone_code,
            record.jurisdiction,
            record.zone_name,
            record.front_setback,
            record.side_setback,
            record.rear_setback,
            record.max_height,
            record.permitted_uses,
        ],
    )?;
    Ok(())
}

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<ZoningRecord, StoreError> {
    const T: &str = "zoning_districts";
    Ok(ZoningRecord {
        zone_code: row_helpers::get(row, 0, T, "zone_code")?,
        jurisdiction: row_helpers::get(row, 1, T, "jurisdiction")?,
        zone_name: row_helpers::get_opt(row, 2, T, "zone_name")?,
        front_setback: row_helpers::get_opt(row, 3, T, "front_setback")?,
        side_setback: row_helpers::get_opt(row, 4, T, "side_setback")?,
        rear_setback: row_helpers::get_opt(row, 5, T, "rear_setback")?,
        max_height: row_helpers::get_opt(row, 6, T, "max_height")?,
        permitted_uses: row_helpers::get_opt(row, 7, T, "permitted_uses")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, jurisdiction: &str) -> ZoningRecord {
        ZoningRecord {
            zone_code: code.into(),
            jurisdiction: jurisdiction.into(),
            zone_name: Some(format!("{code} district")),
            front_setback: Some(25.0),
            side_setback: Some(7.5),
            rear_setback: Some(20.0),
            max_height: Some(35.0),
            permitted_uses: None,
        }
    }

    fn seeded() -> ZoningRepo {
        let repo = ZoningRepo::new(Database::in_memory().unwrap());
        repo.insert_many(&[
            record("R-1", "Satellite Beach"),
            record("R-1", "Cocoa Beach"),
            record("RS-1", "Palm Bay"),
            record("C-1", "Melbourne"),
            record("RU_1", "Brevard County"),
        ])
        .unwrap();
        repo
    }

    fn query(code: Option<&str>, jurisdiction: Option<&str>, limit: u32) -> ZoningQuery {
        ZoningQuery {
            zone_code: code.map(String::from),
            jurisdiction: jurisdiction.map(String::from),
            limit,
        }
    }

    #[test]
    fn zone_code_partial_case_insensitive() {
        let repo = seeded();
        let hits = repo.search(&query(Some("r-1"), None, 5)).unwrap();
        let codes: Vec<_> = hits.iter().map(|r| r.zone_code.as_str()).collect();
        // "RS-1" doesn't contain "r-1"; order is insertion order.
        assert_eq!(codes, vec!["R-1", "R-1"]);
        assert_eq!(hits[0].jurisdiction, "Satellite Beach");
    }

    #[test]
    fn both_filters_combine() {
        let repo = seeded();
        let hits = repo.search(&query(Some("r-1"), Some("cocoa beach"), 5)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].jurisdiction, "Cocoa Beach");
        assert_eq!(hits[0].side_setback, Some(7.5));
    }

    #[test]
    fn jurisdiction_only() {
        let repo = seeded();
        let hits = repo.search(&query(None, Some("melbourne"), 5)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].zone_code, "C-1");
    }

    #[test]
    fn limit_applied() {
        let repo = seeded();
        assert_eq!(repo.search(&query(None, None, 2)).unwrap().len(), 2);
        assert_eq!(repo.search(&query(Some("-"), None, 5)).unwrap().len(), 4);
    }

    #[test]
    fn like_wildcards_are_literal() {
        let repo = seeded();
        // Unescaped, "_" would match the hyphen in "R-1".
        assert!(repo.search(&query(Some("r_1"), None, 5)).unwrap().is_empty());
        assert_eq!(repo.search(&query(Some("u_1"), None, 5)).unwrap().len(), 1);
        assert!(repo.search(&query(Some("%"), None, 5)).unwrap().is_empty());
    }

    #[test]
    fn missing_optionals_round_trip() {
        let repo = ZoningRepo::new(Database::in_memory().unwrap());
        repo.insert(&ZoningRecord {
            zone_code: "PUD".into(),
            jurisdiction: "Titusville".into(),
            zone_name: None,
            front_setback: None,
            side_setback: None,
            rear_setback: None,
            max_height: None,
            permitted_uses: Some("Mixed residential".into()),
        })
        .unwrap();
        let hits = repo.search(&query(Some("pud"), None, 5)).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].front_setback.is_none());
        assert_eq!(hits[0].permitted_uses.as_deref(), Some("Mixed residential"));
        assert_eq!(repo.count().unwrap(), 1);
    }
}
