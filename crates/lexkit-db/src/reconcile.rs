//! Definition reconcilers for the `words` table.

use std::collections::HashSet;
use std::path::Path;

use lexkit_core::Definitions;
use rusqlite::{params, Connection};
use tracing::{info, warn};

use crate::error::DbError;

/// Outcome of [`apply_definitions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Rows whose definition was replaced.
    pub updated: usize,
    /// Database words with no entry in the definitions, in table order.
    pub missing: Vec<String>,
}

/// Open an existing lexicon database. A missing file is an error rather
/// than a fresh empty database.
pub fn open_database(path: &Path) -> Result<Connection, DbError> {
    if !path.is_file() {
        return Err(DbError::NotFound(path.display().to_string()));
    }
    Ok(Connection::open(path)?)
}

fn table_words(conn: &Connection) -> Result<Vec<String>, DbError> {
    let mut stmt = conn.prepare("SELECT word FROM words")?;
    let words = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(words)
}

/// Update every database word that has a definition, leaving the rest
/// alone, and commit.
pub fn apply_definitions(conn: &mut Connection, defs: &Definitions) -> Result<ApplyReport, DbError> {
    let words = table_words(conn)?;
    let tx = conn.transaction()?;
    let mut report = ApplyReport::default();
    {
        let mut update = tx.prepare("UPDATE words SET definition = ?1 WHERE word = ?2")?;
        for word in words {
            match defs.get(&word) {
                Some(definition) => report.updated += update.execute(params![definition, word])?,
                None => {
                    warn!("not found in definitions: {word}");
                    report.missing.push(word);
                }
            }
        }
    }
    tx.commit()?;
    info!("updated {} definitions", report.updated);
    Ok(report)
}

/// Replace every definition in the table, all or nothing.
///
/// Fails without touching the database if `defs` names a word the table
/// lacks. Otherwise updates inside one transaction and rolls back if any
/// table word was left without a new definition. Returns the number of
/// rows updated.
pub fn sync_definitions(conn: &mut Connection, defs: &Definitions) -> Result<usize, DbError> {
    let words = table_words(conn)?;
    let known: HashSet<&str> = words.iter().map(String::as_str).collect();
    let mut unknown: Vec<String> = defs
        .keys()
        .filter(|w| !known.contains(w.as_str()))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        return Err(DbError::UnknownWords(unknown));
    }

    let tx = conn.transaction()?;
    let mut updated = 0;
    {
        let mut update = tx.prepare("UPDATE words SET definition = ?1 WHERE word = ?2")?;
        for (word, definition) in defs {
            updated += update.execute(params![definition, word])?;
        }
    }

    let mut uncovered: Vec<String> = words.into_iter().filter(|w| !defs.contains_key(w)).collect();
    if !uncovered.is_empty() {
        tx.rollback()?;
        uncovered.sort();
        uncovered.dedup();
        return Err(DbError::Uncovered(uncovered));
    }
    tx.commit()?;
    info!("updated {updated} definitions");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon_db(words: &[&str]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE words (word TEXT PRIMARY KEY, definition TEXT)")
            .unwrap();
        for word in words {
            conn.execute(
                "INSERT INTO words (word, definition) VALUES (?1, 'old')",
                params![word],
            )
            .unwrap();
        }
        conn
    }

    fn definition(conn: &Connection, word: &str) -> String {
        conn.query_row(
            "SELECT definition FROM words WHERE word = ?1",
            params![word],
            |row| row.get(0),
        )
        .unwrap()
    }

    fn defs(pairs: &[(&str, &str)]) -> Definitions {
        pairs.iter().map(|(w, d)| (w.to_string(), d.to_string())).collect()
    }

    #[test]
    fn apply_updates_known_and_reports_missing() {
        let mut conn = lexicon_db(&["QI", "ZA", "XU"]);
        let report = apply_definitions(&mut conn, &defs(&[("QI", "life force"), ("ZA", "pizza")])).unwrap();
        assert_eq!(report.updated, 2);
        assert_eq!(report.missing, vec!["XU"]);
        assert_eq!(definition(&conn, "QI"), "life force");
        assert_eq!(definition(&conn, "XU"), "old");
    }

    #[test]
    fn sync_updates_every_row() {
        let mut conn = lexicon_db(&["QI", "ZA", "XU"]);
        let tsv = defs(&[("QI", "a"), ("ZA", "b"), ("XU", "c")]);
        assert_eq!(sync_definitions(&mut conn, &tsv).unwrap(), 3);
        assert_eq!(definition(&conn, "XU"), "c");
    }

    #[test]
    fn sync_partial_coverage_rolls_back() {
        let mut conn = lexicon_db(&["QI", "ZA", "XU"]);
        let err = sync_definitions(&mut conn, &defs(&[("QI", "a"), ("ZA", "b")])).unwrap_err();
        match err {
            DbError::Uncovered(words) => assert_eq!(words, vec!["XU"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(definition(&conn, "QI"), "old");
    }

    #[test]
    fn sync_unknown_word_changes_nothing() {
        let mut conn = lexicon_db(&["QI"]);
        let err = sync_definitions(&mut conn, &defs(&[("QI", "a"), ("ZZZ", "b")])).unwrap_err();
        assert!(matches!(err, DbError::UnknownWords(ref w) if w == &["ZZZ"]));
        assert!(err.to_string().contains("ZZZ"));
        assert_eq!(definition(&conn, "QI"), "old");
    }

    #[test]
    fn open_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_database(&dir.path().join("CSW24.db")).unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));

        let path = dir.path().join("lex.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE words (word TEXT, definition TEXT)")
            .unwrap();
        let conn = open_database(&path).unwrap();
        assert!(table_words(&conn).unwrap().is_empty());
    }
}
