//! SQLite-backed range repository

use super::{validate_range, IpRange, RangeStore, TeamSummary};
use crate::error::RangeError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

const SELECT_COLUMNS: &str = "SELECT id, start_ip, end_ip, team FROM ip_ranges";

/// Repository for team-owned IP ranges
///
/// Each write is a single autocommitted statement; there is no transaction
/// spanning several calls.
pub struct IpRangeRepository<'a> {
    conn: &'a Connection,
}

fn row_to_range(row: &Row<'_>) -> rusqlite::Result<IpRange> {
    Ok(IpRange {
        id: row.get(0)?,
        start: row.get(1)?,
        end: row.get(2)?,
        team: row.get(3)?,
    })
}

impl<'a> IpRangeRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn query_ranges<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<IpRange>, RangeError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_range)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl RangeStore for IpRangeRepository<'_> {
    fn add_ip_range(&self, start: u32, end: u32, team: &str) -> Result<i64, RangeError> {
        let team = validate_range(start, end, team)?;
        self.conn.execute(
            "INSERT INTO ip_ranges (start_ip, end_ip, team) VALUES (?1, ?2, ?3)",
            params![start, end, team],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("added range #{} {}-{} for '{}'", id, start, end, team);
        Ok(id)
    }

    fn update_ip_range(
        &self,
        id: i64,
        start: u32,
        end: u32,
        team: &str,
    ) -> Result<(), RangeError> {
        let team = validate_range(start, end, team)?;
        let updated = self.conn.execute(
            "UPDATE ip_ranges SET start_ip = ?2, end_ip = ?3, team = ?4 WHERE id = ?1",
            params![id, start, end, team],
        )?;
        if updated == 0 {
            return Err(RangeError::UnknownId(id));
        }
        debug!("updated range #{}", id);
        Ok(())
    }

    fn delete_ip_range(&self, id: i64) -> Result<(), RangeError> {
        let deleted = self
            .conn
            .execute("DELETE FROM ip_ranges WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(RangeError::UnknownId(id));
        }
        debug!("deleted range #{}", id);
        Ok(())
    }

    fn get_all_ip_ranges(&self) -> Result<Vec<IpRange>, RangeError> {
        self.query_ranges(&format!("{SELECT_COLUMNS} ORDER BY id"), [])
    }

    fn get_ip_range_by_id(&self, id: i64) -> Result<Option<IpRange>, RangeError> {
        Ok(self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                row_to_range,
            )
            .optional()?)
    }

    fn find_first_containing(&self, address: u32) -> Result<Option<IpRange>, RangeError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "{SELECT_COLUMNS} WHERE start_ip <= ?1 AND end_ip >= ?1 ORDER BY id LIMIT 1"
                ),
                [address],
                row_to_range,
            )
            .optional()?)
    }

    fn find_overlapping(&self, start: u32, end: u32) -> Result<Vec<IpRange>, RangeError> {
        self.query_ranges(
            &format!("{SELECT_COLUMNS} WHERE start_ip <= ?2 AND end_ip >= ?1 ORDER BY id"),
            [start, end],
        )
    }

    fn get_ip_ranges_by_team(&self, team: &str) -> Result<Vec<IpRange>, RangeError> {
        self.query_ranges(
            &format!("{SELECT_COLUMNS} WHERE team = ?1 ORDER BY id"),
            [team.trim()],
        )
    }

    fn delete_team_ranges(&self, team: &str) -> Result<usize, RangeError> {
        let removed = self
            .conn
            .execute("DELETE FROM ip_ranges WHERE team = ?1", [team.trim()])?;
        debug!("deleted {} ranges of team '{}'", removed, team.trim());
        Ok(removed)
    }

    fn count(&self) -> Result<u64, RangeError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM ip_ranges", [], |row| row.get(0))?)
    }

    fn team_summaries(&self) -> Result<Vec<TeamSummary>, RangeError> {
        let mut stmt = self.conn.prepare(
            "SELECT team, COUNT(*), SUM(end_ip - start_ip + 1)
             FROM ip_ranges
             GROUP BY team
             ORDER BY team",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TeamSummary {
                team: row.get(0)?,
                ranges: row.get(1)?,
                addresses: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::{format_dotted_quad, parse_dotted_quad};
    use crate::database::core::{DatabaseConn, SchemaManager};

    fn setup_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        let schema = SchemaManager::new(&db.conn);
        schema.initialize().unwrap();
        db
    }

    fn ip(text: &str) -> u32 {
        parse_dotted_quad(text).unwrap()
    }

    #[test]
    fn test_new_repository_is_empty() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_add_and_get() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        let id = repo
            .add_ip_range(ip("192.168.100.1"), ip("192.168.100.50"), "Network Ops")
            .unwrap();
        let range = repo.get_ip_range_by_id(id).unwrap().unwrap();

        assert_eq!(range.id, id);
        assert_eq!(format_dotted_quad(range.start), "192.168.100.1");
        assert_eq!(format_dotted_quad(range.end), "192.168.100.50");
        assert_eq!(range.team, "Network Ops");
        assert!(repo.get_ip_range_by_id(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_add_rejects_reversed_range() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        let result = repo.add_ip_range(ip("192.168.1.100"), ip("192.168.1.50"), "T");
        assert!(matches!(result, Err(RangeError::InvalidRangeOrder { .. })));
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_add_from_cidr() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        let id = repo.add_ip_range_from_cidr("10.50.0.0/24", "T").unwrap();
        let range = repo.get_ip_range_by_id(id).unwrap().unwrap();
        assert_eq!(range.start_addr().to_string(), "10.50.0.0");
        assert_eq!(range.end_addr().to_string(), "10.50.0.255");

        assert!(repo.add_ip_range_from_cidr("192.168.1.0/33", "T").is_err());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_full_address_space() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        let id = repo.add_ip_range_from_cidr("0.0.0.0/0", "everyone").unwrap();
        let range = repo.get_ip_range_by_id(id).unwrap().unwrap();
        assert_eq!((range.start, range.end), (0, u32::MAX));
        assert_eq!(range.size(), 1u64 << 32);

        let summaries = repo.team_summaries().unwrap();
        assert_eq!(summaries[0].addresses, 1u64 << 32);
    }

    #[test]
    fn test_update() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        let id = repo.add_ip_range(ip("10.0.0.1"), ip("10.0.0.9"), "old").unwrap();
        repo.update_ip_range(id, ip("172.16.0.0"), ip("172.16.0.255"), "new")
            .unwrap();

        let range = repo.get_ip_range_by_id(id).unwrap().unwrap();
        assert_eq!(range.start, ip("172.16.0.0"));
        assert_eq!(range.end, ip("172.16.0.255"));
        assert_eq!(range.team, "new");

        assert!(matches!(
            repo.update_ip_range(id + 1, 1, 2, "x"),
            Err(RangeError::UnknownId(_))
        ));
        assert!(matches!(
            repo.update_ip_range(id, 9, 2, "x"),
            Err(RangeError::InvalidRangeOrder { .. })
        ));
        // failed update leaves the record untouched
        assert_eq!(repo.get_ip_range_by_id(id).unwrap().unwrap().team, "new");
    }

    #[test]
    fn test_delete() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        let id = repo.add_ip_range(1, 2, "T").unwrap();
        repo.delete_ip_range(id).unwrap();
        assert!(repo.get_ip_range_by_id(id).unwrap().is_none());
        assert!(matches!(
            repo.delete_ip_range(id),
            Err(RangeError::UnknownId(_))
        ));
    }

    #[test]
    fn test_get_all_in_id_order() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        let a = repo.add_ip_range(ip("10.0.0.0"), ip("10.0.0.255"), "a").unwrap();
        let b = repo.add_ip_range(ip("1.0.0.0"), ip("1.0.0.255"), "b").unwrap();
        let c = repo.add_ip_range(ip("5.0.0.0"), ip("5.0.0.255"), "c").unwrap();

        let ids: Vec<i64> = repo
            .get_all_ip_ranges()
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_first_containing_uses_id_order() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        repo.add_ip_range(ip("10.0.0.0"), ip("10.255.255.255"), "wide")
            .unwrap();
        repo.add_ip_range(ip("10.1.1.0"), ip("10.1.1.255"), "narrow")
            .unwrap();

        let hit = repo.find_first_containing(ip("10.1.1.10")).unwrap().unwrap();
        assert_eq!(hit.team, "wide");
        assert!(repo.find_first_containing(ip("11.0.0.0")).unwrap().is_none());
    }

    #[test]
    fn test_find_overlapping_boundaries() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        repo.add_ip_range(ip("10.0.0.10"), ip("10.0.0.20"), "mid")
            .unwrap();

        // touching either end counts as overlap
        assert_eq!(
            repo.find_overlapping(ip("10.0.0.0"), ip("10.0.0.10"))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            repo.find_overlapping(ip("10.0.0.20"), ip("10.0.0.30"))
                .unwrap()
                .len(),
            1
        );
        assert!(repo
            .find_overlapping(ip("10.0.0.21"), ip("10.0.0.30"))
            .unwrap()
            .is_empty());
        assert!(repo
            .find_overlapping(ip("10.0.0.0"), ip("10.0.0.9"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_team_queries() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        repo.add_ip_range(ip("10.0.0.0"), ip("10.0.0.255"), "blue")
            .unwrap();
        repo.add_ip_range(ip("10.0.1.0"), ip("10.0.1.0"), "blue")
            .unwrap();
        repo.add_ip_range(ip("10.0.2.0"), ip("10.0.2.3"), "red")
            .unwrap();

        assert_eq!(repo.get_ip_ranges_by_team("blue").unwrap().len(), 2);

        let summaries = repo.team_summaries().unwrap();
        assert_eq!(
            summaries,
            vec![
                TeamSummary {
                    team: "blue".to_string(),
                    ranges: 2,
                    addresses: 257,
                },
                TeamSummary {
                    team: "red".to_string(),
                    ranges: 1,
                    addresses: 4,
                },
            ]
        );

        assert_eq!(repo.delete_team_ranges("blue").unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.delete_team_ranges("blue").unwrap(), 0);
    }

    #[test]
    fn test_team_name_trimmed() {
        let db = setup_test_db();
        let repo = IpRangeRepository::new(&db.conn);

        let id = repo.add_ip_range(1, 1, "  infra  ").unwrap();
        assert_eq!(repo.get_ip_range_by_id(id).unwrap().unwrap().team, "infra");
        assert!(matches!(
            repo.add_ip_range(1, 1, ""),
            Err(RangeError::EmptyTeam)
        ));
    }
}
