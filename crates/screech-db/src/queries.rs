use crate::Database;
use crate::models::{NewUser, ScreechRow, SortOrder, UserRow};
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

const USER_COLUMNS: &str =
    "id, public_id, token, username, first_name, last_name, image_url, created_at, updated_at";

const SCREECH_SELECT: &str = "SELECT s.id, s.public_id, s.user_id, s.content, s.created_at, s.updated_at,
            u.username, u.token
     FROM screeches s
     JOIN users u ON s.user_id = u.id";

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &NewUser<'_>) -> Result<UserRow> {
        self.with_conn(|conn| {
            let now = timestamp();
            conn.execute(
                "INSERT INTO users (public_id, token, username, first_name, last_name, image_url, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                rusqlite::params![
                    user.public_id,
                    user.token,
                    user.username,
                    user.first_name,
                    user.last_name,
                    user.image_url,
                    now,
                ],
            )?;

            Ok(UserRow {
                id: conn.last_insert_rowid(),
                public_id: user.public_id.to_string(),
                token: user.token.to_string(),
                username: user.username.to_string(),
                first_name: user.first_name.to_string(),
                last_name: user.last_name.to_string(),
                image_url: user.image_url.to_string(),
                created_at: now.clone(),
                updated_at: now,
            })
        })
    }

    /// Find a user matching every provided filter. `None` filters are ignored;
    /// with both `None` the first user row is returned.
    pub fn find_user(&self, public_id: Option<&str>, username: Option<&str>) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE (?1 IS NULL OR public_id = ?1) AND (?2 IS NULL OR username = ?2)
                 ORDER BY id LIMIT 1"
            );
            let row = conn
                .query_row(&sql, rusqlite::params![public_id, username], user_from_row)
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_user_by_public_id(&self, public_id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by(conn, "public_id", public_id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by(conn, "username", username))
    }

    pub fn get_user_by_token(&self, token: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by(conn, "token", token))
    }

    /// Persist the mutable profile fields of `user` and refresh `updated_at`.
    pub fn update_user(&self, user: &mut UserRow) -> Result<()> {
        self.with_conn(|conn| {
            let now = timestamp();
            conn.execute(
                "UPDATE users
                 SET username = ?1, first_name = ?2, last_name = ?3, image_url = ?4, updated_at = ?5
                 WHERE id = ?6",
                rusqlite::params![
                    &user.username,
                    &user.first_name,
                    &user.last_name,
                    &user.image_url,
                    &now,
                    user.id,
                ],
            )?;
            user.updated_at = now;
            Ok(())
        })
    }

    // -- Screeches --

    pub fn insert_screech(&self, public_id: &str, owner: &UserRow, content: &str) -> Result<ScreechRow> {
        self.with_conn(|conn| {
            let now = timestamp();
            conn.execute(
                "INSERT INTO screeches (public_id, user_id, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                rusqlite::params![public_id, owner.id, content, now],
            )?;

            Ok(ScreechRow {
                id: conn.last_insert_rowid(),
                public_id: public_id.to_string(),
                user_id: owner.id,
                content: content.to_string(),
                created_at: now.clone(),
                updated_at: now,
                username: owner.username.clone(),
                owner_token: owner.token.clone(),
            })
        })
    }

    /// Look up a screech together with its owner.
    pub fn get_screech_by_public_id(&self, public_id: &str) -> Result<Option<ScreechRow>> {
        self.with_conn(|conn| {
            let sql = format!("{SCREECH_SELECT} WHERE s.public_id = ?1");
            let row = conn.query_row(&sql, [public_id], screech_from_row).optional()?;
            Ok(row)
        })
    }

    pub fn update_screech_content(&self, screech: &mut ScreechRow, content: &str) -> Result<()> {
        self.with_conn(|conn| {
            let now = timestamp();
            conn.execute(
                "UPDATE screeches SET content = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![content, &now, screech.id],
            )?;
            screech.content = content.to_string();
            screech.updated_at = now;
            Ok(())
        })
    }

    /// List screeches by creation time, optionally restricted to one owner.
    /// Rows created within the same timestamp keep insertion order.
    pub fn list_screeches(&self, user_id: Option<i64>, order: SortOrder, limit: u32) -> Result<Vec<ScreechRow>> {
        self.with_conn(|conn| query_screeches(conn, user_id, order, limit))
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_user_by(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
    let row = conn.query_row(&sql, [value], user_from_row).optional()?;
    Ok(row)
}

fn query_screeches(conn: &Connection, user_id: Option<i64>, order: SortOrder, limit: u32) -> Result<Vec<ScreechRow>> {
    let direction = match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    let sql = format!(
        "{SCREECH_SELECT}
         WHERE (?1 IS NULL OR s.user_id = ?1)
         ORDER BY s.created_at {direction}, s.id {direction}
         LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params![user_id, limit], screech_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        public_id: row.get(1)?,
        token: row.get(2)?,
        username: row.get(3)?,
        first_name: row.get(4)?,
        last_name: row.get(5)?,
        image_url: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn screech_from_row(row: &Row<'_>) -> rusqlite::Result<ScreechRow> {
    Ok(ScreechRow {
        id: row.get(0)?,
        public_id: row.get(1)?,
        user_id: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        username: row.get(6)?,
        owner_token: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_unique_violation;

    fn new_user<'a>(username: &'a str, public_id: &'a str, token: &'a str) -> NewUser<'a> {
        NewUser {
            public_id,
            token,
            username,
            first_name: "First",
            last_name: "Last",
            image_url: "",
        }
    }

    #[test]
    fn create_and_find_user() {
        let db = Database::open_in_memory().unwrap();
        let created = db.create_user(&new_user("ada", "pid1", "tok1")).unwrap();

        let by_id = db.get_user_by_public_id("pid1").unwrap().unwrap();
        assert_eq!(by_id.id, created.id);
        assert_eq!(db.get_user_by_token("tok1").unwrap().unwrap().username, "ada");
        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn find_user_requires_all_filters_to_match() {
        let db = Database::open_in_memory().unwrap();
        db.create_user(&new_user("ada", "pid1", "tok1")).unwrap();
        db.create_user(&new_user("bob", "pid2", "tok2")).unwrap();

        assert_eq!(db.find_user(Some("pid2"), None).unwrap().unwrap().username, "bob");
        assert_eq!(db.find_user(None, Some("ada")).unwrap().unwrap().public_id, "pid1");
        assert!(db.find_user(Some("pid1"), Some("bob")).unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_unique_violation() {
        let db = Database::open_in_memory().unwrap();
        db.create_user(&new_user("ada", "pid1", "tok1")).unwrap();

        let err = db.create_user(&new_user("ada", "pid2", "tok2")).unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn update_user_persists_fields() {
        let db = Database::open_in_memory().unwrap();
        let mut user = db.create_user(&new_user("ada", "pid1", "tok1")).unwrap();

        user.first_name = "Augusta".into();
        db.update_user(&mut user).unwrap();

        let stored = db.get_user_by_public_id("pid1").unwrap().unwrap();
        assert_eq!(stored.first_name, "Augusta");
        assert_eq!(stored.token, "tok1");
    }

    #[test]
    fn screech_requires_existing_owner() {
        let db = Database::open_in_memory().unwrap();
        let mut ghost = db.create_user(&new_user("ada", "pid1", "tok1")).unwrap();
        ghost.id += 100;

        assert!(db.insert_screech("s1", &ghost, "hello").is_err());
    }

    #[test]
    fn list_screeches_orders_and_filters() {
        let db = Database::open_in_memory().unwrap();
        let ada = db.create_user(&new_user("ada", "pid1", "tok1")).unwrap();
        let bob = db.create_user(&new_user("bob", "pid2", "tok2")).unwrap();

        db.insert_screech("s1", &ada, "one").unwrap();
        db.insert_screech("s2", &bob, "two").unwrap();
        db.insert_screech("s3", &ada, "three").unwrap();

        let desc = db.list_screeches(None, SortOrder::Desc, 50).unwrap();
        let ids: Vec<_> = desc.iter().map(|s| s.public_id.as_str()).collect();
        assert_eq!(ids, ["s3", "s2", "s1"]);

        let asc = db.list_screeches(None, SortOrder::Asc, 2).unwrap();
        let ids: Vec<_> = asc.iter().map(|s| s.public_id.as_str()).collect();
        assert_eq!(ids, ["s1", "s2"]);

        let adas = db.list_screeches(Some(ada.id), SortOrder::Asc, 50).unwrap();
        assert_eq!(adas.len(), 2);
        assert!(adas.iter().all(|s| s.username == "ada"));
    }

    #[test]
    fn update_screech_content_persists() {
        let db = Database::open_in_memory().unwrap();
        let ada = db.create_user(&new_user("ada", "pid1", "tok1")).unwrap();
        let mut screech = db.insert_screech("s1", &ada, "one").unwrap();

        db.update_screech_content(&mut screech, "uno").unwrap();

        let stored = db.get_screech_by_public_id("s1").unwrap().unwrap();
        assert_eq!(stored.content, "uno");
        assert_eq!(stored.owner_token, "tok1");
    }
}
