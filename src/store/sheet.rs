use anyhow::Context;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use serde_json::{Map, Value};

use crate::models::booking::{
    COL_REJECTION_COMMENTS, COL_REJECTION_DATE, COL_REJECTION_REASON, STATUS_REJECTED,
};
use crate::models::{canonical_id, NewBooking, Rejection};

/// The tabular booking store: one table whose column list is the header
/// row and whose rowid order is the insertion order. Columns are only
/// ever appended, never renamed or dropped.
pub struct SheetStore {
    conn: Connection,
}

impl SheetStore {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open booking sheet")?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("failed to set sheet pragmas")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER,
                name TEXT,
                email TEXT,
                phone TEXT,
                roomType TEXT,
                checkIn TEXT,
                checkOut TEXT,
                message TEXT,
                status TEXT,
                createdAt TEXT,
                price REAL
            );",
        )
        .context("failed to create bookings sheet")?;

        Ok(Self { conn })
    }

    /// Current header, in column order.
    pub fn columns(&self) -> rusqlite::Result<Vec<String>> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(bookings)")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Idempotent column append: returns the index of `name`, adding it
    /// at the end of the header (empty-valued) if it does not exist.
    pub fn ensure_column(&self, name: &str) -> rusqlite::Result<usize> {
        let columns = self.columns()?;
        if let Some(idx) = columns.iter().position(|c| c == name) {
            return Ok(idx);
        }
        let quoted = name.replace('"', "\"\"");
        self.conn.execute_batch(&format!(
            "ALTER TABLE bookings ADD COLUMN \"{quoted}\" TEXT DEFAULT ''"
        ))?;
        Ok(columns.len())
    }

    /// All rows in insertion order, each as a column-name → value map in
    /// header order. NULL cells (rows older than a later-added column)
    /// surface as empty strings.
    pub fn read_all(&self) -> rusqlite::Result<Vec<Map<String, Value>>> {
        let mut stmt = self.conn.prepare("SELECT * FROM bookings ORDER BY rowid")?;
        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut obj = Map::new();
            for (i, name) in names.iter().enumerate() {
                let value = match row.get_ref(i)? {
                    ValueRef::Null => Value::String(String::new()),
                    ValueRef::Integer(n) => Value::from(n),
                    ValueRef::Real(f) => serde_json::Number::from_f64(f)
                        .map(Value::Number)
                        .unwrap_or_else(|| Value::String(f.to_string())),
                    ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
                    ValueRef::Blob(_) => Value::String(String::new()),
                };
                obj.insert(name.clone(), value);
            }
            out.push(obj);
        }
        Ok(out)
    }

    pub fn append(&self, booking: &NewBooking) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO bookings (id, name, email, phone, roomType, checkIn, checkOut, message, status, createdAt, price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                booking.id,
                booking.name,
                booking.email,
                booking.phone,
                booking.room_type,
                booking.check_in,
                booking.check_out,
                booking.message,
                booking.status,
                booking.created_at,
                booking.price,
            ],
        )?;
        Ok(())
    }

    /// Overwrite the status of the first row whose id matches
    /// `booking_id` (numeric-or-string tolerant). Returns false when no
    /// row matches; nothing is written in that case, including columns.
    /// A rejected status appends the three rejection columns if absent
    /// and writes whichever rejection values were supplied.
    pub fn update_status(
        &self,
        booking_id: &str,
        status: &str,
        rejection: &Rejection,
    ) -> rusqlite::Result<bool> {
        let want = canonical_id(booking_id);

        let ids: Vec<(i64, String)> = {
            let mut stmt = self
                .conn
                .prepare("SELECT rowid, id FROM bookings ORDER BY rowid")?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let rowid: i64 = row.get(0)?;
                let id = match row.get_ref(1)? {
                    ValueRef::Integer(n) => n.to_string(),
                    ValueRef::Real(f) => canonical_id(&f.to_string()),
                    ValueRef::Text(t) => canonical_id(&String::from_utf8_lossy(t)),
                    _ => String::new(),
                };
                out.push((rowid, id));
            }
            out
        };

        let Some(rowid) = ids
            .iter()
            .find(|(_, id)| *id == want)
            .map(|(rowid, _)| *rowid)
        else {
            return Ok(false);
        };

        self.conn.execute(
            "UPDATE bookings SET status = ?1 WHERE rowid = ?2",
            params![status, rowid],
        )?;

        if status == STATUS_REJECTED {
            self.ensure_column(COL_REJECTION_REASON)?;
            self.ensure_column(COL_REJECTION_COMMENTS)?;
            self.ensure_column(COL_REJECTION_DATE)?;

            let cells = [
                (COL_REJECTION_REASON, rejection.reason.as_deref()),
                (COL_REJECTION_COMMENTS, rejection.comments.as_deref()),
                (COL_REJECTION_DATE, rejection.date.as_deref()),
            ];
            for (column, value) in cells {
                if let Some(value) = value {
                    self.conn.execute(
                        &format!("UPDATE bookings SET \"{column}\" = ?1 WHERE rowid = ?2"),
                        params![value, rowid],
                    )?;
                }
            }
        }

        Ok(true)
    }
}
