//! Replica status row as returned by `SHOW SLAVE STATUS`.
//!
//! The column set depends on the server version, so a row is kept as an
//! ordered list of name/value pairs rather than a fixed struct. Values that
//! parse as base-10 integers serialize as JSON numbers; everything else stays
//! a string.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single column value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum StatusValue {
    Integer(i64),
    Text(String),
}

impl StatusValue {
    /// Classify a raw column value. NULL is treated as the empty string.
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = raw.unwrap_or_default();
        match raw.parse::<i64>() {
            Ok(n) => StatusValue::Integer(n),
            Err(_) => StatusValue::Text(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StatusValue::Text(s) => Some(s.as_str()),
            StatusValue::Integer(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StatusValue::Integer(n) => Some(*n),
            StatusValue::Text(_) => None,
        }
    }
}

/// One row of replica status, in server column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRow {
    columns: Vec<(String, StatusValue)>,
}

impl StatusRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column from its raw text. A repeated name overwrites in place.
    pub fn insert_raw(&mut self, name: impl Into<String>, raw: Option<&str>) {
        self.insert(name, StatusValue::parse(raw));
    }

    pub fn insert(&mut self, name: impl Into<String>, value: StatusValue) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&StatusValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// First of `names` present in the row. Used to bridge the
    /// `Slave_*` / `Replica_*` column renames.
    pub fn get_any(&self, names: &[&str]) -> Option<&StatusValue> {
        names.iter().find_map(|name| self.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatusValue)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Option<String>)> for StatusRow {
    fn from_iter<I: IntoIterator<Item = (N, Option<String>)>>(iter: I) -> Self {
        let mut row = StatusRow::new();
        for (name, raw) in iter {
            row.insert_raw(name, raw.as_deref());
        }
        row
    }
}

impl Serialize for StatusRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(StatusValue::parse(Some("42")), StatusValue::Integer(42));
        assert_eq!(StatusValue::parse(Some("0")), StatusValue::Integer(0));
        assert_eq!(StatusValue::parse(Some("-7")), StatusValue::Integer(-7));
        assert_eq!(StatusValue::parse(Some("+3")), StatusValue::Integer(3));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(
            StatusValue::parse(Some("Yes")),
            StatusValue::Text("Yes".to_string())
        );
        assert_eq!(
            StatusValue::parse(Some("db1")),
            StatusValue::Text("db1".to_string())
        );
        // Not base 10, or out of range for i64
        assert_eq!(
            StatusValue::parse(Some("0x1F")),
            StatusValue::Text("0x1F".to_string())
        );
        assert_eq!(
            StatusValue::parse(Some("99999999999999999999")),
            StatusValue::Text("99999999999999999999".to_string())
        );
        assert_eq!(
            StatusValue::parse(Some(" 5")),
            StatusValue::Text(" 5".to_string())
        );
    }

    #[test]
    fn test_parse_null_is_empty_string() {
        assert_eq!(StatusValue::parse(None), StatusValue::Text(String::new()));
        assert_eq!(StatusValue::parse(Some("")), StatusValue::Text(String::new()));
    }

    #[test]
    fn test_serialize_preserves_order_and_types() {
        let row: StatusRow = vec![
            ("Slave_IO_State", Some("Waiting for master to send event".to_string())),
            ("Master_Host", Some("db1".to_string())),
            ("Master_Port", Some("3306".to_string())),
            ("Slave_IO_Running", Some("Yes".to_string())),
            ("Seconds_Behind_Master", Some("5".to_string())),
            ("Last_Error", None),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"Slave_IO_State":"Waiting for master to send event","Master_Host":"db1","Master_Port":3306,"Slave_IO_Running":"Yes","Seconds_Behind_Master":5,"Last_Error":""}"#
        );
    }

    #[test]
    fn test_repeated_column_overwrites_in_place() {
        let mut row = StatusRow::new();
        row.insert_raw("a", Some("1"));
        row.insert_raw("b", Some("x"));
        row.insert_raw("a", Some("2"));

        assert_eq!(row.len(), 2);
        let names: Vec<&str> = row.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&StatusValue::Integer(2)));
    }

    #[test]
    fn test_get_any_prefers_first_name() {
        let mut row = StatusRow::new();
        row.insert_raw("Replica_IO_Running", Some("No"));
        assert_eq!(
            row.get_any(&["Slave_IO_Running", "Replica_IO_Running"])
                .and_then(StatusValue::as_str),
            Some("No")
        );

        row.insert_raw("Slave_IO_Running", Some("Yes"));
        assert_eq!(
            row.get_any(&["Slave_IO_Running", "Replica_IO_Running"])
                .and_then(StatusValue::as_str),
            Some("Yes")
        );
    }
}
