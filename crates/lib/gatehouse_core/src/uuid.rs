// Account ids are UUIDv7, generated app-side so that ids sort by creation
// time in both the PostgreSQL and in-memory repositories.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse an account id from its textual form.
pub fn parse_account_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuidv7_is_valid() {
        let id = uuidv7();
        assert_eq!(id.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn uuidv7_is_monotonic() {
        let a = uuidv7();
        let b = uuidv7();
        assert!(b >= a);
    }

    #[test]
    fn parse_account_id_round_trips_display() {
        let id = uuidv7();
        assert_eq!(parse_account_id(&id.to_string()), Some(id));
        assert_eq!(parse_account_id("not-a-uuid"), None);
    }
}
