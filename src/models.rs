use crate::errors::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    pub lastname: String,
    pub age: u32,
    pub email: String,
    pub password: String,
}

impl UserRecord {
    fn seed(id: u64, name: &str, lastname: &str, age: u32, email: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            lastname: lastname.to_string(),
            age,
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }
}

/// Candidate record for `UserStore::add`. The id is always assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub lastname: String,
    pub age: i64,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(name: &str, lastname: &str, age: i64, email: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            lastname: lastname.to_string(),
            age,
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// Partial update. There is no email field: emails are immutable once stored.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub age: Option<i64>,
    pub password: Option<String>,
}

/// Parses an age typed into a form field.
pub fn parse_age(raw: &str) -> Result<i64, StoreError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| StoreError::validation("age", "must be a whole number"))
}

/// Age as stored, rejecting zero, negatives and anything past `u32`.
pub fn positive_age(age: i64) -> Result<u32, StoreError> {
    if age <= 0 {
        return Err(StoreError::validation("age", "must be greater than zero"));
    }
    u32::try_from(age).map_err(|_| StoreError::validation("age", "is out of range"))
}

pub fn seed_users() -> Vec<UserRecord> {
    vec![
        UserRecord::seed(1, "Alice", "Smith", 28, "alice@example.com"),
        UserRecord::seed(2, "Bob", "Johnson", 35, "bob@example.com"),
        UserRecord::seed(3, "Carlos", "Pereira", 22, "carlos@example.com"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_age_accepts_padded_numbers() {
        assert_eq!(parse_age(" 42 ").unwrap(), 42);
        assert_eq!(parse_age("-3").unwrap(), -3);
    }

    #[test]
    fn parse_age_rejects_text() {
        let err = parse_age("forty").unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "age", .. }));
        assert!(parse_age("").is_err());
        assert!(parse_age("31 years").is_err());
        assert!(parse_age("3.7").is_err());
    }

    #[test]
    fn positive_age_bounds() {
        assert_eq!(positive_age(1).unwrap(), 1);
        assert!(positive_age(0).is_err());
        assert!(positive_age(-7).is_err());
        assert!(positive_age(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn seed_has_three_distinct_users() {
        let users = seed_users();
        assert_eq!(users.len(), 3);
        assert_eq!(
            users.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(users[1].name, "Bob");
        assert!(users.iter().all(|u| u.password == "password123"));
    }
}
