use crate::errors::{StoreError, StoreResult};
use crate::models::{NewUser, UserPatch, UserRecord, positive_age, seed_users};

/// In-memory user records, kept in insertion order.
///
/// Ids and emails are unique. Ids come from `max(id) + 1`, which is only sound
/// with a single caller; the store is owned by one dashboard and never shared.
#[derive(Debug, Default)]
pub struct UserStore {
    users: Vec<UserRecord>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the three demo users (ids 1-3).
    pub fn seeded() -> Self {
        Self { users: seed_users() }
    }

    pub fn list(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn find_by_id(&self, id: u64) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn add(&mut self, candidate: NewUser) -> StoreResult<UserRecord> {
        let NewUser {
            name,
            lastname,
            age,
            email,
            password,
        } = candidate;

        require("name", &name)?;
        require("lastname", &lastname)?;
        let age = positive_age(age)?;
        require("email", &email)?;
        require("password", &password)?;

        if self.find_by_email(&email).is_some() {
            tracing::debug!("Rejected new user, e-mail {} already registered", email);
            return Err(StoreError::DuplicateEmail { email });
        }

        let record = UserRecord {
            id: self.next_id(),
            name,
            lastname,
            age,
            email,
            password,
        };
        tracing::info!("Added user {} <{}>", record.id, record.email);
        self.users.push(record.clone());

        Ok(record)
    }

    pub fn update(&mut self, id: u64, patch: UserPatch) -> StoreResult<UserRecord> {
        let index = self.index_of(id)?;

        // Check everything before writing so a rejected patch changes nothing
        if let Some(name) = &patch.name {
            require("name", name)?;
        }
        if let Some(lastname) = &patch.lastname {
            require("lastname", lastname)?;
        }
        let age = patch.age.map(positive_age).transpose()?;

        let user = &mut self.users[index];
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(lastname) = patch.lastname {
            user.lastname = lastname;
        }
        if let Some(age) = age {
            user.age = age;
        }
        if let Some(password) = patch.password.filter(|p| !p.is_empty()) {
            user.password = password;
        }

        tracing::info!("Updated user {} <{}>", user.id, user.email);
        Ok(user.clone())
    }

    pub fn remove(&mut self, id: u64) -> StoreResult<UserRecord> {
        let index = self.index_of(id)?;
        let removed = self.users.remove(index);
        tracing::info!("Removed user {} <{}>", removed.id, removed.email);

        Ok(removed)
    }

    fn next_id(&self) -> u64 {
        self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }

    fn index_of(&self, id: u64) -> StoreResult<usize> {
        self.users.iter().position(|u| u.id == id).ok_or_else(|| {
            tracing::debug!("No user with id {}", id);
            StoreError::NotFound { id }
        })
    }
}

fn require(field: &'static str, value: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::validation(field, "must not be empty"));
    }
    Ok(())
}
