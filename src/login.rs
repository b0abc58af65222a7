pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Mock login gate. Only the fixed admin pair gets in.
pub fn check_credentials(email: &str, password: &str) -> bool {
    email == ADMIN_EMAIL && password == ADMIN_PASSWORD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_pair_is_accepted() {
        assert!(check_credentials("admin@example.com", "admin123"));
    }

    #[test]
    fn anything_else_is_rejected() {
        assert!(!check_credentials("admin@example.com", "admin1234"));
        assert!(!check_credentials("Admin@example.com", "admin123"));
        assert!(!check_credentials("alice@example.com", "password123"));
        assert!(!check_credentials("", ""));
    }
}
