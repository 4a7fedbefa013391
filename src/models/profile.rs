/// A family member's ledger. Every transaction belongs to one profile.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Option<i64>,
    pub user_id: String,
    pub name: String,
    pub created_at: String,
}

impl Profile {
    pub const DEFAULT_NAME: &'static str = "Família";

    pub fn new(user_id: String, name: String) -> Self {
        Self {
            id: None,
            user_id,
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Find a profile by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(profiles: &'a [Profile], name: &str) -> Option<&'a Profile> {
        let lower = name.to_lowercase();
        profiles.iter().find(|p| p.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
