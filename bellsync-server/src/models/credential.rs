use crate::models::Table;

/// The single owner credential. The argon2 PHC string embeds the salt.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credential {
    pub id: i32,
    pub password_hash: String,
}

pub struct CredentialTable;

impl Table for CredentialTable {
    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS credentials (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                password_hash TEXT NOT NULL
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS credentials;")
    }
}
