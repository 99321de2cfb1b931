use std::sync::Arc;

use sqlx::Error;

use crate::configs::Storage;
use crate::models::Credential;

pub struct CredentialRepository {
    storage: Arc<Storage>,
}

impl CredentialRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub async fn get(&self) -> Result<Option<Credential>, Error> {
        let credential: Option<Credential> =
            sqlx::query_as("SELECT * FROM credentials WHERE id = 1")
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(credential)
    }

    pub async fn upsert(&self, password_hash: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO credentials (id, password_hash)
            VALUES (1, $1)
            ON CONFLICT (id) DO UPDATE SET password_hash = excluded.password_hash
            "#,
        )
        .bind(password_hash)
        .execute(self.storage.get_pool())
        .await?;

        Ok(())
    }
}
