use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::admin::errors::AdminError;
use crate::domain::admin::models::Credential;
use crate::domain::admin::models::Username;
use crate::domain::admin::ports::CredentialStore;

/// Process-local credential store. Setup state is lost on restart.
pub struct InMemoryCredentialStore {
    credential: RwLock<Credential>,
}

impl InMemoryCredentialStore {
    /// Start unconfigured under the given default username.
    pub fn new(default_username: Username) -> Self {
        Self {
            credential: RwLock::new(Credential::unconfigured(default_username)),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Credential, AdminError> {
        Ok(self.credential.read().await.clone())
    }

    async fn initialize(
        &self,
        username: Username,
        password_hash: String,
    ) -> Result<Credential, AdminError> {
        let mut credential = self.credential.write().await;
        if credential.is_configured() {
            return Err(AdminError::AlreadyConfigured);
        }

        credential.username = username;
        credential.password_hash = Some(password_hash);

        Ok(credential.clone())
    }

    async fn update_password_hash(&self, password_hash: String) -> Result<(), AdminError> {
        let mut credential = self.credential.write().await;
        if !credential.is_configured() {
            return Err(AdminError::SetupRequired);
        }

        credential.password_hash = Some(password_hash);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn store() -> InMemoryCredentialStore {
        InMemoryCredentialStore::new(Username::new("admin".to_string()).unwrap())
    }

    #[tokio::test]
    async fn test_starts_unconfigured() {
        let credential = store().load().await.unwrap();

        assert!(!credential.is_configured());
        assert_eq!(credential.username.as_str(), "admin");
    }

    #[tokio::test]
    async fn test_initialize_only_once() {
        let store = store();
        let editor = Username::new("editor".to_string()).unwrap();

        let stored = store
            .initialize(editor.clone(), "hash-1".to_string())
            .await
            .unwrap();
        assert_eq!(stored.username, editor);

        let second = store
            .initialize(editor, "hash-2".to_string())
            .await
            .unwrap_err();
        assert_eq!(second, AdminError::AlreadyConfigured);
        assert_eq!(
            store.load().await.unwrap().password_hash.as_deref(),
            Some("hash-1")
        );
    }

    #[tokio::test]
    async fn test_concurrent_initialize_has_one_winner() {
        let store = Arc::new(store());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .initialize(
                            Username::new("admin".to_string()).unwrap(),
                            format!("hash-{}", i),
                        )
                        .await
                })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_update_requires_setup() {
        let store = store();

        assert_eq!(
            store
                .update_password_hash("hash".to_string())
                .await
                .unwrap_err(),
            AdminError::SetupRequired
        );

        store
            .initialize(Username::new("admin".to_string()).unwrap(), "old".to_string())
            .await
            .unwrap();
        store.update_password_hash("new".to_string()).await.unwrap();

        assert_eq!(
            store.load().await.unwrap().password_hash.as_deref(),
            Some("new")
        );
    }
}
