use async_trait::async_trait;
use pvault_core::{Principal, TokenDigest, UserStore, VaultError, VaultResult};
use std::sync::Arc;

/// Pulls the token out of an `Authorization` header value.
///
/// The scheme name is matched case-insensitively. Returns `VaultError::Unauthorized` if the
/// header is absent, uses another scheme, or carries an empty token.
pub fn extract_bearer_token(header: Option<&str>) -> VaultResult<&str> {
    let value = header.ok_or(VaultError::Unauthorized)?;
    let (scheme, token) = value
        .trim_start()
        .split_once(' ')
        .ok_or(VaultError::Unauthorized)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(VaultError::Unauthorized);
    }
    Ok(token)
}

/// Resolves a bearer token to the principal it was issued to.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> VaultResult<Principal>;
}

/// Authenticates against the users in a [`UserStore`], matching on the token's digest.
#[derive(Clone)]
pub struct StoreAuthenticator {
    users: Arc<dyn UserStore>,
}

impl StoreAuthenticator {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Authenticator for StoreAuthenticator {
    async fn authenticate(&self, token: &str) -> VaultResult<Principal> {
        let digest = TokenDigest::of(token);
        match self.users.find_user_by_token_digest(&digest).await? {
            Some(user) => Ok(Principal::new(user.id)),
            None => {
                tracing::warn!("rejected bearer token with unknown digest");
                Err(VaultError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvault_core::{
        EmailAddress, ErrorKind, HashedPassword, MemoryStore, MobileNumber, NewUser,
        NonEmptyText, PatientSchema,
    };

    #[test]
    fn bearer_header_is_parsed() {
        assert_eq!(extract_bearer_token(Some("Bearer abc123")).unwrap(), "abc123");
        assert_eq!(extract_bearer_token(Some("bearer  abc123 ")).unwrap(), "abc123");
    }

    #[test]
    fn bad_headers_are_unauthorized() {
        for header in [
            None,
            Some("abc123"),
            Some("Basic abc123"),
            Some("Bearer "),
            Some("Bearer"),
        ] {
            let err = extract_bearer_token(header).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unauthorized, "{header:?}");
        }
    }

    #[tokio::test]
    async fn store_authenticator_resolves_known_tokens() {
        let store = Arc::new(MemoryStore::new(PatientSchema::default()));
        let user = store
            .insert_user(NewUser {
                email: EmailAddress::parse("ada@example.com").unwrap(),
                name: NonEmptyText::new("Ada").unwrap(),
                national_id: NonEmptyText::new("AB123456C").unwrap(),
                mobile_number: MobileNumber::parse("07700900123").unwrap(),
                hashed_password: HashedPassword::new("hash"),
                token_digest: Some(TokenDigest::of("good-token")),
            })
            .await
            .unwrap();

        let auth = StoreAuthenticator::new(store);
        let principal = auth.authenticate("good-token").await.unwrap();
        assert_eq!(principal.user_id(), user.id);

        let err = auth.authenticate("bad-token").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }
}
