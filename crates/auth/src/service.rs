//! Registration, login, and current-identity resolution.

use std::sync::OnceLock;

use chrono::Duration;

use userauth_core::{LoginRecord, User};
use userauth_store::{LoginStore, UserLookup, UserStore};

use crate::{AuthError, TokenCodec, hasher};

/// Registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
    pub surname: String,
}

/// Orchestrates credential verification and token issuance over the store
/// collaborators. Stateless apart from configuration; safe to clone per
/// request.
#[derive(Debug, Clone)]
pub struct AuthService<U, L> {
    users: U,
    logins: L,
    tokens: TokenCodec,
    token_ttl: Duration,
}

/// Digest verified when a login names an unknown user, so the miss path
/// pays roughly the same hashing cost as the hit path (timing hardening,
/// not a guarantee).
fn decoy_digest() -> &'static str {
    static DECOY: OnceLock<String> = OnceLock::new();
    DECOY.get_or_init(|| {
        hasher::hash_password("decoy-password").unwrap_or_default()
    })
}

impl<U, L> AuthService<U, L>
where
    U: UserStore,
    L: LoginStore,
{
    pub fn new(users: U, logins: L, tokens: TokenCodec, token_ttl: Duration) -> Self {
        Self {
            users,
            logins,
            tokens,
            token_ttl,
        }
    }

    /// Register a new account with the default role.
    ///
    /// Uniqueness is checked username-first: when both collide, the username
    /// conflict is the one reported.
    pub fn register(&self, new_user: NewUser) -> Result<User, AuthError> {
        if self
            .users
            .find(UserLookup::Username(&new_user.username))?
            .is_some()
        {
            return Err(AuthError::UsernameTaken);
        }

        if self.users.find(UserLookup::Email(&new_user.email))?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hasher::hash_password(&new_user.password)?;
        let user = User::new(
            new_user.username,
            new_user.email,
            new_user.name,
            new_user.surname,
            password_hash,
        );

        let user = self.users.insert(user)?;
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Verify a username/password pair.
    ///
    /// `None` for both unknown usernames and wrong passwords; the caller
    /// cannot tell which. The unknown-username path still runs one password
    /// verification against a decoy digest.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AuthError> {
        let Some(user) = self.users.find(UserLookup::Username(username))? else {
            let _ = hasher::verify_password(password, decoy_digest());
            return Ok(None);
        };

        if !hasher::verify_password(password, &user.password_hash) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Log in: verify credentials, issue a bearer token, record the login.
    ///
    /// A failed login records nothing.
    pub fn login(&self, username: &str, password: &str) -> Result<(String, User), AuthError> {
        let user = self
            .authenticate(username, password)?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.tokens.issue(&user.username, self.token_ttl)?;
        self.logins.insert(LoginRecord::new(user.id))?;

        tracing::info!(user_id = %user.id, "login recorded");
        Ok((token, user))
    }

    /// Resolve a bearer token to its current user.
    ///
    /// An invalid/expired token and a subject that no longer exists (deleted
    /// account) are indistinguishable to the caller.
    pub fn resolve_current(&self, token: &str) -> Result<User, AuthError> {
        let subject = self.tokens.verify(token)?;

        self.users
            .find(UserLookup::Username(&subject))?
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use userauth_core::Role;
    use userauth_store::{InMemoryLoginStore, InMemoryUserStore};

    type TestService = AuthService<Arc<InMemoryUserStore>, Arc<InMemoryLoginStore>>;

    fn service() -> (TestService, Arc<InMemoryUserStore>, Arc<InMemoryLoginStore>) {
        let users = Arc::new(InMemoryUserStore::new());
        let logins = Arc::new(InMemoryLoginStore::new());
        let service = AuthService::new(
            users.clone(),
            logins.clone(),
            TokenCodec::new(b"test-secret"),
            Duration::minutes(30),
        );
        (service, users, logins)
    }

    fn alice() -> NewUser {
        NewUser {
            username: "alice".to_string(),
            password: "wonderland".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            surname: "Liddell".to_string(),
        }
    }

    #[test]
    fn register_creates_normal_user_with_hashed_password() {
        let (service, _, _) = service();
        let user = service.register(alice()).unwrap();

        assert_eq!(user.role, Role::Normal);
        assert_ne!(user.password_hash, "wonderland");
        assert!(hasher::verify_password("wonderland", &user.password_hash));
    }

    #[test]
    fn username_conflict_wins_over_email_conflict() {
        let (service, _, _) = service();
        service.register(alice()).unwrap();

        // Same username AND same email: username is reported.
        let err = service.register(alice()).unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));

        // Same email, new username: email is reported.
        let mut bob = alice();
        bob.username = "bob".to_string();
        let err = service.register(bob).unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        // Same username, new email: username is reported.
        let mut carol = alice();
        carol.email = "carol@example.com".to_string();
        let err = service.register(carol).unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[test]
    fn authenticate_returns_none_for_unknown_user_and_bad_password() {
        let (service, _, _) = service();
        service.register(alice()).unwrap();

        assert!(service.authenticate("nobody", "wonderland").unwrap().is_none());
        assert!(service.authenticate("alice", "wrong").unwrap().is_none());
        assert!(service.authenticate("alice", "wonderland").unwrap().is_some());
    }

    #[test]
    fn login_issues_token_and_records_exactly_one_login() {
        let (service, _, logins) = service();
        let user = service.register(alice()).unwrap();

        let (token, logged_in) = service.login("alice", "wonderland").unwrap();
        assert_eq!(logged_in.id, user.id);

        let records = logins.list(Some(user.id)).unwrap();
        assert_eq!(records.len(), 1);

        let resolved = service.resolve_current(&token).unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[test]
    fn failed_login_records_nothing() {
        let (service, _, logins) = service();
        let user = service.register(alice()).unwrap();

        let err = service.login("alice", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(logins.list(Some(user.id)).unwrap().is_empty());
    }

    #[test]
    fn token_for_deleted_user_resolves_to_invalid_token() {
        let (service, users, _) = service();
        let user = service.register(alice()).unwrap();
        let (token, _) = service.login("alice", "wonderland").unwrap();

        users.delete(user.id).unwrap();

        let err = service.resolve_current(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn garbage_token_resolves_to_invalid_token() {
        let (service, _, _) = service();
        let err = service.resolve_current("not.a.token").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
