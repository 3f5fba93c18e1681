//! Account service for registration, authentication and session management

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::domain::account::{validate_username, Account, AccountId, AccountRepository};
use crate::domain::security::SecurityPolicy;
use crate::domain::token::{CallerIdentity, TokenAuthority};
use crate::domain::user::{validate_email, validate_profile, User, UserId, UserProfile, UserRepository};
use crate::domain::{DomainError, EntityKind};

/// Request for registering a new account and its user profile
#[derive(Clone)]
pub struct RegisterAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub zip_code: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegisterAccountRequest {
    fn profile(&self) -> UserProfile {
        UserProfile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address1: self.address1.clone(),
            address2: self.address2.clone(),
            zip_code: self.zip_code.clone(),
            email: self.email.clone(),
        }
    }
}

impl std::fmt::Debug for RegisterAccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterAccountRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[hidden]")
            .finish_non_exhaustive()
    }
}

/// Request for changing an account's password
#[derive(Clone)]
pub struct ChangePasswordRequest {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

impl std::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordRequest")
            .field("username", &self.username)
            .field("passwords", &"[hidden]")
            .finish()
    }
}

/// Request for updating the contact details behind an account
#[derive(Debug, Clone)]
pub struct UpdateAccountRequest {
    pub account_id: AccountId,
    pub address1: String,
    /// Left unchanged when `None`
    pub address2: Option<String>,
    pub zip_code: String,
    pub email: String,
}

/// Orchestrates accounts, user profiles, the security policy and the
/// token authority
#[derive(Debug)]
pub struct AccountService<A, U, S, T>
where
    A: AccountRepository,
    U: UserRepository,
    S: SecurityPolicy,
    T: TokenAuthority,
{
    accounts: Arc<A>,
    users: Arc<U>,
    security: Arc<S>,
    tokens: Arc<T>,
}

impl<A, U, S, T> AccountService<A, U, S, T>
where
    A: AccountRepository,
    U: UserRepository,
    S: SecurityPolicy,
    T: TokenAuthority,
{
    /// Create a new account service
    pub fn new(accounts: Arc<A>, users: Arc<U>, security: Arc<S>, tokens: Arc<T>) -> Self {
        Self {
            accounts,
            users,
            security,
            tokens,
        }
    }

    /// Register a user profile and the account that owns it
    ///
    /// No session is started; call [`Self::authenticate`] afterwards.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn register(&self, request: RegisterAccountRequest) -> Result<Account, DomainError> {
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;

        let profile = request.profile();
        validate_profile(&profile).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.users.search(&profile).await?.is_some() {
            return Err(DomainError::already_exists(
                EntityKind::User,
                "A user with this profile is already registered",
            ));
        }

        if !self
            .security
            .confirmation_matches(&request.password, &request.password_confirm)
        {
            return Err(DomainError::CredentialMismatch);
        }

        self.security.is_valid(&request.password)?;

        if self
            .accounts
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(DomainError::already_exists(
                EntityKind::Account,
                format!("Username '{}' already exists", request.username),
            ));
        }

        let password_hash = self.security.hash(&request.password)?;

        let user = self.users.create(User::new(profile)).await?;
        let account = Account::new(&request.username, password_hash, *user.id());

        match self.accounts.create(account).await {
            Ok(account) => {
                info!(account_id = %account.id(), "Account registered");
                Ok(account)
            }
            Err(e) => {
                warn!(error = %e, "Account creation failed, removing new user profile");
                self.discard_user(user.id()).await;
                Err(e)
            }
        }
    }

    /// Verify credentials and start a new session, returning its token
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, DomainError> {
        let mut account = self.require_by_username(username).await?;

        if !self
            .security
            .verify_password_matches(account.password_hash(), password)
        {
            warn!("Rejected login with invalid password");
            return Err(DomainError::unauthorized("Invalid username or password"));
        }

        let token = self.tokens.generate_token(&account)?;
        account.record_login(&token);
        self.accounts.update(&account).await?;

        info!(account_id = %account.id(), "Account authenticated");

        Ok(token)
    }

    /// Replace an account's password after re-verifying the current one
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn change_password(&self, request: ChangePasswordRequest) -> Result<(), DomainError> {
        if !self
            .security
            .confirmation_matches(&request.new_password, &request.new_password_confirm)
        {
            return Err(DomainError::CredentialMismatch);
        }

        let mut account = self.require_by_username(&request.username).await?;

        if !self
            .security
            .verify_password_matches(account.password_hash(), &request.old_password)
        {
            warn!("Rejected password change with invalid current password");
            return Err(DomainError::unauthorized("Current password is incorrect"));
        }

        self.security.is_valid(&request.new_password)?;
        self.security
            .ensure_distinct(account.password_hash(), &request.new_password)?;

        let new_hash = self.security.hash(&request.new_password)?;
        account.set_password_hash(new_hash);
        self.accounts.update(&account).await?;

        info!(account_id = %account.id(), "Password changed");

        Ok(())
    }

    /// Delete an account after re-verifying its password
    ///
    /// The linked user profile is deleted with it. Once the account is gone
    /// the deletion succeeds even if removing the profile fails; that failure
    /// is only logged.
    #[instrument(skip(self, password))]
    pub async fn delete(&self, account_id: &AccountId, password: &str) -> Result<(), DomainError> {
        let account = self.require_by_id(account_id).await?;

        if !self
            .security
            .verify_password_matches(account.password_hash(), password)
        {
            warn!("Rejected account deletion with invalid password");
            return Err(DomainError::unauthorized("Password incorrect"));
        }

        if !self.accounts.delete(account_id).await? {
            return Err(DomainError::not_found(
                EntityKind::Account,
                format!("Account '{}' not found", account_id),
            ));
        }

        match self.users.delete(account.user_id()).await {
            Ok(true) => {}
            Ok(false) => warn!(user_id = %account.user_id(), "Deleted account had no user profile"),
            Err(e) => error!(
                user_id = %account.user_id(),
                error = %e,
                "Failed to remove user profile of deleted account"
            ),
        }

        info!("Account deleted");

        Ok(())
    }

    /// Issue a new session token for an authenticated caller
    ///
    /// The previous token stops resolving as soon as the new one is stored.
    #[instrument(skip_all, fields(username = %caller.username()))]
    pub async fn refresh_authorization(&self, caller: &CallerIdentity) -> Result<String, DomainError> {
        let mut account = self.require_by_username(caller.username()).await?;

        if account.id() != caller.account_id() {
            return Err(DomainError::unauthorized(
                "Session belongs to a different account",
            ));
        }

        let token = self.tokens.generate_token(&account)?;
        account.replace_token(&token);
        self.accounts.update(&account).await?;

        debug!(account_id = %account.id(), "Session token refreshed");

        Ok(token)
    }

    /// End the caller's session
    #[instrument(skip_all, fields(username = %caller.username()))]
    pub async fn sign_out(&self, caller: &CallerIdentity) -> Result<(), DomainError> {
        let mut account = self.require_by_id(caller.account_id()).await?;

        account.clear_token();
        self.accounts.update(&account).await?;

        debug!(account_id = %account.id(), "Session ended");

        Ok(())
    }

    /// Resolve a presented bearer token into the caller it authenticates
    ///
    /// The token must be valid for the authority and still be the account's
    /// live session token.
    #[instrument(skip_all)]
    pub async fn resolve_caller(&self, token: &str) -> Result<CallerIdentity, DomainError> {
        self.tokens.token_valid(token)?;

        let claims = self.tokens.extract_claims(token)?;
        let caller = CallerIdentity::from_claims(&claims)?;

        let account = self
            .accounts
            .find_by_token(token)
            .await?
            .ok_or_else(|| DomainError::unauthorized("Session is no longer active"))?;

        if account.id() != caller.account_id() {
            return Err(DomainError::unauthorized(
                "Token does not belong to the session holder",
            ));
        }

        Ok(caller)
    }

    /// Update the contact details of the user behind an account
    #[instrument(skip_all, fields(account_id = %request.account_id))]
    pub async fn update(&self, request: UpdateAccountRequest) -> Result<User, DomainError> {
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut account = self.require_by_id(&request.account_id).await?;
        account.touch();
        self.accounts.update(&account).await?;

        let mut user = self.users.get(account.user_id()).await?.ok_or_else(|| {
            DomainError::not_found(
                EntityKind::User,
                format!("User '{}' not found", account.user_id()),
            )
        })?;

        user.set_address(request.address1, request.address2);
        user.set_zip_code(request.zip_code);
        user.set_email(request.email);

        let user = self.users.update(&user).await?;

        info!(user_id = %user.id(), "Account details updated");

        Ok(user)
    }

    /// List every account
    pub async fn list(&self) -> Result<Vec<Account>, DomainError> {
        self.accounts.list().await
    }

    /// Get an account by username
    pub async fn find_by_username(&self, username: &str) -> Result<Account, DomainError> {
        self.require_by_username(username).await
    }

    /// Get the account holding a session token
    pub async fn find_by_token(&self, token: &str) -> Result<Account, DomainError> {
        self.accounts
            .find_by_token(token)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Account, "No account holds this token"))
    }

    async fn require_by_username(&self, username: &str) -> Result<Account, DomainError> {
        self.accounts
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(
                    EntityKind::Account,
                    format!("Account '{}' not found", username),
                )
            })
    }

    async fn require_by_id(&self, id: &AccountId) -> Result<Account, DomainError> {
        self.accounts.get(id).await?.ok_or_else(|| {
            DomainError::not_found(EntityKind::Account, format!("Account '{}' not found", id))
        })
    }

    /// Compensating delete for a user whose account could not be stored
    async fn discard_user(&self, user_id: &UserId) {
        match self.users.delete(user_id).await {
            Ok(true) => debug!(user_id = %user_id, "Removed orphaned user profile"),
            Ok(false) => warn!(user_id = %user_id, "Orphaned user profile already gone"),
            Err(e) => error!(user_id = %user_id, error = %e, "Failed to remove orphaned user profile"),
        }
    }
}
