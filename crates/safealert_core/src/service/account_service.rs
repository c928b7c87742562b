//! Account use-case service: registration, login, and session state.
//!
//! # Responsibility
//! - Validate and register accounts with hashed passwords.
//! - Authenticate credentials and persist the signed-in session.
//!
//! # Invariants
//! - Passwords are never stored or logged in clear text.
//! - Unknown email and wrong password produce the same outcome.
//! - Store faults are errors, never a silent `false`.

use crate::model::session::Session;
use crate::model::user::{NewUser, Registration, User};
use crate::model::{require_non_empty, ValidationError};
use crate::password::{hash_password, verify_against_dummy, verify_password, PasswordHashError};
use crate::repo::session_repo::SessionRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from account service operations.
#[derive(Debug)]
pub enum AccountServiceError {
    /// Required form field is blank.
    Validation(ValidationError),
    /// Another account already uses this email.
    EmailTaken(String),
    /// Email/password pair does not match any account.
    InvalidCredentials,
    Password(PasswordHashError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for AccountServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmailTaken(email) => write!(f, "email already registered: {email}"),
            Self::InvalidCredentials => f.write_str("invalid credentials"),
            Self::Password(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Password(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for AccountServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PasswordHashError> for AccountServiceError {
    fn from(value: PasswordHashError) -> Self {
        Self::Password(value)
    }
}

impl From<RepoError> for AccountServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Account service facade over user and session repositories.
pub struct AccountService<U: UserRepository, S: SessionRepository> {
    users: U,
    sessions: S,
}

impl<U: UserRepository, S: SessionRepository> AccountService<U, S> {
    pub fn new(users: U, sessions: S) -> Self {
        Self { users, sessions }
    }

    /// Registers one account from raw form input.
    ///
    /// # Contract
    /// - Fields are trimmed; name, email and password must be non-empty.
    /// - Email is stored exactly as typed (after trim), case preserved.
    pub fn register(&self, form: &Registration) -> Result<User, AccountServiceError> {
        let form = form.normalized()?;
        let new_user = NewUser {
            password_hash: hash_password(&form.password)?,
            name: form.name,
            email: form.email,
            phone: form.phone,
        };

        match self.users.create_user(&new_user) {
            Ok(user) => {
                info!("event=account_register module=account status=ok");
                Ok(user)
            }
            Err(err) if err.is_unique_violation() => {
                warn!("event=account_register module=account status=error error_code=email_taken");
                Err(AccountServiceError::EmailTaken(new_user.email))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns whether `password` matches the account stored for `email`.
    ///
    /// Comparison is exact on both fields; no trimming or case folding.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<bool, AccountServiceError> {
        match self.users.password_hash(email)? {
            Some(stored) => Ok(verify_password(password, &stored)?),
            None => {
                verify_against_dummy(password);
                Ok(false)
            }
        }
    }

    /// Authenticates trimmed credentials and marks the session as logged in.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AccountServiceError> {
        let email = require_non_empty("email", email)?;
        let password = require_non_empty("password", password)?;

        if !self.authenticate(&email, &password)? {
            warn!("event=account_login module=account status=error error_code=invalid_credentials");
            return Err(AccountServiceError::InvalidCredentials);
        }

        let user = self
            .users
            .get_user(&email)?
            .ok_or(AccountServiceError::InvalidCredentials)?;
        self.sessions.save_session(&Session::logged_in(email))?;
        info!("event=account_login module=account status=ok");
        Ok(user)
    }

    /// Clears every session key.
    pub fn logout(&self) -> Result<(), AccountServiceError> {
        self.sessions.clear_session()?;
        info!("event=account_logout module=account status=ok");
        Ok(())
    }

    pub fn current_session(&self) -> Result<Session, AccountServiceError> {
        Ok(self.sessions.load_session()?)
    }

    /// Resolves the persisted session to its account.
    ///
    /// Returns `None` when logged out or when the session points at an
    /// account that no longer resolves.
    pub fn current_user(&self) -> Result<Option<User>, AccountServiceError> {
        let session = self.sessions.load_session()?;
        match session.active_email() {
            Some(email) => Ok(self.users.get_user(email)?),
            None => Ok(None),
        }
    }

    pub fn get_user(&self, email: &str) -> Result<Option<User>, AccountServiceError> {
        Ok(self.users.get_user(email)?)
    }
}
