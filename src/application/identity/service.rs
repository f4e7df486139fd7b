//! User management service, application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{error, info};

use crate::application::ports::{AuthIssuer, AuthResult, FileStorage};
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, EditUserParams, ImageChange, UpdateUserDto, User,
    UserChanges, UserLookup, UserRepositoryInterface, UserUpdate,
};

/// Outcome of [`UserService::edit_user`].
#[derive(Debug, Clone)]
pub struct EditUserResult {
    pub user: User,
    /// Present when the edit changed the user's identity.
    pub new_auth: Option<AuthResult>,
}

/// User service. Orchestrates the account use-cases.
pub struct UserService {
    repo: Arc<dyn UserRepositoryInterface>,
    storage: Arc<dyn FileStorage>,
    auth: Arc<dyn AuthIssuer>,
    user_image_path: String,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepositoryInterface>,
        storage: Arc<dyn FileStorage>,
        auth: Arc<dyn AuthIssuer>,
        user_image_path: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            storage,
            auth,
            user_image_path: user_image_path.into(),
        }
    }


    // ── Creation ────────────────────────────────────────────────

    /// Insert a new user. Does not check email/username availability.
    pub async fn create(&self, dto: CreateUserDto) -> DomainResult<User> {
        self.repo.create_user(dto).await
    }

    /// Check email/username availability, then create the user.
    pub async fn register(&self, dto: CreateUserDto) -> DomainResult<User> {
        self.check_email_username(&dto.email, Some(dto.username.as_str()))
            .await?;

        let user = self.create(dto).await?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Get a single user by ID, balance included.
    pub async fn get_user_details(&self, id: &str) -> DomainResult<Option<User>> {
        self.repo
            .find_unique(UserLookup::Id(id.to_string()), true)
            .await
    }

    pub async fn find_unique_by(&self, lookup: UserLookup) -> DomainResult<Option<User>> {
        self.repo.find_unique(lookup, false).await
    }

    /// Fail with `Conflict` when the email (checked first) or the username
    /// is already taken.
    pub async fn check_email_username(
        &self,
        email: &str,
        username: Option<&str>,
    ) -> DomainResult<()> {
        self.ensure_available(Some(email), username).await
    }

    async fn ensure_available(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> DomainResult<()> {
        let email = email.filter(|e| !e.is_empty());
        let username = username.filter(|u| !u.is_empty());
        if email.is_none() && username.is_none() {
            return Ok(());
        }

        let taken = self.repo.find_by_email_or_username(email, username).await?;

        if let Some(email) = email {
            if taken.iter().any(|u| u.email == email) {
                return Err(DomainError::email_already_registered(email));
            }
        }
        if let Some(username) = username {
            if taken.iter().any(|u| u.username == username) {
                return Err(DomainError::username_already_registered(username));
            }
        }

        Ok(())
    }

    /// Read a stored profile image. `None` when the file does not exist.
    pub async fn read_image(&self, filename: &str) -> DomainResult<Option<Vec<u8>>> {
        if !is_plain_filename(filename) {
            return Err(DomainError::Validation(format!(
                "Invalid image name: {}",
                filename
            )));
        }

        let path = format!("{}/{}", self.user_image_path, filename);
        if !self.storage.exists(&path).await {
            return Ok(None);
        }
        self.storage.read_file(&path).await.map(Some)
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Mark the user as activated. Activating twice is harmless.
    pub async fn activate(&self, id: &str) -> DomainResult<User> {
        let user = self.repo.update_user(id, UserChanges::activate()).await?;

        info!(user_id = %id, "User activated");
        Ok(user)
    }

    /// Apply a profile edit, optionally replacing the profile image.
    ///
    /// The database row is updated before the new image is written, and the
    /// previous image is only removed once both succeeded. When the update
    /// itself fails, the generated filename is deleted on a best-effort basis
    /// and the failure is reported as [`DomainError::Internal`].
    pub async fn edit_user(&self, params: EditUserParams) -> DomainResult<EditUserResult> {
        let EditUserParams {
            id,
            update,
            old_user,
            image,
        } = params;
        let profile = update.profile();

        let identity = IdentityChange::detect(profile, old_user.as_ref());
        if let Some(change) = &identity {
            self.ensure_available(change.email, change.username).await?;
        }

        let filename = image
            .as_ref()
            .and_then(|img| self.storage.generate_random_filename(&img.original_name));

        let changes = compose_changes(&update, filename.as_deref());

        let user = match self.repo.update_user(&id, changes).await {
            Ok(user) => user,
            Err(e) => {
                error!(user_id = %id, error = %e, "Failed to update user");
                if let Some(filename) = &filename {
                    metrics::counter!("user_edit_compensations_total").increment(1);
                    self.storage
                        .delete_file(&self.user_image_path, Some(filename.as_str()))
                        .await
                        .log();
                }
                return Err(DomainError::Internal(format!(
                    "Failed to update user {}: {}",
                    id, e
                )));
            }
        };

        if let (Some(filename), Some(image)) = (&filename, &image) {
            // TODO: reset the image column when this upload fails after the row was updated
            self.storage
                .create_file(&self.user_image_path, filename, &image.data)
                .await?;
        }

        if filename.is_some() || profile.delete_image {
            if let Some(old_image) = old_user.as_ref().and_then(|u| u.image.as_deref()) {
                self.storage
                    .delete_file(&self.user_image_path, Some(old_image))
                    .await
                    .log();
            }
        }

        let new_auth = match identity {
            Some(_) => Some(self.auth.issue(&user).await?),
            None => None,
        };

        info!(
            user_id = %user.id,
            identity_changed = new_auth.is_some(),
            new_image = filename.is_some(),
            "User edited"
        );
        Ok(EditUserResult { user, new_auth })
    }
}

// ── Helpers ─────────────────────────────────────────────────────

/// Identity fields an edit has to re-validate.
#[derive(Debug, PartialEq, Eq)]
struct IdentityChange<'a> {
    email: Option<&'a str>,
    username: Option<&'a str>,
}

impl<'a> IdentityChange<'a> {
    /// Without a snapshot every supplied field counts as changed. With one,
    /// only fields that differ from it do; `None` when nothing moved.
    fn detect(profile: &'a UpdateUserDto, old_user: Option<&User>) -> Option<Self> {
        let email = profile.email.as_deref().filter(|e| !e.is_empty());
        let username = profile.username.as_deref().filter(|u| !u.is_empty());

        let Some(old) = old_user else {
            return Some(Self { email, username });
        };

        let email = email.filter(|e| *e != old.email);
        let username = username.filter(|u| *u != old.username);
        if email.is_none() && username.is_none() {
            None
        } else {
            Some(Self { email, username })
        }
    }
}

fn compose_changes(update: &UserUpdate, new_image: Option<&str>) -> UserChanges {
    let profile = update.profile();

    let image = match new_image {
        Some(name) => ImageChange::Set(name.to_string()),
        None if profile.delete_image => ImageChange::Clear,
        None => ImageChange::Unchanged,
    };

    UserChanges {
        username: profile.username.clone(),
        email: profile.email.clone(),
        full_name: profile.full_name.clone(),
        bio: profile.bio.clone(),
        activated: None,
        image,
        balance: update.balance_changes(),
    }
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}
