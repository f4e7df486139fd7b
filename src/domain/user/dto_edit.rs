use super::{User, UserUpdate};

/// File received with an edit request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub original_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct EditUserParams {
    pub id: String,
    pub update: UserUpdate,
    /// State of the account before the edit, when the caller has it.
    pub old_user: Option<User>,
    pub image: Option<UploadedImage>,
}

impl EditUserParams {
    pub fn new(id: impl Into<String>, update: impl Into<UserUpdate>) -> Self {
        Self {
            id: id.into(),
            update: update.into(),
            old_user: None,
            image: None,
        }
    }

    pub fn with_old_user(mut self, old_user: User) -> Self {
        self.old_user = Some(old_user);
        self
    }

    pub fn with_image(mut self, image: UploadedImage) -> Self {
        self.image = Some(image);
        self
    }
}
