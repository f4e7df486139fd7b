//! Multipart edit form parsing

use std::str::FromStr;

use axum::extract::multipart::{Field, Multipart};
use axum::http::StatusCode;
use rust_decimal::Decimal;
use validator::Validate;

use crate::domain::{AdminUpdateUserDto, UpdateUserDto, UploadedImage};
use crate::interfaces::http::common::{describe_validation_errors, ApiError, ApiResult};

/// Parsed `multipart/form-data` body of an edit request.
#[derive(Debug, Default, Validate)]
pub struct EditUserForm {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    pub delete_image: bool,
    pub balance: Option<Decimal>,
    pub revenue: Option<Decimal>,
    pub image: Option<UploadedImage>,
}

impl EditUserForm {
    /// Read every part. Unknown parts are skipped, empty text parts and file
    /// parts without a name or content are treated as absent.
    pub async fn parse(mut multipart: Multipart, max_image_bytes: usize) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "image" => form.image = read_image(field, max_image_bytes).await?,
                "username" => form.username = read_text(field).await?,
                "email" => form.email = read_text(field).await?,
                "full_name" => form.full_name = read_text(field).await?,
                "bio" => form.bio = read_text(field).await?,
                "delete_image" => {
                    form.delete_image = match read_text(field).await? {
                        Some(v) => parse_flag(&v)?,
                        None => false,
                    }
                }
                "balance" => form.balance = read_decimal(field, "balance").await?,
                "revenue" => form.revenue = read_decimal(field, "revenue").await?,
                _ => {}
            }
        }

        form.validate().map_err(|e| {
            ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, describe_validation_errors(&e))
        })?;
        Ok(form)
    }

    pub fn has_balance_changes(&self) -> bool {
        self.balance.is_some() || self.revenue.is_some()
    }

    /// Split into the plain profile payload and the uploaded file.
    pub fn into_plain(self) -> (UpdateUserDto, Option<UploadedImage>) {
        let profile = UpdateUserDto {
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            bio: self.bio,
            delete_image: self.delete_image,
        };
        (profile, self.image)
    }

    /// Split into the privileged payload and the uploaded file.
    pub fn into_privileged(self) -> (AdminUpdateUserDto, Option<UploadedImage>) {
        let balance = self.balance;
        let revenue = self.revenue;
        let (profile, image) = self.into_plain();
        (
            AdminUpdateUserDto {
                profile,
                balance,
                revenue,
            },
            image,
        )
    }
}

async fn read_text(field: Field<'_>) -> ApiResult<Option<String>> {
    let text = field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid form field: {}", e)))?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

async fn read_decimal(field: Field<'_>, name: &str) -> ApiResult<Option<Decimal>> {
    match read_text(field).await? {
        Some(raw) => Decimal::from_str(&raw)
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("{} must be a decimal number", name))),
        None => Ok(None),
    }
}

async fn read_image(field: Field<'_>, max_image_bytes: usize) -> ApiResult<Option<UploadedImage>> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read image: {}", e)))?;

    if data.len() > max_image_bytes {
        return Err(ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Image exceeds {} bytes", max_image_bytes),
        ));
    }
    if original_name.is_empty() || data.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedImage {
        original_name,
        data: data.to_vec(),
    }))
}

fn parse_flag(raw: &str) -> ApiResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ApiError::bad_request("delete_image must be a boolean")),
    }
}
