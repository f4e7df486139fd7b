use rust_decimal::Decimal;

/// Profile changes any user may apply to their own account.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    /// Remove the current profile image. Ignored when a new image is uploaded.
    pub delete_image: bool,
}

/// Profile changes plus balance adjustments, reserved for administrators.
#[derive(Debug, Clone, Default)]
pub struct AdminUpdateUserDto {
    pub profile: UpdateUserDto,
    pub balance: Option<Decimal>,
    pub revenue: Option<Decimal>,
}

/// Edit payload, tagged by the caller's capability.
#[derive(Debug, Clone)]
pub enum UserUpdate {
    Plain(UpdateUserDto),
    Privileged(AdminUpdateUserDto),
}

impl UserUpdate {
    pub fn profile(&self) -> &UpdateUserDto {
        match self {
            UserUpdate::Plain(dto) => dto,
            UserUpdate::Privileged(dto) => &dto.profile,
        }
    }

    /// Balance changes carried by a privileged payload, if any.
    pub fn balance_changes(&self) -> Option<BalanceChanges> {
        match self {
            UserUpdate::Privileged(dto) if dto.balance.is_some() || dto.revenue.is_some() => {
                Some(BalanceChanges {
                    balance: dto.balance,
                    revenue: dto.revenue,
                })
            }
            _ => None,
        }
    }
}

impl From<UpdateUserDto> for UserUpdate {
    fn from(dto: UpdateUserDto) -> Self {
        UserUpdate::Plain(dto)
    }
}

impl From<AdminUpdateUserDto> for UserUpdate {
    fn from(dto: AdminUpdateUserDto) -> Self {
        UserUpdate::Privileged(dto)
    }
}

/// What to do with the `image` column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageChange {
    #[default]
    Unchanged,
    Set(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BalanceChanges {
    pub balance: Option<Decimal>,
    pub revenue: Option<Decimal>,
}

/// Column-level update submitted to the repository. `None` means "leave as is".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub activated: Option<bool>,
    pub image: ImageChange,
    pub balance: Option<BalanceChanges>,
}

impl UserChanges {
    pub fn activate() -> Self {
        Self {
            activated: Some(true),
            ..Default::default()
        }
    }
}
