use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;

use super::UserService;
use crate::application::ports::{AuthIssuer, AuthResult, CleanupOutcome, FileStorage};
use crate::domain::{
    AdminUpdateUserDto, Balance, BalanceChanges, CreateUserDto, DomainError, DomainResult,
    EditUserParams, ImageChange, UpdateUserDto, UploadedImage, User, UserChanges, UserIdentity,
    UserLookup, UserRepositoryInterface, UserRole,
};

const IMAGE_DIR: &str = "uploads/users";

// ── Recording fakes ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    FindIdentity {
        email: Option<String>,
        username: Option<String>,
    },
    FindUnique {
        include_balance: bool,
    },
    Create {
        email: String,
    },
    Update {
        id: String,
        changes: UserChanges,
    },
    GenerateName {
        original: String,
    },
    CreateFile {
        dir: String,
        filename: String,
    },
    DeleteFile {
        dir: String,
        filename: Option<String>,
    },
    Issue {
        user_id: String,
    },
}

type Journal = Arc<Mutex<Vec<Call>>>;

fn record(journal: &Journal, call: Call) {
    journal.lock().unwrap().push(call);
}

struct FakeRepo {
    journal: Journal,
    users: DashMap<String, User>,
    fail_update: AtomicBool,
    next_id: AtomicUsize,
}

impl FakeRepo {
    fn insert(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserRepositoryInterface for FakeRepo {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        record(
            &self.journal,
            Call::Create {
                email: dto.email.clone(),
            },
        );
        if self
            .users
            .iter()
            .any(|u| u.email == dto.email || u.username == dto.username)
        {
            return Err(DomainError::Internal("UNIQUE constraint failed".into()));
        }

        let id = format!("u{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 100);
        let mut user = sample_user(&id, &dto.email, &dto.username, None);
        user.activated = false;
        user.balance = Some(Balance {
            user_id: id.clone(),
            balance: Decimal::ZERO,
            revenue: Decimal::ZERO,
        });
        self.insert(user.clone());
        Ok(user)
    }

    async fn find_unique(
        &self,
        lookup: UserLookup,
        include_balance: bool,
    ) -> DomainResult<Option<User>> {
        record(&self.journal, Call::FindUnique { include_balance });
        let found = match lookup {
            UserLookup::Id(id) => self.users.get(&id).map(|u| u.clone()),
            UserLookup::Email(email) => self
                .users
                .iter()
                .find(|u| u.email == email)
                .map(|u| u.clone()),
            UserLookup::Username(username) => self
                .users
                .iter()
                .find(|u| u.username == username)
                .map(|u| u.clone()),
        };
        Ok(found.map(|mut u| {
            if !include_balance {
                u.balance = None;
            }
            u
        }))
    }

    async fn find_by_email_or_username(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> DomainResult<Vec<UserIdentity>> {
        record(
            &self.journal,
            Call::FindIdentity {
                email: email.map(String::from),
                username: username.map(String::from),
            },
        );
        Ok(self
            .users
            .iter()
            .filter(|u| Some(u.email.as_str()) == email || Some(u.username.as_str()) == username)
            .map(|u| UserIdentity {
                email: u.email.clone(),
                username: u.username.clone(),
            })
            .collect())
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> DomainResult<User> {
        record(
            &self.journal,
            Call::Update {
                id: id.to_string(),
                changes: changes.clone(),
            },
        );
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(DomainError::Internal("connection reset".into()));
        }

        let mut entry = self
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::user_not_found(id))?;
        let user = entry.value_mut();

        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(full_name) = changes.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        if let Some(activated) = changes.activated {
            user.activated = activated;
        }
        match changes.image {
            ImageChange::Set(name) => user.image = Some(name),
            ImageChange::Clear => user.image = None,
            ImageChange::Unchanged => {}
        }
        if let Some(changes) = changes.balance {
            let balance = user.balance.get_or_insert_with(|| Balance {
                user_id: id.to_string(),
                balance: Decimal::ZERO,
                revenue: Decimal::ZERO,
            });
            if let Some(value) = changes.balance {
                balance.balance = value;
            }
            if let Some(value) = changes.revenue {
                balance.revenue = value;
            }
        }

        Ok(user.clone())
    }
}

struct FakeStorage {
    journal: Journal,
    files: DashMap<String, Vec<u8>>,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    counter: AtomicUsize,
}

#[async_trait]
impl FileStorage for FakeStorage {
    async fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    async fn read_file(&self, path: &str) -> DomainResult<Vec<u8>> {
        self.files
            .get(path)
            .map(|data| data.clone())
            .ok_or_else(|| DomainError::Internal(format!("missing {}", path)))
    }

    fn generate_random_filename(&self, original: &str) -> Option<String> {
        record(
            &self.journal,
            Call::GenerateName {
                original: original.to_string(),
            },
        );
        if original.is_empty() {
            return None;
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let ext = original.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin");
        Some(format!("generated{}.{}", n, ext))
    }

    async fn create_file(&self, dir: &str, filename: &str, data: &[u8]) -> DomainResult<()> {
        record(
            &self.journal,
            Call::CreateFile {
                dir: dir.to_string(),
                filename: filename.to_string(),
            },
        );
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(DomainError::Internal("Failed to upload file".into()));
        }
        self.files
            .insert(format!("{}/{}", dir, filename), data.to_vec());
        Ok(())
    }

    async fn delete_file(&self, dir: &str, filename: Option<&str>) -> CleanupOutcome {
        record(
            &self.journal,
            Call::DeleteFile {
                dir: dir.to_string(),
                filename: filename.map(String::from),
            },
        );
        let path = match filename {
            Some(name) => format!("{}/{}", dir, name),
            None => dir.to_string(),
        };
        if self.fail_delete.load(Ordering::SeqCst) {
            return CleanupOutcome::Failed {
                path,
                reason: "permission denied".into(),
            };
        }
        self.files.remove(&path);
        CleanupOutcome::Deleted
    }
}

struct FakeAuth {
    journal: Journal,
}

#[async_trait]
impl AuthIssuer for FakeAuth {
    async fn issue(&self, user: &User) -> DomainResult<AuthResult> {
        record(
            &self.journal,
            Call::Issue {
                user_id: user.id.clone(),
            },
        );
        Ok(AuthResult {
            token: format!("token-for-{}", user.id),
            token_type: "Bearer".into(),
            expires_in: 3600,
        })
    }
}

// ── Harness ─────────────────────────────────────────────────────

struct Harness {
    journal: Journal,
    repo: Arc<FakeRepo>,
    storage: Arc<FakeStorage>,
    service: UserService,
}

impl Harness {
    fn new() -> Self {
        let journal: Journal = Arc::new(Mutex::new(Vec::new()));
        let repo = Arc::new(FakeRepo {
            journal: journal.clone(),
            users: DashMap::new(),
            fail_update: AtomicBool::new(false),
            next_id: AtomicUsize::new(0),
        });
        let storage = Arc::new(FakeStorage {
            journal: journal.clone(),
            files: DashMap::new(),
            fail_create: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            counter: AtomicUsize::new(0),
        });
        let auth = Arc::new(FakeAuth {
            journal: journal.clone(),
        });
        let service = UserService::new(repo.clone(), storage.clone(), auth, IMAGE_DIR);

        Self {
            journal,
            repo,
            storage,
            service,
        }
    }

    fn with_user(self, user: User) -> Self {
        self.repo.insert(user);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.journal.lock().unwrap().clone()
    }

    fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }

    fn position(&self, matches: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(|c| matches(c))
    }

    fn update_changes(&self) -> UserChanges {
        self.calls()
            .into_iter()
            .find_map(|c| match c {
                Call::Update { changes, .. } => Some(changes),
                _ => None,
            })
            .expect("update_user was not called")
    }
}

fn sample_user(id: &str, email: &str, username: &str, image: Option<&str>) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "hash".into(),
        role: UserRole::User,
        activated: true,
        image: image.map(String::from),
        full_name: None,
        bio: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        balance: None,
    }
}

fn png(name: &str) -> UploadedImage {
    UploadedImage {
        original_name: name.to_string(),
        data: vec![0x89, b'P', b'N', b'G'],
    }
}

fn create_dto(email: &str, username: &str) -> CreateUserDto {
    CreateUserDto {
        username: username.to_string(),
        email: email.to_string(),
        password: "secure_password_123".into(),
        role: None,
        full_name: None,
    }
}

fn is_find_identity(c: &Call) -> bool {
    matches!(c, Call::FindIdentity { .. })
}

fn is_update(c: &Call) -> bool {
    matches!(c, Call::Update { .. })
}

fn is_create_file(c: &Call) -> bool {
    matches!(c, Call::CreateFile { .. })
}

fn is_issue(c: &Call) -> bool {
    matches!(c, Call::Issue { .. })
}

// ── Uniqueness check ────────────────────────────────────────────

#[tokio::test]
async fn check_passes_when_nothing_matches() {
    let h = Harness::new().with_user(sample_user("u1", "a@x.com", "alice", None));

    h.service
        .check_email_username("b@x.com", Some("bob"))
        .await
        .unwrap();
}

#[tokio::test]
async fn check_reports_email_before_username() {
    let h = Harness::new()
        .with_user(sample_user("u1", "a@x.com", "alice", None))
        .with_user(sample_user("u2", "b@x.com", "bob", None));

    let err = h
        .service
        .check_email_username("a@x.com", Some("bob"))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.to_string(), "Email a@x.com already registered");
}

#[tokio::test]
async fn check_reports_taken_username() {
    let h = Harness::new().with_user(sample_user("u1", "a@x.com", "alice", None));

    let err = h
        .service
        .check_email_username("new@x.com", Some("alice"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Username alice already registered");
}

#[tokio::test]
async fn check_without_username_ignores_usernames() {
    let h = Harness::new().with_user(sample_user("u1", "a@x.com", "alice", None));

    h.service.check_email_username("c@x.com", None).await.unwrap();
    assert_eq!(
        h.calls(),
        vec![Call::FindIdentity {
            email: Some("c@x.com".into()),
            username: None,
        }]
    );
}

// ── Creation / retrieval / activation ──────────────────────────

#[tokio::test]
async fn registering_the_same_email_twice_conflicts_once() {
    let h = Harness::new();

    let first = h.service.register(create_dto("a@x.com", "alice")).await;
    let second = h.service.register(create_dto("a@x.com", "alice2")).await;

    assert!(first.is_ok());
    assert!(second.unwrap_err().is_conflict());
    assert_eq!(h.count(|c| matches!(c, Call::Create { .. })), 1);
}

#[tokio::test]
async fn create_skips_the_uniqueness_check() {
    let h = Harness::new();

    let user = h.service.create(create_dto("a@x.com", "alice")).await.unwrap();

    assert!(!user.activated);
    assert_eq!(user.balance.unwrap().balance, Decimal::ZERO);
    assert_eq!(h.count(is_find_identity), 0);
}

#[tokio::test]
async fn details_include_balance_but_unique_lookup_does_not() {
    let mut user = sample_user("u1", "a@x.com", "alice", None);
    user.balance = Some(Balance {
        user_id: "u1".into(),
        balance: Decimal::new(500, 2),
        revenue: Decimal::ZERO,
    });
    let h = Harness::new().with_user(user);

    let details = h.service.get_user_details("u1").await.unwrap().unwrap();
    let by_email = h
        .service
        .find_unique_by(UserLookup::Email("a@x.com".into()))
        .await
        .unwrap()
        .unwrap();

    assert!(details.balance.is_some());
    assert!(by_email.balance.is_none());
    assert!(h.service.get_user_details("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn activation_is_idempotent() {
    let mut user = sample_user("u1", "a@x.com", "alice", None);
    user.activated = false;
    let h = Harness::new().with_user(user);

    let first = h.service.activate("u1").await.unwrap();
    let second = h.service.activate("u1").await.unwrap();

    assert!(first.activated && second.activated);
    assert_eq!(h.update_changes(), UserChanges::activate());
}

#[tokio::test]
async fn activating_unknown_user_is_not_found() {
    let h = Harness::new();
    let err = h.service.activate("missing").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

// ── Edit workflow ───────────────────────────────────────────────

#[tokio::test]
async fn unchanged_identity_skips_check_and_reauth() {
    let old = sample_user("u1", "a@x.com", "alice", None);
    let h = Harness::new().with_user(old.clone());

    let dto = UpdateUserDto {
        username: Some("alice".into()),
        email: Some("a@x.com".into()),
        bio: Some("hello".into()),
        ..Default::default()
    };
    let result = h
        .service
        .edit_user(EditUserParams::new("u1", dto).with_old_user(old))
        .await
        .unwrap();

    assert_eq!(h.count(is_find_identity), 0);
    assert_eq!(h.count(is_issue), 0);
    assert!(result.new_auth.is_none());
    assert_eq!(result.user.bio.as_deref(), Some("hello"));
}

#[tokio::test]
async fn delete_image_clears_column_and_removes_old_blob() {
    let old = sample_user("u1", "a@x.com", "alice", Some("old.png"));
    let h = Harness::new().with_user(old.clone());

    let dto = UpdateUserDto {
        delete_image: true,
        ..Default::default()
    };
    let result = h
        .service
        .edit_user(EditUserParams::new("u1", dto).with_old_user(old))
        .await
        .unwrap();

    assert_eq!(h.update_changes().image, ImageChange::Clear);
    assert_eq!(
        h.count(|c| *c
            == Call::DeleteFile {
                dir: IMAGE_DIR.into(),
                filename: Some("old.png".into()),
            }),
        1
    );
    assert!(result.user.image.is_none());
    assert!(result.new_auth.is_none());
    assert_eq!(h.count(|c| matches!(c, Call::GenerateName { .. })), 0);
}

#[tokio::test]
async fn new_image_is_written_after_persist_and_old_one_removed() {
    let old = sample_user("u1", "a@x.com", "alice", Some("old.png"));
    let h = Harness::new().with_user(old.clone());

    let result = h
        .service
        .edit_user(
            EditUserParams::new("u1", UpdateUserDto::default())
                .with_old_user(old)
                .with_image(png("avatar.png")),
        )
        .await
        .unwrap();

    assert_eq!(result.user.image.as_deref(), Some("generated0.png"));
    assert_eq!(
        h.update_changes().image,
        ImageChange::Set("generated0.png".into())
    );

    let update_at = h.position(is_update).unwrap();
    let write_at = h.position(is_create_file).unwrap();
    let delete_at = h
        .position(|c| matches!(c, Call::DeleteFile { filename: Some(f), .. } if f == "old.png"))
        .unwrap();
    assert!(update_at < write_at);
    assert!(write_at < delete_at);

    assert!(h.storage.files.contains_key("uploads/users/generated0.png"));
}

#[tokio::test]
async fn edit_without_image_changes_leaves_image_alone() {
    let old = sample_user("u1", "a@x.com", "alice", Some("old.png"));
    let h = Harness::new().with_user(old.clone());

    let dto = UpdateUserDto {
        full_name: Some("Alice A.".into()),
        ..Default::default()
    };
    let result = h
        .service
        .edit_user(EditUserParams::new("u1", dto).with_old_user(old))
        .await
        .unwrap();

    assert_eq!(h.update_changes().image, ImageChange::Unchanged);
    assert_eq!(result.user.image.as_deref(), Some("old.png"));
    assert_eq!(
        h.count(|c| matches!(c, Call::CreateFile { .. } | Call::DeleteFile { .. })),
        0
    );
}

#[tokio::test]
async fn failed_persist_compensates_generated_name() {
    let old = sample_user("u1", "a@x.com", "alice", Some("old.png"));
    let h = Harness::new().with_user(old.clone());
    h.repo.fail_update.store(true, Ordering::SeqCst);

    let err = h
        .service
        .edit_user(
            EditUserParams::new("u1", UpdateUserDto::default())
                .with_old_user(old)
                .with_image(png("avatar.jpg")),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Internal(_)));
    assert_eq!(h.count(is_create_file), 0);
    assert_eq!(
        h.count(|c| *c
            == Call::DeleteFile {
                dir: IMAGE_DIR.into(),
                filename: Some("generated0.jpg".into()),
            }),
        1
    );
    // the old image is still referenced and must survive
    assert_eq!(
        h.count(|c| matches!(c, Call::DeleteFile { filename: Some(f), .. } if f == "old.png")),
        0
    );
}

#[tokio::test]
async fn failed_persist_without_image_deletes_nothing() {
    let old = sample_user("u1", "a@x.com", "alice", None);
    let h = Harness::new().with_user(old.clone());
    h.repo.fail_update.store(true, Ordering::SeqCst);

    let dto = UpdateUserDto {
        email: Some("taken-later@x.com".into()),
        ..Default::default()
    };
    let err = h
        .service
        .edit_user(EditUserParams::new("u1", dto).with_old_user(old))
        .await
        .unwrap_err();

    assert!(!err.is_conflict());
    assert!(matches!(err, DomainError::Internal(_)));
    assert_eq!(h.count(|c| matches!(c, Call::DeleteFile { .. })), 0);
    assert_eq!(h.count(is_issue), 0);
}

#[tokio::test]
async fn email_change_is_checked_and_reauthenticated() {
    let old = sample_user("u1", "a@x.com", "alice", None);
    let h = Harness::new().with_user(old.clone());

    let dto = UpdateUserDto {
        email: Some("b@x.com".into()),
        ..Default::default()
    };
    let result = h
        .service
        .edit_user(EditUserParams::new("u1", dto).with_old_user(old))
        .await
        .unwrap();

    assert_eq!(
        h.calls()[0],
        Call::FindIdentity {
            email: Some("b@x.com".into()),
            username: None,
        }
    );
    assert_eq!(result.user.email, "b@x.com");
    assert_eq!(result.new_auth.unwrap().token, "token-for-u1");
    assert!(h.position(is_update).unwrap() < h.position(is_issue).unwrap());
}

#[tokio::test]
async fn missing_snapshot_counts_as_identity_change() {
    let h = Harness::new().with_user(sample_user("u1", "a@x.com", "alice", None));

    let dto = UpdateUserDto {
        username: Some("alice2".into()),
        ..Default::default()
    };
    let result = h
        .service
        .edit_user(EditUserParams::new("u1", dto))
        .await
        .unwrap();

    assert_eq!(h.count(is_find_identity), 1);
    assert!(result.new_auth.is_some());
}

#[tokio::test]
async fn identity_conflict_aborts_before_any_mutation() {
    let old = sample_user("u1", "a@x.com", "alice", Some("old.png"));
    let h = Harness::new()
        .with_user(old.clone())
        .with_user(sample_user("u2", "b@x.com", "bob", None));

    let dto = UpdateUserDto {
        username: Some("bob".into()),
        ..Default::default()
    };
    let err = h
        .service
        .edit_user(
            EditUserParams::new("u1", dto)
                .with_old_user(old)
                .with_image(png("avatar.png")),
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Username bob already registered");
    assert_eq!(h.calls().len(), 1);
}

#[tokio::test]
async fn old_image_cleanup_failure_does_not_fail_edit() {
    let old = sample_user("u1", "a@x.com", "alice", Some("old.png"));
    let h = Harness::new().with_user(old.clone());
    h.storage.fail_delete.store(true, Ordering::SeqCst);

    let dto = UpdateUserDto {
        delete_image: true,
        ..Default::default()
    };
    let result = h
        .service
        .edit_user(EditUserParams::new("u1", dto).with_old_user(old))
        .await
        .unwrap();

    assert!(result.user.image.is_none());
    assert!(result.new_auth.is_none());
    assert_eq!(h.count(|c| matches!(c, Call::DeleteFile { .. })), 1);
}

#[tokio::test]
async fn upload_failure_after_persist_propagates_without_repair() {
    let old = sample_user("u1", "a@x.com", "alice", Some("old.png"));
    let h = Harness::new().with_user(old.clone());
    h.storage.fail_create.store(true, Ordering::SeqCst);

    let err = h
        .service
        .edit_user(
            EditUserParams::new("u1", UpdateUserDto::default())
                .with_old_user(old)
                .with_image(png("avatar.png")),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Internal(_)));
    assert_eq!(h.count(is_update), 1);
    assert_eq!(h.count(|c| matches!(c, Call::DeleteFile { .. })), 0);
    let stored = h.repo.users.get("u1").unwrap().image.clone();
    assert_eq!(stored.as_deref(), Some("generated0.png"));
}

#[tokio::test]
async fn privileged_edit_updates_balance_plain_edit_does_not() {
    let mut old = sample_user("u1", "a@x.com", "alice", None);
    old.balance = Some(Balance {
        user_id: "u1".into(),
        balance: Decimal::ZERO,
        revenue: Decimal::ZERO,
    });
    let h = Harness::new().with_user(old.clone());

    let admin = AdminUpdateUserDto {
        balance: Some(Decimal::new(10_000, 2)),
        revenue: Some(Decimal::new(250, 2)),
        ..Default::default()
    };
    let result = h
        .service
        .edit_user(EditUserParams::new("u1", admin).with_old_user(old.clone()))
        .await
        .unwrap();

    assert_eq!(
        h.update_changes().balance,
        Some(BalanceChanges {
            balance: Some(Decimal::new(10_000, 2)),
            revenue: Some(Decimal::new(250, 2)),
        })
    );
    let balance = result.user.balance.unwrap();
    assert_eq!(balance.balance, Decimal::new(10_000, 2));
    assert_eq!(balance.revenue, Decimal::new(250, 2));

    let h = Harness::new().with_user(old.clone());
    h.service
        .edit_user(EditUserParams::new("u1", UpdateUserDto::default()).with_old_user(old))
        .await
        .unwrap();
    assert!(h.update_changes().balance.is_none());
}

#[tokio::test]
async fn unnamed_upload_is_ignored() {
    let old = sample_user("u1", "a@x.com", "alice", Some("old.png"));
    let h = Harness::new().with_user(old.clone());

    h.service
        .edit_user(
            EditUserParams::new("u1", UpdateUserDto::default())
                .with_old_user(old)
                .with_image(png("")),
        )
        .await
        .unwrap();

    assert_eq!(h.update_changes().image, ImageChange::Unchanged);
    assert_eq!(
        h.count(|c| matches!(c, Call::CreateFile { .. } | Call::DeleteFile { .. })),
        0
    );
}

// ── Image reads ─────────────────────────────────────────────────

#[tokio::test]
async fn read_image_returns_stored_bytes() {
    let h = Harness::new();
    h.storage
        .files
        .insert(format!("{}/a.png", IMAGE_DIR), vec![1, 2, 3]);

    assert_eq!(
        h.service.read_image("a.png").await.unwrap(),
        Some(vec![1, 2, 3])
    );
    assert_eq!(h.service.read_image("b.png").await.unwrap(), None);
}

#[tokio::test]
async fn read_image_rejects_traversal() {
    let h = Harness::new();
    let err = h.service.read_image("../secret").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}
