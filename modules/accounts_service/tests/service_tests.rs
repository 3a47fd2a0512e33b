//! Integration tests for the accounts service
//!
//! Exercise the domain service against in-memory repositories: the
//! first-login flow, credential checks, listings, and the activity
//! trail side effects.

use std::sync::Arc;

use accounts_service::contract::error::AccountsError;
use accounts_service::contract::model::{LoginOutcome, NewUser, User, UserRole};
use accounts_service::domain::password::hash_password;
use accounts_service::domain::{Service, TokenCodec};
use chrono::Utc;

// Mock repository implementations for testing
pub mod mocks {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::{Arc, Mutex};

    use accounts_service::contract::error::AccountsError;
    use accounts_service::contract::model::{NewActivity, NewUser, User, UserActivity};
    use accounts_service::domain::repository::{ActivityRepository, UserRepository};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    #[derive(Clone)]
    pub struct MockUserRepo {
        users: Arc<Mutex<HashMap<i64, User>>>,
        next_id: Arc<AtomicI64>,
    }

    impl MockUserRepo {
        pub fn new() -> Self {
            Self {
                users: Arc::new(Mutex::new(HashMap::new())),
                next_id: Arc::new(AtomicI64::new(1)),
            }
        }

        /// Seed a fully-formed user, bypassing the service.
        pub fn insert(&self, user: User) {
            self.next_id.fetch_max(user.id + 1, Ordering::SeqCst);
            self.users.lock().unwrap().insert(user.id, user);
        }

        pub fn get(&self, id: i64) -> Option<User> {
            self.users.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepo {
        async fn create(&self, new_user: &NewUser) -> anyhow::Result<User> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == new_user.email) {
                return Err(AccountsError::email_taken(new_user.email.clone()).into());
            }
            let now = Utc::now();
            let user = User {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                email: new_user.email.clone(),
                fullname: new_user.fullname.clone(),
                role: new_user.role,
                password_hash: None,
                is_superuser: false,
                is_active: true,
                last_login: None,
                created_at: now,
                updated_at: now,
            };
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn set_password_hash(&self, id: i64, hash: &str) -> anyhow::Result<()> {
            if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
                user.password_hash = Some(hash.to_string());
                user.updated_at = Utc::now();
            }
            Ok(())
        }

        async fn set_last_login(&self, id: i64, at: DateTime<Utc>) -> anyhow::Result<()> {
            if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
                user.last_login = Some(at);
            }
            Ok(())
        }

        async fn list_regular(&self, page: u64, per_page: u64) -> anyhow::Result<(Vec<User>, u64)> {
            let mut users: Vec<User> = self
                .users
                .lock()
                .unwrap()
                .values()
                .filter(|u| !u.is_superuser)
                .cloned()
                .collect();
            users.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            let total = users.len() as u64;
            let start = ((page.max(1) - 1) * per_page) as usize;
            let page_items: Vec<User> = users
                .into_iter()
                .skip(start)
                .take(per_page as usize)
                .collect();
            Ok((page_items, total))
        }

        async fn count_regular(&self) -> anyhow::Result<u64> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .filter(|u| !u.is_superuser)
                .count() as u64)
        }
    }

    #[derive(Clone)]
    pub struct MockActivityRepo {
        rows: Arc<Mutex<Vec<UserActivity>>>,
    }

    impl MockActivityRepo {
        pub fn new() -> Self {
            Self {
                rows: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Recorded actions in insertion order.
        pub fn actions(&self) -> Vec<String> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .map(|a| a.action.clone())
                .collect()
        }

        pub fn entries(&self) -> Vec<UserActivity> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ActivityRepository for MockActivityRepo {
        async fn append(&self, activity: &NewActivity) -> anyhow::Result<UserActivity> {
            let mut rows = self.rows.lock().unwrap();
            let entry = UserActivity {
                id: rows.len() as i64 + 1,
                user_id: activity.user_id,
                email: activity.email.clone(),
                fullname: activity.fullname.clone(),
                action: activity.action.clone(),
                created_at: Utc::now(),
            };
            rows.push(entry.clone());
            Ok(entry)
        }

        async fn list(
            &self,
            page: u64,
            per_page: u64,
        ) -> anyhow::Result<(Vec<UserActivity>, u64)> {
            let mut rows = self.rows.lock().unwrap().clone();
            rows.sort_by(|a, b| b.id.cmp(&a.id));
            let total = rows.len() as u64;
            let start = ((page.max(1) - 1) * per_page) as usize;
            let page_items: Vec<UserActivity> = rows
                .into_iter()
                .skip(start)
                .take(per_page as usize)
                .collect();
            Ok((page_items, total))
        }
    }

    /// Activity repository whose appends always fail, for verifying
    /// that audit logging stays best-effort.
    pub struct FailingActivityRepo;

    #[async_trait]
    impl ActivityRepository for FailingActivityRepo {
        async fn append(&self, _activity: &NewActivity) -> anyhow::Result<UserActivity> {
            anyhow::bail!("activity store is down")
        }

        async fn list(
            &self,
            _page: u64,
            _per_page: u64,
        ) -> anyhow::Result<(Vec<UserActivity>, u64)> {
            anyhow::bail!("activity store is down")
        }
    }
}

fn test_codec() -> TokenCodec {
    TokenCodec::new(b"integration-test-secret", 7)
}

fn create_test_service() -> (Service, Arc<mocks::MockUserRepo>, Arc<mocks::MockActivityRepo>) {
    let users = Arc::new(mocks::MockUserRepo::new());
    let activities = Arc::new(mocks::MockActivityRepo::new());
    let service = Service::new(users.clone(), activities.clone(), test_codec());
    (service, users, activities)
}

/// An admin actor for operations that require an authenticated caller.
fn admin_actor() -> User {
    let now = Utc::now();
    User {
        id: 1000,
        email: "admin@stockroom.test".to_string(),
        fullname: "Site Admin".to_string(),
        role: UserRole::Admin,
        password_hash: None,
        is_superuser: true,
        is_active: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    }
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        fullname: "Test Person".to_string(),
        role: UserRole::Sale,
    }
}

#[tokio::test]
async fn first_login_flow_end_to_end() {
    let (service, users, activities) = create_test_service();
    let actor = admin_actor();

    // Stage 1: admin registers the account; no password yet.
    let created = service
        .create_user(&actor, new_user("jane@example.com"))
        .await
        .expect("create_user failed");
    assert_eq!(created.role, UserRole::Sale);
    assert!(created.password_hash.is_none());
    assert!(created.is_active);

    // Stage 2: the probe reports that password setup is pending.
    let outcome = service
        .login("jane@example.com", None, true)
        .await
        .expect("new-user probe failed");
    assert_eq!(
        outcome,
        LoginOutcome::PasswordSetupRequired {
            user_id: created.id
        }
    );

    // Stage 3: the user sets a password.
    service
        .update_password(created.id, "hunter2!")
        .await
        .expect("update_password failed");
    assert!(users.get(created.id).unwrap().password_hash.is_some());

    // Stage 4: probing again is refused.
    let err = service
        .login("jane@example.com", None, true)
        .await
        .unwrap_err();
    assert_eq!(err, AccountsError::PasswordAlreadySet);

    // Stage 5: a real login issues a verifiable token and stamps
    // last_login.
    let outcome = service
        .login("jane@example.com", Some("hunter2!"), false)
        .await
        .expect("login failed");
    let LoginOutcome::Authenticated { user, access_token } = outcome else {
        panic!("expected an authenticated outcome");
    };
    assert_eq!(user.id, created.id);
    assert!(user.last_login.is_some());
    assert!(users.get(created.id).unwrap().last_login.is_some());

    let claims = test_codec().verify(&access_token).expect("token invalid");
    assert_eq!(claims.user_id, created.id);

    assert_eq!(
        activities.actions(),
        vec!["added new user", "updated password", "logged in"]
    );
}

#[tokio::test]
async fn create_user_rejects_duplicate_email() {
    let (service, _users, _activities) = create_test_service();
    let actor = admin_actor();

    service
        .create_user(&actor, new_user("dup@example.com"))
        .await
        .expect("first create failed");

    let err = service
        .create_user(&actor, new_user("dup@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err, AccountsError::email_taken("dup@example.com"));
}

#[tokio::test]
async fn create_user_validates_input() {
    let (service, _users, _activities) = create_test_service();
    let actor = admin_actor();

    for bad_email in ["", "no-at-sign", "@leading.com", "trailing@", "two@@ats"] {
        let err = service
            .create_user(&actor, new_user(bad_email))
            .await
            .unwrap_err();
        assert!(
            matches!(err, AccountsError::Validation { .. }),
            "email {bad_email:?} should be rejected"
        );
    }

    let err = service
        .create_user(
            &actor,
            NewUser {
                email: "ok@example.com".to_string(),
                fullname: "   ".to_string(),
                role: UserRole::Creator,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::Validation { .. }));
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let (service, _users, _activities) = create_test_service();
    let actor = admin_actor();

    let created = service
        .create_user(&actor, new_user("sam@example.com"))
        .await
        .expect("create_user failed");

    // Passwordless account, unknown email, wrong password: all the
    // same error, nothing leaks about which part was wrong.
    let err = service
        .login("sam@example.com", Some("anything"), false)
        .await
        .unwrap_err();
    assert_eq!(err, AccountsError::InvalidCredentials);

    let err = service
        .login("ghost@example.com", Some("anything"), false)
        .await
        .unwrap_err();
    assert_eq!(err, AccountsError::InvalidCredentials);

    service
        .update_password(created.id, "correct horse")
        .await
        .expect("update_password failed");
    let err = service
        .login("sam@example.com", Some("wrong horse"), false)
        .await
        .unwrap_err();
    assert_eq!(err, AccountsError::InvalidCredentials);

    let err = service
        .login("sam@example.com", None, false)
        .await
        .unwrap_err();
    assert_eq!(err, AccountsError::InvalidCredentials);
}

#[tokio::test]
async fn inactive_accounts_cannot_login() {
    let (service, users, _activities) = create_test_service();

    let now = Utc::now();
    users.insert(User {
        id: 7,
        email: "parked@example.com".to_string(),
        fullname: "Parked Account".to_string(),
        role: UserRole::Sale,
        password_hash: Some(hash_password("pw")),
        is_superuser: false,
        is_active: false,
        last_login: None,
        created_at: now,
        updated_at: now,
    });

    let err = service
        .login("parked@example.com", Some("pw"), false)
        .await
        .unwrap_err();
    assert_eq!(err, AccountsError::InvalidCredentials);
}

#[tokio::test]
async fn new_user_probe_reports_unknown_email() {
    let (service, _users, _activities) = create_test_service();

    let err = service
        .login("nobody@example.com", None, true)
        .await
        .unwrap_err();
    assert_eq!(err, AccountsError::user_not_found("nobody@example.com"));
}

#[tokio::test]
async fn update_password_edge_cases() {
    let (service, _users, _activities) = create_test_service();

    let err = service.update_password(99, "pw").await.unwrap_err();
    assert_eq!(err, AccountsError::user_not_found("99"));

    let err = service.update_password(99, "").await.unwrap_err();
    assert!(matches!(err, AccountsError::Validation { .. }));
}

#[tokio::test]
async fn users_list_excludes_superusers_and_paginates() {
    let (service, users, _activities) = create_test_service();
    let actor = admin_actor();
    users.insert(actor.clone());

    for n in 0..3 {
        service
            .create_user(&actor, new_user(&format!("user{n}@example.com")))
            .await
            .expect("create_user failed");
    }

    let (page1, total) = service
        .list_regular_users(1, 2)
        .await
        .expect("list failed");
    assert_eq!(total, 3);
    assert_eq!(page1.len(), 2);
    assert!(page1.iter().all(|u| !u.is_superuser));

    let (page2, total) = service
        .list_regular_users(2, 2)
        .await
        .expect("list failed");
    assert_eq!(total, 3);
    assert_eq!(page2.len(), 1);

    assert_eq!(service.count_regular_users().await.unwrap(), 3);
}

#[tokio::test]
async fn activity_trail_lists_newest_first() {
    let (service, _users, activities) = create_test_service();
    let actor = admin_actor();

    service
        .record_activity(&actor, "added new group - \"beverages\"")
        .await
        .expect("record failed");
    service
        .record_activity(&actor, "deleted group - \"beverages\"")
        .await
        .expect("record failed");

    let (entries, total) = service.list_activities(1, 10).await.expect("list failed");
    assert_eq!(total, 2);
    assert_eq!(entries[0].action, "deleted group - \"beverages\"");
    assert_eq!(entries[1].action, "added new group - \"beverages\"");
    assert_eq!(entries[0].email, actor.email);

    // The raw store kept the denormalized actor fields.
    let raw = activities.entries();
    assert!(raw.iter().all(|e| e.user_id == Some(actor.id)));
}

#[tokio::test]
async fn audit_failures_do_not_fail_the_operation() {
    let users = Arc::new(mocks::MockUserRepo::new());
    let service = Service::new(
        users.clone(),
        Arc::new(mocks::FailingActivityRepo),
        test_codec(),
    );
    let actor = admin_actor();

    // Creation still succeeds even though the trail append blew up.
    let created = service
        .create_user(&actor, new_user("quiet@example.com"))
        .await
        .expect("create_user should survive audit failure");

    service
        .update_password(created.id, "pw")
        .await
        .expect("update_password should survive audit failure");

    let outcome = service
        .login("quiet@example.com", Some("pw"), false)
        .await
        .expect("login should survive audit failure");
    assert!(matches!(outcome, LoginOutcome::Authenticated { .. }));

    // Direct appends do propagate the failure.
    let err = service.record_activity(&actor, "noop").await.unwrap_err();
    assert!(matches!(err, AccountsError::Internal { .. }));
}
