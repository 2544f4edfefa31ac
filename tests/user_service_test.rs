//! User service tests against in-memory stores.

mod common;

use uuid::Uuid;

use account_service::domain::{
    Gender, NewUser, User, UserChanges, UserFilter, UserQuery, UserStatus,
};
use account_service::errors::AppError;

use common::{TestApp, PASSWORD};

fn new_user(email: &str, status: UserStatus, gender: Option<Gender>) -> NewUser {
    NewUser {
        email: email.to_string(),
        phone: None,
        gender,
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        birth_date: None,
        status,
        password: PASSWORD.to_string(),
    }
}

fn changes_for(user: &User, email: &str) -> UserChanges {
    UserChanges {
        id: user.id,
        email: email.to_string(),
        phone: user.phone.clone(),
        gender: user.gender,
        first_name: "Renamed".to_string(),
        last_name: user.last_name.clone(),
        birth_date: user.birth_date,
        status: UserStatus::Deactive,
    }
}

fn query(limit: u64, offset: u64) -> UserQuery {
    UserQuery {
        limit,
        offset,
        filter: UserFilter::default(),
    }
}

#[tokio::test]
async fn test_update_to_email_of_other_user_conflicts() {
    let app = TestApp::new();
    let a = app.signup("a@example.com").await;
    app.signup("b@example.com").await;

    let result = app.user_service().update(changes_for(&a, "b@example.com")).await;
    assert!(matches!(result, Err(AppError::Conflict("email"))));

    let unchanged = app.user_service().find(a.id).await.unwrap();
    assert_eq!(unchanged.email, "a@example.com");
}

#[tokio::test]
async fn test_update_keeping_own_email_succeeds() {
    let app = TestApp::new();
    let a = app.signup("a@example.com").await;

    let updated = app
        .user_service()
        .update(changes_for(&a, "a@example.com"))
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Renamed");
    assert_eq!(updated.status, UserStatus::Deactive);
    assert_eq!(updated.created_at, a.created_at);
    assert!(updated.updated_at >= a.updated_at);
    assert_eq!(updated.password_hash, a.password_hash);
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let app = TestApp::new();
    let ghost = app.signup("ghost@example.com").await;
    app.user_service().delete(ghost.id).await.unwrap();

    let result = app.user_service().update(changes_for(&ghost, "ghost@example.com")).await;
    assert!(matches!(result, Err(AppError::NotFound("user"))));
}

#[tokio::test]
async fn test_delete_nonexistent_user_is_not_found() {
    let app = TestApp::new();
    let result = app.user_service().delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound("user"))));
}

#[tokio::test]
async fn test_find_all_orders_by_creation_and_pages() {
    let app = TestApp::new();
    let mut created = Vec::new();
    for i in 0..5 {
        created.push(app.signup(&format!("user{}@example.com", i)).await.id);
    }

    let all = app.user_service().find_all(query(0, 0)).await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|u| u.id).collect();
    let mut expected = all.clone();
    expected.sort_by_key(|u| (u.created_at, u.id));
    assert_eq!(ids, expected.iter().map(|u| u.id).collect::<Vec<_>>());
    assert_eq!(ids.len(), 5);

    let page = app.user_service().find_all(query(2, 1)).await.unwrap();
    assert_eq!(
        page.iter().map(|u| u.id).collect::<Vec<_>>(),
        ids[1..3].to_vec()
    );
}

#[tokio::test]
async fn test_find_all_filters_by_status_and_gender() {
    let app = TestApp::new();
    let users = app.user_service();
    users
        .store(new_user("a@example.com", UserStatus::Active, Some(Gender::Female)))
        .await
        .unwrap();
    users
        .store(new_user("b@example.com", UserStatus::Deactive, Some(Gender::Female)))
        .await
        .unwrap();
    users
        .store(new_user("c@example.com", UserStatus::Active, Some(Gender::Male)))
        .await
        .unwrap();

    let active_women = users
        .find_all(UserQuery {
            limit: 10,
            offset: 0,
            filter: UserFilter {
                status: Some(UserStatus::Active),
                gender: Some(Gender::Female),
                email: None,
            },
        })
        .await
        .unwrap();

    assert_eq!(active_women.len(), 1);
    assert_eq!(active_women[0].email, "a@example.com");
}

#[tokio::test]
async fn test_store_then_find_by_email() {
    let app = TestApp::new();
    let stored = app
        .user_service()
        .store(new_user("jane@example.com", UserStatus::Deactive, None))
        .await
        .unwrap();

    let found = app
        .user_service()
        .find_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, stored.id);
    assert!(!found.is_active());
    assert!(app.user_service().find_by_email("x@example.com").await.unwrap().is_none());
}
