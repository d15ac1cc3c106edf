// Database-backed tests for AddressService
// Skipped unless TEST_DATABASE_URL points at a PostgreSQL instance

use super::*;
use crate::db::test_support::{test_pool, unique_email};
use crate::store::Store;
use crate::users::{NewUser, User};
use sqlx::PgPool;
use uuid::Uuid;

fn service(pool: &PgPool) -> AddressService {
    AddressService::new(Store::new(pool.clone()), Store::new(pool.clone()))
}

async fn seed_user(pool: &PgPool) -> User {
    Store::<User>::new(pool.clone())
        .insert(NewUser {
            name: "Owner".to_string(),
            email: unique_email("owner"),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap()
}

fn request(user_id: Uuid, state: &str, country: &str) -> CreateAddressRequest {
    CreateAddressRequest {
        user_id,
        country: country.to_string(),
        state: state.to_string(),
        city: "Curitiba".to_string(),
        neighborhood: "Batel".to_string(),
        zip_code: "80420090".to_string(),
        complement: None,
    }
}

#[tokio::test]
async fn test_create_for_unknown_owner_fails() {
    let Some(pool) = test_pool().await else { return };

    let result = service(&pool).create(request(Uuid::new_v4(), "PR", "Brasil")).await;

    assert!(matches!(result, Err(AddressError::OwnerNotFound)));
}

#[tokio::test]
async fn test_find_by_id_includes_owner() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let service = service(&pool);
    let created = service.create(request(owner.id, "PR", "Brasil")).await.unwrap();

    let detail = service.find_by_id(created.id).await.unwrap();

    assert_eq!(detail.address.id, created.id);
    assert_eq!(detail.user.id, owner.id);
    assert_eq!(detail.user.email, owner.email);
}

#[tokio::test]
async fn test_find_unknown_is_not_found() {
    let Some(pool) = test_pool().await else { return };

    let result = service(&pool).find_by_id(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AddressError::NotFound)));
}

#[tokio::test]
async fn test_list_filters_by_owner_and_state() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let service = service(&pool);
    service.create(request(owner.id, "Parana", "Brasil")).await.unwrap();
    let sc = service.create(request(owner.id, "Santa Catarina", "Brasil")).await.unwrap();

    let all = service
        .list(ListAddressesQuery {
            user_id: Some(owner.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, sc.id);

    let only_sc = service
        .list(ListAddressesQuery {
            user_id: Some(owner.id),
            state: Some("CATARINA".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(only_sc.len(), 1);
    assert_eq!(only_sc[0].id, sc.id);
}

#[tokio::test]
async fn test_update_and_destroy_unknown_are_not_found() {
    let Some(pool) = test_pool().await else { return };
    let service = service(&pool);

    let updated = service.update(Uuid::new_v4(), UpdateAddressRequest::default()).await;
    assert!(matches!(updated, Err(AddressError::NotFound)));

    let destroyed = service.destroy(Uuid::new_v4()).await;
    assert!(matches!(destroyed, Err(AddressError::NotFound)));
}

#[tokio::test]
async fn test_destroy_removes_row() {
    let Some(pool) = test_pool().await else { return };
    let owner = seed_user(&pool).await;
    let service = service(&pool);
    let created = service.create(request(owner.id, "PR", "Brasil")).await.unwrap();

    service.destroy(created.id).await.unwrap();

    assert!(matches!(service.find_by_id(created.id).await, Err(AddressError::NotFound)));
}
