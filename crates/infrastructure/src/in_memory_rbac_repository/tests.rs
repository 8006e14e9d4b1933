use std::sync::Arc;

use chrono::Duration;
use warden_application::{
    AccountService, AuthorizationService, CreateRoleInput, PageRequest, PermissionRepository,
    RoleDraft, RoleRepository, SystemClock, TokenManager, UpdateRoleInput, UserRoleRepository,
};
use warden_core::{AppError, UserId};
use warden_domain::{Role, RoleId, SystemPermission, TokenKind};

use super::InMemoryRbacRepository;
use crate::{
    Argon2PasswordHasher, InMemoryIdentityRepository, JwtTokenManager, PasswordHashConfig,
    TokenConfig,
};

fn custom_role(name: &str) -> CreateRoleInput {
    CreateRoleInput {
        name: name.to_owned(),
        display_name: name.to_uppercase(),
        description: String::new(),
        is_system: false,
    }
}

fn listed_names(roles: Vec<Role>) -> Vec<String> {
    roles.into_iter().map(|role| role.name).collect()
}

fn authorization(repository: &Arc<InMemoryRbacRepository>) -> AuthorizationService {
    AuthorizationService::new(
        repository.clone(),
        repository.clone(),
        repository.clone(),
        repository.clone(),
    )
}

async fn role_permission_names(service: &AuthorizationService, role_name: &str) -> Vec<String> {
    let role = service
        .get_role_by_name(role_name)
        .await
        .unwrap_or_else(|_| panic!("role '{role_name}' should exist"));
    service
        .get_role_permissions(role.id)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|permission| permission.name)
        .collect()
}

#[tokio::test]
async fn bootstrap_produces_the_fixed_catalog() {
    let repository = Arc::new(InMemoryRbacRepository::new());
    let service = authorization(&repository);

    assert!(service.initialize_system_data().await.is_ok());

    let system_roles = repository.list_system_roles().await.unwrap_or_default();
    let role_names: Vec<&str> = system_roles.iter().map(|role| role.name.as_str()).collect();
    assert_eq!(role_names, vec!["admin", "user"]);

    let system_permissions = repository
        .list_system_permissions()
        .await
        .unwrap_or_default();
    assert_eq!(system_permissions.len(), SystemPermission::all().len());
    assert!(system_permissions.iter().all(|permission| permission.is_system));

    let admin_permissions = role_permission_names(&service, "admin").await;
    assert_eq!(admin_permissions.len(), SystemPermission::all().len());
    assert_eq!(role_permission_names(&service, "user").await, vec!["user:read"]);
}

#[tokio::test]
async fn bootstrap_run_many_times_converges() {
    let repository = Arc::new(InMemoryRbacRepository::new());
    let service = authorization(&repository);

    assert!(service.initialize_system_data().await.is_ok());
    let first_roles = repository.list_roles(PageRequest::new(0, 100)).await.unwrap_or_default();
    let first_admin = role_permission_names(&service, "admin").await;

    for _ in 0..4 {
        let report = service.initialize_system_data().await;
        assert!(matches!(report, Ok(report) if report.roles_created == 0
            && report.permissions_created == 0
            && report.grants_created == 0));
    }

    let roles = repository.list_roles(PageRequest::new(0, 100)).await.unwrap_or_default();
    assert_eq!(roles, first_roles);
    assert_eq!(role_permission_names(&service, "admin").await, first_admin);
}

#[tokio::test]
async fn concurrent_bootstraps_do_not_duplicate_rows() {
    let repository = Arc::new(InMemoryRbacRepository::new());
    let service = authorization(&repository);

    let (first, second) = tokio::join!(
        service.initialize_system_data(),
        service.initialize_system_data()
    );
    assert!(first.is_ok() && second.is_ok());

    let roles = repository.list_roles(PageRequest::new(0, 100)).await.unwrap_or_default();
    assert_eq!(roles.len(), 2);
    assert_eq!(role_permission_names(&service, "admin").await.len(), 13);
}

#[tokio::test]
async fn has_permission_is_the_union_over_assigned_roles() {
    let repository = Arc::new(InMemoryRbacRepository::new());
    let service = authorization(&repository);
    assert!(service.initialize_system_data().await.is_ok());

    let admin_actor = UserId::new(1);
    let member = UserId::new(2);
    let auditor = service
        .create_role(RoleDraft {
            name: "auditor".to_owned(),
            display_name: "Auditor".to_owned(),
            description: "Reads roles".to_owned(),
        })
        .await
        .unwrap_or_else(|_| panic!("role should be created"));
    let role_read = service
        .get_permission_by_name("role:read")
        .await
        .unwrap_or_else(|_| panic!("role:read should exist"));
    let user_read = service
        .get_permission_by_name("user:read")
        .await
        .unwrap_or_else(|_| panic!("user:read should exist"));
    let user_role = service
        .get_role_by_name("user")
        .await
        .unwrap_or_else(|_| panic!("user role should exist"));

    for permission_id in [role_read.id, user_read.id] {
        assert!(
            service
                .assign_permission_to_role(auditor.id, permission_id, admin_actor)
                .await
                .is_ok()
        );
    }
    assert!(service.assign_role_to_user(member, user_role.id, admin_actor).await.is_ok());
    assert!(service.assign_role_to_user(member, auditor.id, admin_actor).await.is_ok());

    let names: Vec<String> = service
        .get_user_permissions(member)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|permission| permission.name)
        .collect();
    assert_eq!(names, vec!["role:read", "user:read"]);

    for (resource, action, expected) in [
        ("role", "read", true),
        ("user", "read", true),
        ("role", "write", false),
        ("system", "manage", false),
    ] {
        let granted = service
            .has_permission(member, resource, action)
            .await
            .unwrap_or(!expected);
        assert_eq!(granted, expected, "{resource}:{action}");
    }

    assert!(service.remove_role_from_user(member, auditor.id).await.is_ok());
    assert!(!service.has_permission(member, "role", "read").await.unwrap_or(true));
}

#[tokio::test]
async fn store_rejects_duplicate_pair_without_precheck() {
    let repository = Arc::new(InMemoryRbacRepository::new());
    let service = authorization(&repository);
    assert!(service.initialize_system_data().await.is_ok());

    let user_role = service
        .get_role_by_name("user")
        .await
        .unwrap_or_else(|_| panic!("user role should exist"));
    let member = UserId::new(9);

    let (first, second) = tokio::join!(
        repository.assign_role(member, user_role.id, None),
        repository.assign_role(member, user_role.id, None)
    );
    let conflicts = [&first, &second]
        .iter()
        .filter(|result| matches!(result, Err(AppError::Conflict(_))))
        .count();
    assert_eq!(conflicts, 1);
    assert!(first.is_ok() || second.is_ok());
}

#[tokio::test]
async fn deleting_a_role_drops_its_assignments() {
    let repository = Arc::new(InMemoryRbacRepository::new());
    let service = authorization(&repository);

    let role = service
        .create_role(RoleDraft {
            name: "temporary".to_owned(),
            display_name: "Temporary".to_owned(),
            description: String::new(),
        })
        .await
        .unwrap_or_else(|_| panic!("role should be created"));
    let member = UserId::new(5);
    assert!(service.assign_role_to_user(member, role.id, member).await.is_ok());

    assert!(service.delete_role(role.id).await.is_ok());
    assert!(service.get_user_roles(member).await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn registered_account_gets_user_read_only() {
    let repository = Arc::new(InMemoryRbacRepository::new());
    let authorization = authorization(&repository);
    assert!(authorization.initialize_system_data().await.is_ok());

    let hasher = Argon2PasswordHasher::new(PasswordHashConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
        key_length: 32,
    })
    .unwrap_or_else(|_| panic!("cheap parameters should be valid"));
    let tokens = Arc::new(
        JwtTokenManager::new(
            TokenConfig {
                secret: "0123456789abcdef0123456789abcdef".to_owned(),
                access_ttl: Duration::minutes(15),
                refresh_ttl: Duration::days(7),
                issuer: "warden".to_owned(),
            },
            Arc::new(SystemClock),
        )
        .unwrap_or_else(|_| panic!("valid token config")),
    );
    let accounts = AccountService::new(
        Arc::new(InMemoryIdentityRepository::new()),
        Arc::new(hasher),
        tokens.clone(),
        authorization.clone(),
        2,
    );

    let identity = accounts
        .register("alice", "alice@example.com", "correct-horse")
        .await
        .unwrap_or_else(|error| panic!("registration should succeed: {error}"));
    assert!(identity.password_hash.starts_with("$argon2id$"));

    assert!(
        authorization
            .has_permission(identity.id, "user", "read")
            .await
            .unwrap_or_default()
    );
    assert!(
        !authorization
            .has_permission(identity.id, "user", "manage")
            .await
            .unwrap_or(true)
    );

    let login = accounts
        .login("alice", "correct-horse")
        .await
        .unwrap_or_else(|error| panic!("login should succeed: {error}"));
    let claims = tokens
        .validate(&login.tokens.access_token, TokenKind::Access)
        .unwrap_or_else(|error| panic!("access token should validate: {error}"));
    assert_eq!(claims.user_id, identity.id);

    let wrong = accounts.login("alice", "wrong-horse").await;
    assert!(matches!(wrong, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn roles_are_listed_newest_first_with_offset() {
    let repository = InMemoryRbacRepository::new();
    for name in ["a", "b", "c"] {
        assert!(repository.create_role(custom_role(name)).await.is_ok());
    }

    let first_page = repository
        .list_roles(PageRequest::new(0, 2))
        .await
        .unwrap_or_default();
    let skipped = repository
        .list_roles(PageRequest::new(1, 10))
        .await
        .unwrap_or_default();

    assert_eq!(listed_names(first_page), vec!["c", "b"]);
    assert_eq!(listed_names(skipped), vec!["b", "a"]);
}

#[tokio::test]
async fn role_update_leaves_name_untouched() {
    let repository = InMemoryRbacRepository::new();
    let role = repository
        .create_role(custom_role("a"))
        .await
        .unwrap_or_else(|error| panic!("role should be created: {error}"));

    let updated = repository
        .update_role(
            role.id,
            UpdateRoleInput {
                display_name: "New".to_owned(),
                description: "renamed".to_owned(),
            },
        )
        .await
        .unwrap_or_else(|error| panic!("update should succeed: {error}"));
    let unknown = repository
        .update_role(
            RoleId::new(99),
            UpdateRoleInput {
                display_name: "New".to_owned(),
                description: String::new(),
            },
        )
        .await;

    assert_eq!(updated.name, "a");
    assert_eq!(updated.display_name, "New");
    assert!(updated.updated_at >= role.updated_at);
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn role_users_lists_holders_of_one_role() {
    let repository = InMemoryRbacRepository::new();
    let kept = repository
        .create_role(custom_role("kept"))
        .await
        .unwrap_or_else(|error| panic!("role should be created: {error}"));
    let other = repository
        .create_role(custom_role("other"))
        .await
        .unwrap_or_else(|error| panic!("role should be created: {error}"));

    for (user_id, role_id) in [(3, kept.id), (1, kept.id), (2, other.id)] {
        assert!(
            repository
                .assign_role(UserId::new(user_id), role_id, None)
                .await
                .is_ok()
        );
    }

    let holders = repository.list_role_users(kept.id).await.unwrap_or_default();
    assert_eq!(holders, vec![UserId::new(1), UserId::new(3)]);
}
