//! Integration tests for role promotion and demotion

mod helpers;

use assert_matches::assert_matches;

use StudyBuddy::models::GroupRole;
use StudyBuddy::utils::errors::StudyBuddyError;

use helpers::TestContext;

#[tokio::test]
async fn test_promote_then_role_is_admin() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let mut group = ctx.group("Study01", false, &alice).await;
    ctx.factory.membership_service.add_member(&mut group, &alice, "bob").await.unwrap();

    ctx.factory.role_service.promote_to_admin(&mut group, &alice, bob.id).await.unwrap();

    assert_eq!(ctx.factory.role_service.get_user_role(&group, &bob), Some(GroupRole::Admin));
    assert!(ctx.factory.role_service.is_admin(&group, &bob));
}

#[tokio::test]
async fn test_demote_returns_member_never_absent() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let mut group = ctx.group("Study01", false, &alice).await;
    ctx.factory.membership_service.add_member(&mut group, &alice, "bob").await.unwrap();
    ctx.factory.role_service.promote_to_admin(&mut group, &alice, bob.id).await.unwrap();

    ctx.factory.role_service.demote_admin(&mut group, &alice, bob.id).await.unwrap();

    assert_eq!(ctx.factory.role_service.get_user_role(&group, &bob), Some(GroupRole::Member));
    assert!(group.is_member(bob.id));
}

#[tokio::test]
async fn test_promote_requires_admin() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let carol = ctx.user("carol");
    let mut group = ctx.group("Study01", false, &alice).await;
    ctx.factory.membership_service.add_member(&mut group, &alice, "bob").await.unwrap();
    ctx.factory.membership_service.add_member(&mut group, &alice, "carol").await.unwrap();

    let err = ctx.factory.role_service
        .promote_to_admin(&mut group, &bob, carol.id)
        .await
        .unwrap_err();

    assert_matches!(err, StudyBuddyError::PermissionDenied(_));
    assert_eq!(ctx.factory.role_service.get_user_role(&group, &carol), Some(GroupRole::Member));
}

#[tokio::test]
async fn test_owner_can_never_be_demoted() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let mut group = ctx.group("Study01", false, &alice).await;
    ctx.factory.membership_service.add_member(&mut group, &alice, "bob").await.unwrap();
    ctx.factory.role_service.promote_to_admin(&mut group, &alice, bob.id).await.unwrap();

    // Not even another admin, nor the owner themselves.
    for demoter in [&bob, &alice] {
        let err = ctx.factory.role_service
            .demote_admin(&mut group, demoter, alice.id)
            .await
            .unwrap_err();
        assert_matches!(err, StudyBuddyError::PermissionDenied(_));
    }

    assert_eq!(ctx.factory.role_service.get_user_role(&group, &alice), Some(GroupRole::Owner));
}

#[tokio::test]
async fn test_promote_non_member_conflicts() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice");
    let carol = ctx.user("carol");
    let mut group = ctx.group("Study01", false, &alice).await;

    let err = ctx.factory.role_service
        .promote_to_admin(&mut group, &alice, carol.id)
        .await
        .unwrap_err();

    assert_matches!(err, StudyBuddyError::Conflict(_));
    assert_eq!(ctx.factory.role_service.get_user_role(&group, &carol), None);
}

#[tokio::test]
async fn test_demote_plain_member_conflicts() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let mut group = ctx.group("Study01", false, &alice).await;
    ctx.factory.membership_service.add_member(&mut group, &alice, "bob").await.unwrap();

    let err = ctx.factory.role_service
        .demote_admin(&mut group, &alice, bob.id)
        .await
        .unwrap_err();

    assert_matches!(err, StudyBuddyError::Conflict(_));
    assert_eq!(ctx.factory.role_service.get_user_role(&group, &bob), Some(GroupRole::Member));
}

#[tokio::test]
async fn test_promoted_admin_can_kick() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice");
    let bob = ctx.user("bob");
    let carol = ctx.user("carol");
    let mut group = ctx.group("Study01", false, &alice).await;
    ctx.factory.membership_service.add_member(&mut group, &alice, "bob").await.unwrap();
    ctx.factory.membership_service.add_member(&mut group, &alice, "carol").await.unwrap();

    ctx.factory.role_service.promote_to_admin(&mut group, &alice, bob.id).await.unwrap();
    ctx.factory.membership_service.kick_member(&mut group, &bob, carol.id).await.unwrap();

    assert!(!group.is_member(carol.id));

    // A non-member cannot kick anyone.
    let err = ctx.factory.membership_service
        .kick_member(&mut group, &carol, bob.id)
        .await
        .unwrap_err();
    assert_matches!(err, StudyBuddyError::PermissionDenied(_));
}
