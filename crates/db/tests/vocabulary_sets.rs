//! Integration tests for vocabulary set CRUD and owner scoping.

use nuance_core::vocabulary::VocabularyWord;
use nuance_db::models::user::CreateUser;
use nuance_db::models::vocabulary_set::{CreateVocabularySet, UpdateVocabularySet};
use nuance_db::repositories::{UserRepo, VocabularySetRepo};
use sqlx::PgPool;

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: "not-a-real-hash".to_string(),
        role_id: 2,
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

fn new_set(name: &str) -> CreateVocabularySet {
    CreateVocabularySet {
        name: name.to_string(),
        description: None,
        words: vec![VocabularyWord {
            term: "wistful".to_string(),
            nuance: "longing tinged with melancholy".to_string(),
            example: Some("a wistful smile".to_string()),
        }],
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_fetch(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;

    let set = VocabularySetRepo::create(&pool, owner, &new_set("Moods"))
        .await
        .unwrap();
    assert_eq!(set.owner_id, owner);
    assert_eq!(set.words.len(), 1);

    let found = VocabularySetRepo::find_for_owner(&pool, set.id, owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Moods");
    assert_eq!(found.words[0].term, "wistful");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_owner_cannot_see_set(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let stranger = new_user(&pool, "stranger").await;
    let set = VocabularySetRepo::create(&pool, owner, &new_set("Private"))
        .await
        .unwrap();

    assert!(VocabularySetRepo::find_for_owner(&pool, set.id, stranger)
        .await
        .unwrap()
        .is_none());
    assert!(!VocabularySetRepo::delete(&pool, set.id, stranger).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_name_for_same_owner_is_rejected(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    VocabularySetRepo::create(&pool, owner, &new_set("Dup"))
        .await
        .unwrap();

    let err = VocabularySetRepo::create(&pool, owner, &new_set("Dup"))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_vocabulary_sets_owner_name"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_substring(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    for name in ["Anger words", "Joy words", "Danger zone"] {
        VocabularySetRepo::create(&pool, owner, &new_set(name))
            .await
            .unwrap();
    }

    let all = VocabularySetRepo::list_for_owner(&pool, owner, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let anger = VocabularySetRepo::list_for_owner(&pool, owner, Some("ANGER"))
        .await
        .unwrap();
    let names: Vec<_> = anger.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Danger zone", "Anger words"]);

    let literal = VocabularySetRepo::list_for_owner(&pool, owner, Some("%"))
        .await
        .unwrap();
    assert!(literal.is_empty(), "wildcards must match literally");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_applies_only_given_fields(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let set = VocabularySetRepo::create(&pool, owner, &new_set("Before"))
        .await
        .unwrap();

    let update = UpdateVocabularySet {
        name: Some("After".to_string()),
        description: None,
        words: None,
    };
    let updated = VocabularySetRepo::update(&pool, set.id, owner, &update)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "After");
    assert_eq!(updated.words.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_set(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let set = VocabularySetRepo::create(&pool, owner, &new_set("Gone"))
        .await
        .unwrap();

    assert!(VocabularySetRepo::delete(&pool, set.id, owner).await.unwrap());
    assert!(VocabularySetRepo::find_for_owner(&pool, set.id, owner)
        .await
        .unwrap()
        .is_none());
}
