//! Live integration tests for pawkeep-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/pawkeep-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{Duration, Utc};
use pawkeep_db::{
    create_pet, create_post, create_reminder, create_user, create_vaccination, create_weight_log,
    deactivate_pet, get_active_walker, get_owned_pet, like_count, list_due_reminders,
    list_owned_pets, list_scheduled_vaccinations_due, list_weight_logs, seed_defaults,
    toggle_like, update_pet, LikeOutcome, NewPet, NewReminder, NewVaccination, NewWeightLog,
    PetUpdate,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a user through the public API and return its generated `id`.
async fn insert_test_user(pool: &sqlx::PgPool, email: &str) -> i64 {
    create_user(pool, "Test User", email, None, "not-a-real-hash")
        .await
        .unwrap_or_else(|e| panic!("insert_test_user failed for '{email}': {e}"))
        .id
}

fn make_new_pet(name: &str) -> NewPet {
    NewPet {
        name: name.to_string(),
        species: "Dog".to_string(),
        breed: "Labrador Retriever".to_string(),
        age_years: 3,
        age_months: 2,
        weight_kg: 24.5,
        gender: "male".to_string(),
        color: None,
        microchip_id: None,
        medical_notes: None,
        emergency_contact: None,
        vet_name: None,
        vet_phone: None,
    }
}

fn make_new_reminder(pet_id: i64, title: &str, due_date: chrono::DateTime<Utc>) -> NewReminder {
    NewReminder {
        pet_id,
        title: title.to_string(),
        description: None,
        checkup_type: "general".to_string(),
        due_date,
        due_time: "10:00".to_string(),
        priority: "medium".to_string(),
        location: None,
        vet_name: None,
        vet_phone: None,
        notes: None,
        reminder_enabled: true,
        reminder_hours: 24,
    }
}

// ---------------------------------------------------------------------------
// Section 1: Seeding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn seed_defaults_is_idempotent(pool: sqlx::PgPool) {
    let first = seed_defaults(&pool).await.expect("first seed failed");
    assert!(first > 0, "fresh database should seed rows, got {first}");

    let species_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM species")
        .fetch_one(&pool)
        .await
        .expect("count species");
    assert_eq!(species_count, 8);

    let second = seed_defaults(&pool).await.expect("second seed failed");
    assert_eq!(second, 0, "re-seeding must not duplicate rows");
}

// ---------------------------------------------------------------------------
// Section 2: Pet ownership and lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn pet_visibility_is_scoped_to_owner(pool: sqlx::PgPool) {
    let owner = insert_test_user(&pool, "owner@example.com").await;
    let stranger = insert_test_user(&pool, "stranger@example.com").await;

    let pet = create_pet(&pool, owner, &make_new_pet("Bruno"))
        .await
        .expect("create_pet failed");

    let seen = get_owned_pet(&pool, pet.id, owner)
        .await
        .expect("get_owned_pet failed");
    assert_eq!(seen.map(|p| p.name), Some("Bruno".to_string()));

    let hidden = get_owned_pet(&pool, pet.id, stranger)
        .await
        .expect("get_owned_pet failed");
    assert!(hidden.is_none(), "foreign pet must look nonexistent");

    assert!(list_owned_pets(&pool, stranger)
        .await
        .expect("list_owned_pets failed")
        .is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn deactivated_pet_disappears_from_queries(pool: sqlx::PgPool) {
    let owner = insert_test_user(&pool, "deactivate@example.com").await;
    let pet = create_pet(&pool, owner, &make_new_pet("Bruno"))
        .await
        .expect("create_pet failed");

    assert!(deactivate_pet(&pool, pet.id, owner)
        .await
        .expect("deactivate_pet failed"));

    assert!(get_owned_pet(&pool, pet.id, owner)
        .await
        .expect("get_owned_pet failed")
        .is_none());

    // A second deactivation finds no active row.
    assert!(!deactivate_pet(&pool, pet.id, owner)
        .await
        .expect("deactivate_pet failed"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn pet_update_keeps_unset_fields(pool: sqlx::PgPool) {
    let owner = insert_test_user(&pool, "update@example.com").await;
    let pet = create_pet(&pool, owner, &make_new_pet("Bruno"))
        .await
        .expect("create_pet failed");

    let update = PetUpdate {
        name: Some("Brownie".to_string()),
        species: None,
        breed: None,
        age_years: None,
        age_months: None,
        weight_kg: None,
        gender: None,
        color: None,
        microchip_id: None,
        medical_notes: None,
        emergency_contact: None,
        vet_name: None,
        vet_phone: None,
    };

    let updated = update_pet(&pool, pet.id, owner, &update)
        .await
        .expect("update_pet failed")
        .expect("pet should still exist");

    assert_eq!(updated.name, "Brownie");
    assert_eq!(updated.species, "Dog");
    assert!((updated.weight_kg - 24.5).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Section 3: Weight logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn weight_log_insert_updates_pet_weight(pool: sqlx::PgPool) {
    let owner = insert_test_user(&pool, "weight@example.com").await;
    let pet = create_pet(&pool, owner, &make_new_pet("Bruno"))
        .await
        .expect("create_pet failed");

    let earlier = Utc::now() - Duration::days(30);
    for (weight, recorded_at) in [(25.0, earlier), (26.5, Utc::now())] {
        create_weight_log(
            &pool,
            &NewWeightLog {
                pet_id: pet.id,
                weight_kg: weight,
                recorded_at,
                notes: None,
                body_condition_score: None,
                activity_level: None,
                feeding_amount: None,
            },
        )
        .await
        .expect("create_weight_log failed");
    }

    let logs = list_weight_logs(&pool, owner, Some(pet.id))
        .await
        .expect("list_weight_logs failed");
    assert_eq!(logs.len(), 2);
    assert!(
        logs[0].recorded_at <= logs[1].recorded_at,
        "logs should come back in record order"
    );

    let refreshed = get_owned_pet(&pool, pet.id, owner)
        .await
        .expect("get_owned_pet failed")
        .expect("pet should still exist");
    assert!(
        (refreshed.weight_kg - 26.5).abs() < f64::EPSILON,
        "pet weight should track the latest log, got {}",
        refreshed.weight_kg
    );
}

// ---------------------------------------------------------------------------
// Section 4: Due reminders and scheduled vaccinations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn due_reminders_include_overdue_rows(pool: sqlx::PgPool) {
    let owner = insert_test_user(&pool, "reminders@example.com").await;
    let pet = create_pet(&pool, owner, &make_new_pet("Bruno"))
        .await
        .expect("create_pet failed");

    let now = Utc::now();
    create_reminder(&pool, &make_new_reminder(pet.id, "Overdue checkup", now - Duration::days(2)))
        .await
        .expect("create_reminder failed");
    create_reminder(&pool, &make_new_reminder(pet.id, "Soon checkup", now + Duration::days(3)))
        .await
        .expect("create_reminder failed");
    create_reminder(&pool, &make_new_reminder(pet.id, "Distant checkup", now + Duration::days(90)))
        .await
        .expect("create_reminder failed");

    let due = list_due_reminders(&pool, owner, now + Duration::days(7))
        .await
        .expect("list_due_reminders failed");

    let titles: Vec<&str> = due.iter().map(|(r, _)| r.title.as_str()).collect();
    assert_eq!(due.len(), 2, "expected overdue + soon, got {titles:?}");
    assert!(titles.contains(&"Overdue checkup"));
    assert!(titles.contains(&"Soon checkup"));
    assert!(due.iter().all(|(_, pet_name)| pet_name == "Bruno"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn scheduled_vaccinations_due_skip_administered_records(pool: sqlx::PgPool) {
    let owner = insert_test_user(&pool, "vaccinations@example.com").await;
    let pet = create_pet(&pool, owner, &make_new_pet("Bruno"))
        .await
        .expect("create_pet failed");

    let now = Utc::now();
    create_vaccination(
        &pool,
        &NewVaccination {
            pet_id: pet.id,
            vaccine_name: "Rabies".to_string(),
            vaccine_type: "core".to_string(),
            date_administered: Some(now - Duration::days(100)),
            next_due_date: None,
            veterinarian: None,
            batch_number: None,
            notes: None,
            is_scheduled: false,
            scheduled_date: None,
            scheduled_time: None,
            location: None,
            vet_phone: None,
            reminder_enabled: false,
            reminder_hours: 0,
        },
    )
    .await
    .expect("create_vaccination failed");

    create_vaccination(
        &pool,
        &NewVaccination {
            pet_id: pet.id,
            vaccine_name: "Distemper".to_string(),
            vaccine_type: "core".to_string(),
            date_administered: None,
            next_due_date: None,
            veterinarian: None,
            batch_number: None,
            notes: None,
            is_scheduled: true,
            scheduled_date: Some(now + Duration::days(3)),
            scheduled_time: Some("11:00".to_string()),
            location: None,
            vet_phone: None,
            reminder_enabled: true,
            reminder_hours: 24,
        },
    )
    .await
    .expect("create_vaccination failed");

    let due = list_scheduled_vaccinations_due(&pool, owner, now + Duration::days(7))
        .await
        .expect("list_scheduled_vaccinations_due failed");

    assert_eq!(due.len(), 1);
    assert_eq!(due[0].0.vaccine_name, "Distemper");
    assert_eq!(due[0].1, "Bruno");
}

// ---------------------------------------------------------------------------
// Section 5: Community likes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn like_toggle_round_trip(pool: sqlx::PgPool) {
    let author = insert_test_user(&pool, "author@example.com").await;
    let post = create_post(&pool, author, "Hello", "First post", None)
        .await
        .expect("create_post failed");

    let outcome = toggle_like(&pool, post.id, author)
        .await
        .expect("toggle_like failed");
    assert_eq!(outcome, LikeOutcome::Liked);
    assert_eq!(like_count(&pool, post.id).await.expect("like_count"), 1);

    let outcome = toggle_like(&pool, post.id, author)
        .await
        .expect("toggle_like failed");
    assert_eq!(outcome, LikeOutcome::Unliked);
    assert_eq!(like_count(&pool, post.id).await.expect("like_count"), 0);
}

// ---------------------------------------------------------------------------
// Section 6: Provider roster
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn seeded_walkers_are_retrievable(pool: sqlx::PgPool) {
    seed_defaults(&pool).await.expect("seed failed");

    let id: i64 = sqlx::query_scalar("SELECT id FROM walkers WHERE name = 'Rahul Sharma'")
        .fetch_one(&pool)
        .await
        .expect("seeded walker should exist");

    let walker = get_active_walker(&pool, id)
        .await
        .expect("get_active_walker failed")
        .expect("seeded walker should be active");
    assert!((walker.rate_per_hour - 300.0).abs() < f64::EPSILON);
}
