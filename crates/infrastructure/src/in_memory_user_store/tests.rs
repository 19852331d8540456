use chrono::{Days, Utc};
use serde_json::json;

use gigbook_domain::WorkDay;

use super::*;

fn new_user(email: &str, user_type: &str, instrument: Option<&str>) -> NewUser {
    NewUser {
        salt: "salt".to_owned(),
        hash: "hash".to_owned(),
        name: "Ella".to_owned(),
        email: email.to_owned(),
        dob: NaiveDate::from_ymd_opt(1990, 4, 25),
        city: Some("Odesa".to_owned()),
        phone: Some("+380111111111".to_owned()),
        gender: None,
        user_type: user_type.to_owned(),
        musical_instrument: instrument.map(str::to_owned),
        year_commercial_exp: Some(7),
        image_url: None,
        google_id: None,
        facebook_id: None,
    }
}

async fn seed_user(store: &InMemoryUserStore, email: &str) -> UserId {
    match store.create_profile(&new_user(email, "pro", Some("sax"))).await {
        Ok(id) => id,
        Err(error) => panic!("failed to seed user: {error}"),
    }
}

async fn seed_workday(store: &InMemoryUserStore, user_id: UserId, day: WorkDay) {
    let entry = WorkdayEntry {
        date: day.date,
        day_off: day.day_off,
    };
    if let Err(error) = store.mark_working_day(user_id, &entry).await {
        panic!("failed to seed workday: {error}");
    }
}

#[tokio::test]
async fn projection_is_exactly_id_plus_requested_public_fields() {
    let store = InMemoryUserStore::new();
    let user_id = seed_user(&store, "ella@example.com").await;

    let fields = ProfileField::project_props("email,name,salt,hash,email");
    let profile = store.get_profile(user_id, &fields).await;

    let Ok(Some(profile)) = profile else {
        panic!("expected a profile");
    };
    let selected: Vec<ProfileField> = profile
        .attributes
        .iter()
        .map(|(field, _)| *field)
        .collect();
    assert_eq!(selected, vec![ProfileField::Name, ProfileField::Email]);

    let map = profile.into_map();
    assert_eq!(map.len(), 3); // id + name + email
    assert!(map.contains_key("id"));
    assert!(!map.contains_key("salt"));
    assert!(!map.contains_key("hash"));
}

#[tokio::test]
async fn full_whitelist_projection_never_contains_secrets() {
    let store = InMemoryUserStore::new();
    let user_id = seed_user(&store, "ella@example.com").await;

    let profile = store.get_profile(user_id, &PUBLIC_ATTRIBUTES).await;
    let Ok(Some(profile)) = profile else {
        panic!("expected a profile");
    };
    assert_eq!(profile.attributes.len(), PUBLIC_ATTRIBUTES.len());
    assert_eq!(
        profile.attribute(ProfileField::Email),
        Some(&json!("ella@example.com"))
    );
}

#[tokio::test]
async fn get_profile_of_unknown_id_is_none() {
    let store = InMemoryUserStore::new();
    assert!(matches!(
        store.get_profile(UserId::new(), &PUBLIC_ATTRIBUTES).await,
        Ok(None)
    ));
}

#[tokio::test]
async fn ensure_unique_reflects_stored_emails() {
    let store = InMemoryUserStore::new();
    seed_user(&store, "taken@example.com").await;

    assert!(matches!(
        store.ensure_unique(UniqueAttribute::Email, "taken@example.com").await,
        Ok(false)
    ));
    assert!(matches!(
        store.ensure_unique(UniqueAttribute::Email, "fresh@example.com").await,
        Ok(true)
    ));
}

#[tokio::test]
async fn duplicate_email_insert_is_a_conflict() {
    let store = InMemoryUserStore::new();
    seed_user(&store, "dup@example.com").await;

    let result = store
        .create_profile(&new_user("dup@example.com", "pro", None))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_profile_persists_typed_values() {
    let store = InMemoryUserStore::new();
    let user_id = seed_user(&store, "ella@example.com").await;

    let changes = vec![
        (ProfileField::City, json!("Dnipro")),
        (ProfileField::YearCommercialExp, json!(9)),
        (ProfileField::Dob, json!("1991-01-02")),
        (ProfileField::Gender, Value::Null),
    ];
    let updated = store.update_profile(user_id, &changes).await;
    assert!(updated.is_ok());

    let profile = store.get_profile(user_id, &PUBLIC_ATTRIBUTES).await;
    let Ok(Some(profile)) = profile else {
        panic!("expected a profile");
    };
    assert_eq!(profile.attribute(ProfileField::City), Some(&json!("Dnipro")));
    assert_eq!(
        profile.attribute(ProfileField::YearCommercialExp),
        Some(&json!(9))
    );
    assert_eq!(
        profile.attribute(ProfileField::Dob),
        Some(&json!("1991-01-02"))
    );
    assert_eq!(profile.attribute(ProfileField::Gender), Some(&Value::Null));
}

#[tokio::test]
async fn update_profile_rejects_a_malformed_date() {
    let store = InMemoryUserStore::new();
    let user_id = seed_user(&store, "ella@example.com").await;

    let changes = vec![(ProfileField::Dob, json!("02/01/1991"))];
    let result = store.update_profile(user_id, &changes).await;
    assert!(result.is_err_and(|error| error.is_validation()));
}

#[tokio::test]
async fn provider_id_update_and_identity_lookup() {
    let store = InMemoryUserStore::new();
    let user_id = seed_user(&store, "a@x.com").await;

    let updated = store
        .update_provider_id(user_id, AuthProvider::Google, "google-999")
        .await;
    assert!(updated.is_ok());

    // Email branch matches even though the provider id differs.
    let identity = store
        .find_identity(AuthProvider::Google, Some("other-id"), Some("a@x.com"))
        .await;
    let Ok(Some(identity)) = identity else {
        panic!("expected an identity");
    };
    assert_eq!(identity.id, user_id);
    assert_eq!(identity.provider_id.as_deref(), Some("google-999"));

    // Provider branch alone.
    let identity = store
        .find_identity(AuthProvider::Google, Some("google-999"), None)
        .await;
    assert!(matches!(identity, Ok(Some(_))));

    // Neither key matches.
    let identity = store
        .find_identity(AuthProvider::Facebook, Some("google-999"), None)
        .await;
    assert!(matches!(identity, Ok(None)));
}

#[tokio::test]
async fn mark_working_day_overwrites_the_day_off_flag() {
    let store = InMemoryUserStore::new();
    let user_id = seed_user(&store, "ella@example.com").await;
    let date = Utc::now().date_naive();

    seed_workday(&store, user_id, WorkDay { user_id, date, day_off: true }).await;
    seed_workday(&store, user_id, WorkDay { user_id, date, day_off: false }).await;

    let filter = BusynessFilter {
        user_type: "pro".to_owned(),
        day_off: false,
        ..BusynessFilter::default()
    };
    let results = store.find_users_by_busyness(&filter).await;
    assert!(matches!(results, Ok(profiles) if profiles.len() == 1));
}

#[tokio::test]
async fn mark_working_day_for_unknown_user_is_not_found() {
    let store = InMemoryUserStore::new();
    let entry = WorkdayEntry {
        date: Utc::now().date_naive(),
        day_off: false,
    };
    let result = store.mark_working_day(UserId::new(), &entry).await;
    assert!(result.is_err_and(|error| error.is_not_found()));
}

#[tokio::test]
async fn busyness_includes_users_without_an_instrument_when_unfiltered() {
    let store = InMemoryUserStore::new();
    let user_id = match store.create_profile(&new_user("a@x.com", "pro", None)).await {
        Ok(id) => id,
        Err(error) => panic!("failed to seed user: {error}"),
    };
    let today = Utc::now().date_naive();
    seed_workday(&store, user_id, WorkDay { user_id, date: today, day_off: false }).await;

    let filter = BusynessFilter {
        user_type: "pro".to_owned(),
        day_off: false,
        ..BusynessFilter::default()
    };
    let results = store.find_users_by_busyness(&filter).await;
    let Ok(results) = results else {
        panic!("expected results");
    };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, user_id);
    assert_eq!(
        results[0].attribute(ProfileField::MusicalInstrument),
        Some(&Value::Null)
    );
}

#[tokio::test]
async fn busyness_instrument_filter_is_an_exact_match() {
    let store = InMemoryUserStore::new();
    let sax_player = seed_user(&store, "sax@example.com").await;
    let drummer = match store
        .create_profile(&new_user("drums@example.com", "pro", Some("drums")))
        .await
    {
        Ok(id) => id,
        Err(error) => panic!("failed to seed user: {error}"),
    };

    let today = Utc::now().date_naive();
    for user_id in [sax_player, drummer] {
        seed_workday(&store, user_id, WorkDay { user_id, date: today, day_off: false }).await;
    }

    let filter = BusynessFilter {
        musical_instrument: Some("drums".to_owned()),
        user_type: "pro".to_owned(),
        day_off: false,
        ..BusynessFilter::default()
    };
    let results = store.find_users_by_busyness(&filter).await;
    let Ok(results) = results else {
        panic!("expected results");
    };
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, drummer);
}

#[tokio::test]
async fn busyness_default_window_covers_yesterday_through_tomorrow() {
    let store = InMemoryUserStore::new();
    let user_id = seed_user(&store, "ella@example.com").await;
    let today = Utc::now().date_naive();

    let far_future = today.checked_add_days(Days::new(10)).unwrap_or(today);
    seed_workday(&store, user_id, WorkDay { user_id, date: far_future, day_off: false }).await;

    let filter = BusynessFilter {
        user_type: "pro".to_owned(),
        day_off: false,
        ..BusynessFilter::default()
    };
    let results = store.find_users_by_busyness(&filter).await;
    assert!(matches!(&results, Ok(profiles) if profiles.is_empty()));

    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    seed_workday(&store, user_id, WorkDay { user_id, date: yesterday, day_off: false }).await;

    let results = store.find_users_by_busyness(&filter).await;
    assert!(matches!(&results, Ok(profiles) if profiles.len() == 1));
}

#[tokio::test]
async fn busyness_returns_each_user_at_most_once() {
    let store = InMemoryUserStore::new();
    let user_id = seed_user(&store, "ella@example.com").await;
    let today = Utc::now().date_naive();
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

    seed_workday(&store, user_id, WorkDay { user_id, date: today, day_off: false }).await;
    seed_workday(&store, user_id, WorkDay { user_id, date: tomorrow, day_off: false }).await;

    let filter = BusynessFilter {
        user_type: "pro".to_owned(),
        day_off: false,
        ..BusynessFilter::default()
    };
    let results = store.find_users_by_busyness(&filter).await;
    assert!(matches!(&results, Ok(profiles) if profiles.len() == 1));
}

#[tokio::test]
async fn busyness_respects_user_type_and_day_off() {
    let store = InMemoryUserStore::new();
    let user_id = seed_user(&store, "ella@example.com").await;
    let today = Utc::now().date_naive();
    seed_workday(&store, user_id, WorkDay { user_id, date: today, day_off: false }).await;

    let wrong_type = BusynessFilter {
        user_type: "client".to_owned(),
        day_off: false,
        ..BusynessFilter::default()
    };
    assert!(matches!(
        store.find_users_by_busyness(&wrong_type).await,
        Ok(profiles) if profiles.is_empty()
    ));

    let wrong_flag = BusynessFilter {
        user_type: "pro".to_owned(),
        day_off: true,
        ..BusynessFilter::default()
    };
    assert!(matches!(
        store.find_users_by_busyness(&wrong_flag).await,
        Ok(profiles) if profiles.is_empty()
    ));
}
