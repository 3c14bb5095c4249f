// End-to-end plan mutation flows: optimistic local state plus the mock
// backend, settled through the store helpers.
use dinehall::client::ApiClient;
use dinehall::error::ApiError;
use dinehall::model::period::resolve_bucket;
use dinehall::model::plan::MealBucket;
use dinehall::store::{self, PlanStore, StepDirection};
use mockito::{Matcher, Server};

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const DAILY_BODY: &str = r#"{
    "date": "2024-03-10",
    "total_calories": 220.0,
    "total_protein": 31.0,
    "total_carbs": 0.0,
    "total_fat": 0.0,
    "meals": {
        "breakfast": [],
        "lunch": [
            {"id": 7, "menu_item_id": 4821, "menu_item_name": "Grilled Chicken",
             "meal_type": "lunch", "servings": 1.0,
             "calories_per_serving": 220.0, "protein_per_serving": 31.0,
             "carbs_per_serving": null, "fat_per_serving": null,
             "total_calories": 220.0, "total_protein": 31.0,
             "total_carbs": 0.0, "total_fat": 0.0}
        ],
        "dinner": [],
        "snack": []
    },
    "goals": {"calories": 2000.0, "protein": null, "carbs": null, "fat": null}
}"#;

async fn loaded_store(client: &ApiClient) -> PlanStore {
    let mut store = PlanStore::new();
    store.select_date(date(2024, 3, 10));
    store.apply_daily(client.daily_plan(date(2024, 3, 10)).await.unwrap());
    assert!(store.daily.is_some());
    store
}

async fn daily_mock(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/plan/daily/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DAILY_BODY)
        .create_async()
        .await
}

#[tokio::test]
async fn test_increment_commits_and_adopts_server_totals() {
    let mut server = Server::new_async().await;
    let _daily = daily_mock(&mut server).await;
    let _mock = server
        .mock("PATCH", "/plan/item/7/")
        .match_body(Matcher::Json(serde_json::json!({"servings": 1.25})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id": 7, "menu_item_id": 4821, "menu_item_name": "Grilled Chicken",
                "meal_type": "lunch", "servings": 1.25,
                "calories_per_serving": 220.0, "protein_per_serving": 31.0,
                "carbs_per_serving": null, "fat_per_serving": null,
                "total_calories": 275.0, "total_protein": 38.75,
                "total_carbs": 0.0, "total_fat": 0.0}"#,
        )
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), Some("tok".into()), 10).unwrap();
    let mut store = loaded_store(&client).await;

    let committed = store::commit_servings(&client, &mut store, 7, StepDirection::Increment)
        .await
        .unwrap();
    assert_eq!(committed, Some(1.25));

    let daily = store.daily.as_ref().unwrap();
    assert_eq!(daily.meals.bucket(MealBucket::Lunch)[0].servings, 1.25);
    assert_eq!(daily.total_calories, 275.0);
    assert!(!store.is_pending(7));
}

#[tokio::test]
async fn test_failed_commit_rolls_back_servings() {
    let mut server = Server::new_async().await;
    let _daily = daily_mock(&mut server).await;
    let _mock = server
        .mock("PATCH", "/plan/item/7/")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), Some("tok".into()), 10).unwrap();
    let mut store = loaded_store(&client).await;

    let err = store::commit_servings(&client, &mut store, 7, StepDirection::Increment)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 500, .. }));

    // rolled back to the fetched quantity, nothing left pending
    let daily = store.daily.as_ref().unwrap();
    assert_eq!(daily.meals.bucket(MealBucket::Lunch)[0].servings, 1.0);
    assert_eq!(daily.total_calories, 220.0);
    assert!(!store.is_pending(7));
}

#[tokio::test]
async fn test_decrement_at_floor_never_hits_the_network() {
    let mut server = Server::new_async().await;
    let _daily = daily_mock(&mut server).await;
    // no PATCH mock: a request would fail loudly

    let client = ApiClient::new(&server.url(), Some("tok".into()), 10).unwrap();
    let mut store = loaded_store(&client).await;

    // walk down to the floor, then one more
    for _ in 0..3 {
        let next = store.step_servings(7, StepDirection::Decrement).unwrap();
        store.settle_servings(7, {
            let mut item = store.daily.as_ref().unwrap().meals.bucket(MealBucket::Lunch)[0].clone();
            item.set_servings(next);
            Ok(item)
        });
    }
    assert_eq!(
        store.daily.as_ref().unwrap().meals.bucket(MealBucket::Lunch)[0].servings,
        0.25
    );

    let committed = store::commit_servings(&client, &mut store, 7, StepDirection::Decrement)
        .await
        .unwrap();
    assert_eq!(committed, None);
}

#[tokio::test]
async fn test_hung_update_times_out_and_rolls_back() {
    let mut server = Server::new_async().await;
    let _daily = daily_mock(&mut server).await;

    let fetch_client = ApiClient::new(&server.url(), Some("tok".into()), 10).unwrap();
    let mut store = loaded_store(&fetch_client).await;

    // a server that accepts the connection but never answers
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let hold = std::thread::spawn(move || {
        let conn = listener.accept();
        std::thread::sleep(std::time::Duration::from_secs(3));
        drop(conn);
    });

    let hung_client =
        ApiClient::new(&format!("http://{}", addr), Some("tok".into()), 1).unwrap();
    let err = store::commit_servings(&hung_client, &mut store, 7, StepDirection::Increment)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));

    // the timeout settled as a failure: optimistic edit rolled back
    let daily = store.daily.as_ref().unwrap();
    assert_eq!(daily.meals.bucket(MealBucket::Lunch)[0].servings, 1.0);
    assert_eq!(daily.total_calories, 220.0);
    assert!(!store.is_pending(7));

    let _ = hold.join();
}

#[tokio::test]
async fn test_delete_flow_removes_locally_and_remotely() {
    let mut server = Server::new_async().await;
    let _daily = daily_mock(&mut server).await;
    let delete_mock = server
        .mock("DELETE", "/plan/item/7/delete/")
        .with_status(204)
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), Some("tok".into()), 10).unwrap();
    let mut store = loaded_store(&client).await;

    let deleted = store::commit_delete(&client, &mut store, 7).await.unwrap();
    assert!(deleted);
    delete_mock.assert_async().await;

    let daily = store.daily.as_ref().unwrap();
    assert_eq!(daily.meals.meal_count(), 0);
    assert_eq!(daily.total_calories, 0.0);
}

#[tokio::test]
async fn test_failed_delete_leaves_item_removed_for_refetch() {
    let mut server = Server::new_async().await;
    let _daily = daily_mock(&mut server).await;
    let _mock = server
        .mock("DELETE", "/plan/item/7/delete/")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), Some("tok".into()), 10).unwrap();
    let mut store = loaded_store(&client).await;

    let err = store::commit_delete(&client, &mut store, 7).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 500, .. }));

    // the optimistic removal stands; the caller must refetch the day
    assert_eq!(store.daily.as_ref().unwrap().meals.meal_count(), 0);
    assert!(!store.is_pending(7));
}

#[tokio::test]
async fn test_add_from_ambiguous_period_requires_a_choice() {
    let mut server = Server::new_async().await;
    let _daily = daily_mock(&mut server).await;
    let _mock = server
        .mock("POST", "/plan/add-item/")
        .match_body(Matcher::Json(serde_json::json!({
            "date": "2024-03-10",
            "menu_item_id": 5000,
            "meal_type": "snack"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id": 8, "menu_item_id": 5000, "menu_item_name": "Trail Mix",
                "meal_type": "snack", "servings": 1.0,
                "calories_per_serving": 150.0, "protein_per_serving": 4.0,
                "carbs_per_serving": 12.0, "fat_per_serving": 9.0,
                "total_calories": 150.0, "total_protein": 4.0,
                "total_carbs": 12.0, "total_fat": 9.0}"#,
        )
        .create_async()
        .await;

    let client = ApiClient::new(&server.url(), Some("tok".into()), 10).unwrap();
    let mut store = loaded_store(&client).await;

    // an all-day station gives no bucket on its own
    assert_eq!(resolve_bucket("All Day", None), None);

    // with an explicit choice the insertion proceeds
    let bucket = resolve_bucket("All Day", Some(MealBucket::Snack)).unwrap();
    let created = store::add_to_plan(&client, &mut store, date(2024, 3, 10), 5000, bucket, None)
        .await
        .unwrap();
    assert_eq!(created.id, 8);

    let daily = store.daily.as_ref().unwrap();
    assert_eq!(daily.meals.bucket(MealBucket::Snack).len(), 1);
    assert_eq!(daily.total_calories, 370.0);
}
