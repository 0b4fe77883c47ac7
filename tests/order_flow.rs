//! Order intake and lifecycle, end to end against an in-memory database.

use glow_server::db;
use glow_server::db::models::{
    ColorInput, OrderCreate, OrderItemInput, OrderSource, OrderStatus, ProductCreate,
};
use glow_server::db::repository::order::{
    self, OrderFilter, WHATSAPP_CUSTOMER_ADDRESS, WHATSAPP_CUSTOMER_NAME, WHATSAPP_CUSTOMER_PHONE,
};
use glow_server::db::repository::{RepoError, product};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

// One connection so every statement sees the same in-memory database
async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    db::migrate(&pool).await.expect("apply migrations");
    pool
}

fn product_fixture(stock: Option<i64>, colors: Vec<ColorInput>) -> ProductCreate {
    ProductCreate {
        name: "Sérum éclat".into(),
        name_ar: "سيروم".into(),
        description: "Sérum visage à la vitamine C".into(),
        description_ar: "وصف".into(),
        price: 2500.0,
        discount_percent: 0.0,
        category: "soin".into(),
        image_url: "https://img.example/serum.jpg".into(),
        stock,
        colors,
    }
}

fn color_fixture(name: &str, stock: i64) -> ColorInput {
    ColorInput {
        id: None,
        is_new: true,
        name: name.into(),
        name_ar: String::new(),
        color_code: "#cc3355".into(),
        stock,
        image_url: None,
    }
}

fn order_fixture(items: Vec<OrderItemInput>) -> OrderCreate {
    OrderCreate {
        customer_name: Some("Amina B.".into()),
        customer_phone: Some("0550123456".into()),
        customer_address: Some("12 rue Didouche, Alger".into()),
        notes: None,
        items: Some(items),
    }
}

fn item(product_id: i64, color_id: Option<i64>, quantity: i64, price: f64) -> OrderItemInput {
    OrderItemInput {
        product_id,
        color_id,
        quantity,
        price,
    }
}

async fn product_stock(pool: &SqlitePool, id: i64) -> Option<i64> {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn color_stock(pool: &SqlitePool, id: i64) -> i64 {
    sqlx::query_scalar("SELECT stock FROM product_colors WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn website_order_decrements_product_stock() {
    let pool = pool().await;
    let p = product::create(&pool, product_fixture(Some(5), vec![]))
        .await
        .unwrap();

    let created = order::create(
        &pool,
        order_fixture(vec![item(p.product.id, None, 3, 2500.0)]),
        OrderSource::Website,
    )
    .await
    .unwrap();

    assert!(created.shortfalls.is_empty());
    assert_eq!(product_stock(&pool, p.product.id).await, Some(2));

    let stored = order::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(stored.status, "pending");
    assert_eq!(stored.source, "website");
    assert_eq!(stored.customer_name, "Amina B.");
    assert!(stored.completed_date.is_none());
}

#[tokio::test]
async fn color_item_decrements_the_color_not_the_product() {
    let pool = pool().await;
    let p = product::create(&pool, product_fixture(None, vec![color_fixture("Corail", 1)]))
        .await
        .unwrap();
    let color_id = p.colors[0].id;

    let created = order::create(
        &pool,
        order_fixture(vec![item(p.product.id, Some(color_id), 1, 900.0)]),
        OrderSource::Website,
    )
    .await
    .unwrap();

    assert!(created.shortfalls.is_empty());
    assert_eq!(color_stock(&pool, color_id).await, 0);
    // Product-level stock stays NULL
    assert_eq!(product_stock(&pool, p.product.id).await, None);
}

#[tokio::test]
async fn whatsapp_order_uses_placeholders_and_skips_stock() {
    let pool = pool().await;
    let p = product::create(&pool, product_fixture(Some(5), vec![]))
        .await
        .unwrap();

    let created = order::create(
        &pool,
        order_fixture(vec![item(p.product.id, None, 3, 2500.0)]),
        OrderSource::Whatsapp,
    )
    .await
    .unwrap();

    let stored = order::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(stored.customer_name, WHATSAPP_CUSTOMER_NAME);
    assert_eq!(stored.customer_phone, WHATSAPP_CUSTOMER_PHONE);
    assert_eq!(stored.customer_address, WHATSAPP_CUSTOMER_ADDRESS);
    assert_eq!(stored.source, "whatsapp");

    // No decrement for WhatsApp intake
    assert_eq!(product_stock(&pool, p.product.id).await, Some(5));
}

#[tokio::test]
async fn insufficient_stock_is_a_shortfall_not_a_failure() {
    let pool = pool().await;
    let p = product::create(&pool, product_fixture(Some(5), vec![]))
        .await
        .unwrap();

    let created = order::create(
        &pool,
        order_fixture(vec![item(p.product.id, None, 10, 2500.0)]),
        OrderSource::Website,
    )
    .await
    .unwrap();

    assert_eq!(created.shortfalls.len(), 1);
    assert_eq!(created.shortfalls[0].product_id, p.product.id);
    assert_eq!(created.shortfalls[0].quantity, 10);
    // The guarded decrement was a no-op
    assert_eq!(product_stock(&pool, p.product.id).await, Some(5));
    // The order itself still landed
    assert!(order::find_by_id(&pool, created.id).await.unwrap().is_some());
}

#[tokio::test]
async fn invalid_orders_leave_no_rows_behind() {
    let pool = pool().await;
    let p = product::create(&pool, product_fixture(Some(5), vec![]))
        .await
        .unwrap();

    let empty = order::create(&pool, order_fixture(vec![]), OrderSource::Website).await;
    assert!(matches!(empty, Err(RepoError::Validation(_))));

    let bad_qty = order::create(
        &pool,
        order_fixture(vec![item(p.product.id, None, 0, 2500.0)]),
        OrderSource::Website,
    )
    .await;
    assert!(matches!(bad_qty, Err(RepoError::Validation(_))));

    let missing_customer = order::create(
        &pool,
        OrderCreate {
            customer_name: None,
            customer_phone: Some("0550123456".into()),
            customer_address: Some("Alger".into()),
            notes: None,
            items: Some(vec![item(p.product.id, None, 1, 2500.0)]),
        },
        OrderSource::Website,
    )
    .await;
    assert!(matches!(missing_customer, Err(RepoError::Validation(_))));

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orders, 0);
    assert_eq!(product_stock(&pool, p.product.id).await, Some(5));
}

#[tokio::test]
async fn completed_date_is_set_exactly_once() {
    let pool = pool().await;
    let p = product::create(&pool, product_fixture(Some(5), vec![]))
        .await
        .unwrap();
    let created = order::create(
        &pool,
        order_fixture(vec![item(p.product.id, None, 1, 2500.0)]),
        OrderSource::Website,
    )
    .await
    .unwrap();

    let delivered = order::update_status(&pool, created.id, OrderStatus::Delivered)
        .await
        .unwrap();
    let first = delivered.completed_date.expect("set on first delivery");

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    // Bouncing through another status and back must not move the date
    order::update_status(&pool, created.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    let again = order::update_status(&pool, created.id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(again.completed_date, Some(first));
}

#[tokio::test]
async fn unknown_order_status_update_is_not_found() {
    let pool = pool().await;
    let missing = order::update_status(&pool, 999, OrderStatus::Confirmed).await;
    assert!(matches!(missing, Err(RepoError::NotFound(_))));
}

#[tokio::test]
async fn filters_compose_with_and() {
    let pool = pool().await;
    let p = product::create(&pool, product_fixture(Some(50), vec![]))
        .await
        .unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        let created = order::create(
            &pool,
            order_fixture(vec![item(p.product.id, None, 1, 2500.0)]),
            OrderSource::Website,
        )
        .await
        .unwrap();
        ids.push(created.id);
    }

    order::update_status(&pool, ids[1], OrderStatus::Confirmed)
        .await
        .unwrap();

    // Pin the dates: 14th, 15th, 16th of March
    for (id, date) in ids.iter().zip(["2024-03-14", "2024-03-15", "2024-03-16"]) {
        let millis = glow_server::utils::time::day_start_millis(date).unwrap() + 3600_000;
        sqlx::query("UPDATE orders SET order_date = ? WHERE id = ?")
            .bind(millis)
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();
    }

    // startDate alone is an inclusive lower bound
    let from_15th = order::find_filtered(
        &pool,
        &OrderFilter {
            start_millis: glow_server::utils::time::day_start_millis("2024-03-15"),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(from_15th.len(), 2);
    // Newest first
    assert!(from_15th[0].order_date > from_15th[1].order_date);

    // Status and date range combine
    let confirmed_in_range = order::find_filtered(
        &pool,
        &OrderFilter {
            status: Some("confirmed".into()),
            start_millis: glow_server::utils::time::day_start_millis("2024-03-14"),
            end_millis: glow_server::utils::time::day_end_millis("2024-03-15"),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(confirmed_in_range.len(), 1);
    assert_eq!(confirmed_in_range[0].id, ids[1]);

    // An orderId narrows everything else away
    let by_id = order::find_filtered(
        &pool,
        &OrderFilter {
            order_id: Some(ids[2]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].id, ids[2]);
}

#[tokio::test]
async fn deleting_an_order_cascades_to_items() {
    let pool = pool().await;
    let p = product::create(&pool, product_fixture(Some(5), vec![]))
        .await
        .unwrap();
    let created = order::create(
        &pool,
        order_fixture(vec![item(p.product.id, None, 1, 2500.0)]),
        OrderSource::Website,
    )
    .await
    .unwrap();

    assert!(order::delete(&pool, created.id).await.unwrap());
    assert!(!order::delete(&pool, created.id).await.unwrap());

    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = ?")
        .bind(created.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(items, 0);
}

#[tokio::test]
async fn item_details_resolve_names_and_images() {
    let pool = pool().await;
    let mut color = color_fixture("Corail", 3);
    color.image_url = Some("https://img.example/corail.jpg".into());
    let p = product::create(&pool, product_fixture(None, vec![color]))
        .await
        .unwrap();
    let color_id = p.colors[0].id;

    let created = order::create(
        &pool,
        order_fixture(vec![item(p.product.id, Some(color_id), 2, 900.0)]),
        OrderSource::Website,
    )
    .await
    .unwrap();

    let details = order::find_items(&pool, created.id).await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].product_name.as_deref(), Some("Sérum éclat"));
    assert_eq!(details[0].color_name.as_deref(), Some("Corail"));
    // The color image wins over the product image
    assert_eq!(
        details[0].image_url.as_deref(),
        Some("https://img.example/corail.jpg")
    );
}
