//! Product and banner CRUD against an in-memory database.

use glow_server::db;
use glow_server::db::models::{BannerCreate, BannerUpdate, ColorInput, ProductCreate, ProductUpdate};
use glow_server::db::repository::{admin, banner, product};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    db::migrate(&pool).await.expect("apply migrations");
    pool
}

fn color(name: &str, stock: i64) -> ColorInput {
    ColorInput {
        id: None,
        is_new: true,
        name: name.into(),
        name_ar: String::new(),
        color_code: "#112233".into(),
        stock,
        image_url: None,
    }
}

fn product_fixture(colors: Vec<ColorInput>) -> ProductCreate {
    ProductCreate {
        name: "Rouge à lèvres".into(),
        name_ar: "أحمر شفاه".into(),
        description: "Fini mat longue tenue".into(),
        description_ar: "وصف".into(),
        price: 900.0,
        discount_percent: 10.0,
        category: "maquillage".into(),
        image_url: "https://img.example/rouge.jpg".into(),
        stock: None,
        colors,
    }
}

fn update_from(create: &ProductCreate, colors: Vec<ColorInput>) -> ProductUpdate {
    ProductUpdate {
        name: create.name.clone(),
        name_ar: create.name_ar.clone(),
        description: create.description.clone(),
        description_ar: create.description_ar.clone(),
        price: create.price,
        discount_percent: create.discount_percent,
        category: create.category.clone(),
        image_url: None,
        stock: create.stock,
        colors,
    }
}

#[tokio::test]
async fn product_round_trip_with_colors() {
    let pool = pool().await;
    let created = product::create(&pool, product_fixture(vec![color("Corail", 5), color("Noir", 2)]))
        .await
        .unwrap();

    assert_eq!(created.colors.len(), 2);

    let listed = product::find_all(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].product.name, "Rouge à lèvres");
    assert_eq!(listed[0].colors.len(), 2);
}

#[tokio::test]
async fn color_reconciliation_deletes_inserts_and_updates() {
    let pool = pool().await;
    let fixture = product_fixture(vec![color("Corail", 5), color("Noir", 2)]);
    let created = product::create(&pool, fixture.clone()).await.unwrap();

    let kept = &created.colors[0];

    // Keep "Corail" with a stock bump, drop "Noir", add "Nude"
    let submitted = vec![
        ColorInput {
            id: Some(kept.id),
            is_new: false,
            name: kept.name.clone(),
            name_ar: kept.name_ar.clone(),
            color_code: kept.color_code.clone(),
            stock: 9,
            image_url: None,
        },
        color("Nude", 4),
    ];

    let updated = product::update(&pool, created.product.id, update_from(&fixture, submitted))
        .await
        .unwrap();

    let names: Vec<&str> = updated.colors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Corail", "Nude"]);

    let corail = updated.colors.iter().find(|c| c.id == kept.id).unwrap();
    assert_eq!(corail.stock, 9);
}

#[tokio::test]
async fn missing_update_image_preserves_the_stored_one() {
    let pool = pool().await;
    let fixture = product_fixture(vec![]);
    let created = product::create(&pool, fixture.clone()).await.unwrap();

    let updated = product::update(&pool, created.product.id, update_from(&fixture, vec![]))
        .await
        .unwrap();
    assert_eq!(updated.product.image_url, "https://img.example/rouge.jpg");
}

#[tokio::test]
async fn negative_client_side_color_ids_are_inserts() {
    let pool = pool().await;
    let fixture = product_fixture(vec![]);
    let created = product::create(&pool, fixture.clone()).await.unwrap();

    // Dashboard sends temporary negative ids for rows added client-side
    let submitted = vec![ColorInput {
        id: Some(-3),
        is_new: false,
        name: "Prune".into(),
        name_ar: String::new(),
        color_code: "#551144".into(),
        stock: 1,
        image_url: None,
    }];

    let updated = product::update(&pool, created.product.id, update_from(&fixture, submitted))
        .await
        .unwrap();
    assert_eq!(updated.colors.len(), 1);
    assert_eq!(updated.colors[0].name, "Prune");
    assert!(updated.colors[0].id > 0);
}

#[tokio::test]
async fn deleting_a_product_cascades_to_colors() {
    let pool = pool().await;
    let created = product::create(&pool, product_fixture(vec![color("Corail", 5)]))
        .await
        .unwrap();

    assert!(product::delete(&pool, created.product.id).await.unwrap());

    let colors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_colors")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(colors, 0);
}

#[tokio::test]
async fn active_banner_listing_hides_inactive_ones() {
    let pool = pool().await;

    let shown = banner::create(
        &pool,
        BannerCreate {
            title: "Soldes d'été".into(),
            title_ar: "تخفيضات".into(),
            subtitle: "-30% sur le soin".into(),
            subtitle_ar: "وصف".into(),
            image_url: "https://img.example/summer.jpg".into(),
            is_active: true,
        },
    )
    .await
    .unwrap();

    let hidden = banner::create(
        &pool,
        BannerCreate {
            title: "Brouillon".into(),
            title_ar: String::new(),
            subtitle: String::new(),
            subtitle_ar: String::new(),
            image_url: "https://img.example/draft.jpg".into(),
            is_active: false,
        },
    )
    .await
    .unwrap();

    let active = banner::find_active(&pool).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, shown.id);

    // Toggling the hidden one on makes it appear, image preserved
    let toggled = banner::update(
        &pool,
        hidden.id,
        BannerUpdate {
            title: hidden.title.clone(),
            title_ar: hidden.title_ar.clone(),
            subtitle: hidden.subtitle.clone(),
            subtitle_ar: hidden.subtitle_ar.clone(),
            image_url: None,
            is_active: true,
        },
    )
    .await
    .unwrap();
    assert!(toggled.is_active);
    assert_eq!(toggled.image_url, "https://img.example/draft.jpg");
    assert_eq!(banner::find_active(&pool).await.unwrap().len(), 2);
}

#[tokio::test]
async fn admin_accounts_round_trip() {
    let pool = pool().await;
    assert_eq!(admin::count(&pool).await.unwrap(), 0);

    let hash = glow_server::auth::hash_password("s3cret").unwrap();
    let id = admin::create(&pool, "admin", &hash).await.unwrap();
    assert_eq!(admin::count(&pool).await.unwrap(), 1);

    let found = admin::find_by_username(&pool, "admin").await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert!(glow_server::auth::verify_password("s3cret", &found.password_hash));
    assert!(admin::find_by_username(&pool, "ghost").await.unwrap().is_none());
}
