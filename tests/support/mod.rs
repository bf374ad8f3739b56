//! Shared setup for the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;

use studiodesk::adapter::inbound::http::{router, AppState};
use studiodesk::adapter::outbound::identity::LocalIdentity;
use studiodesk::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteStore};
use studiodesk::application::{AttendancePolicy, Clock, Services};
use studiodesk::domain::{Business, Role, User, UserId};
use studiodesk::port::outbound::store::{BusinessStore, UserStore};

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Friday 2026-05-01 12:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

/// A migrated database file in a temp directory.
pub struct TempDb {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("studiodesk.db");
        Self { dir, path }
    }

    pub fn url(&self) -> String {
        self.path.display().to_string()
    }

    /// Write a config file pointing at this database.
    pub fn config(&self, extra: &str) -> PathBuf {
        let config = self.dir.path().join("config.toml");
        let body = format!("database = {:?}\n{extra}", self.url());
        std::fs::write(&config, body).expect("write config");
        config
    }
}

/// The HTTP API over a fresh database with one seeded studio.
pub struct TestApp {
    pub db: TempDb,
    pub store: SqliteStore,
    pub identity: Arc<LocalIdentity>,
    pub server: TestServer,
    pub business: Business,
    pub instructor: User,
}

impl TestApp {
    pub async fn new(admin_token: Option<&str>) -> Self {
        let db = TempDb::new();
        let pool = create_pool(&db.url()).expect("create pool");
        run_migrations(&pool).expect("migrate");
        let store = SqliteStore::new(pool);
        let identity = Arc::new(LocalIdentity::new());
        let services = Services::new(
            Arc::new(store.clone()),
            identity.clone(),
            Clock::fixed(now()),
            AttendancePolicy::default(),
        );

        let business = Business::new("Prisma Dance", now()).expect("business");
        store.insert_business(&business).await.expect("insert business");
        let instructor = staff(&store, &business, "teach@prisma.test").await;

        let state = AppState::new(services, admin_token.map(str::to_string));
        let server = TestServer::new(router(state, false)).expect("test server");
        Self {
            db,
            store,
            identity,
            server,
            business,
            instructor,
        }
    }

    /// Path under this studio's tenant prefix.
    pub fn path(&self, rest: &str) -> String {
        format!("/api/businesses/{}{rest}", self.business.id)
    }
}

/// Insert an instructor straight into the store.
pub async fn staff(store: &SqliteStore, business: &Business, email: &str) -> User {
    let user = User {
        id: UserId::new(),
        email: email.to_string(),
        business_id: business.id.clone(),
        role: Role::Instructor,
        first_name: "Marisol".into(),
        last_name: "Vega".into(),
        phone: None,
        created_at: now(),
        updated_at: now(),
    };
    store.insert_user(&user).await.expect("insert staff");
    user
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id field").to_string()
}
