#[cfg(test)]
pub mod test_utils {
    use std::time::Duration;

    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use model::entities::{city, employee, expense_type};
    use moka::future::Cache;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// IDs of the rows created by [`seed_lookups`].
    #[derive(Debug, Clone, Copy)]
    pub struct Seeded {
        pub omsk: i32,
        pub chita: i32,
        pub employee: i32,
        pub delivery: i32,
        pub rent: i32,
    }

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Two cities, one employee and two expense types.
    pub async fn seed_lookups(db: &DatabaseConnection) -> Seeded {
        let mut city_ids = Vec::new();
        for name in ["Omsk", "Chita"] {
            let model = city::ActiveModel {
                name: Set(name.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await
            .expect("Failed to create test city");
            city_ids.push(model.id);
        }

        let employee = employee::ActiveModel {
            name: Set("Anna".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test employee");

        let mut type_ids = Vec::new();
        for name in ["Delivery", "Rent"] {
            let model = expense_type::ActiveModel {
                name: Set(name.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await
            .expect("Failed to create test expense type");
            type_ids.push(model.id);
        }

        Seeded {
            omsk: city_ids[0],
            chita: city_ids[1],
            employee: employee.id,
            delivery: type_ids[0],
            rent: type_ids[1],
        }
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        let cache = Cache::new(100);

        AppState::new(db, cache)
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level comes from RUST_LOG and defaults to WARN.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing, with the lookup tables seeded.
    pub async fn setup_test_app() -> (Router, Seeded) {
        let _guard = init_test_tracing();

        let state = setup_test_app_state().await;
        let seeded = seed_lookups(&state.db).await;
        (create_router(state, Duration::from_secs(30)), seeded)
    }
}
