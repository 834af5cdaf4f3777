use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Opens the SQLite database and ensures the reporting schema exists.
///
/// The reporting layer is read-only against this data; the bootstrap only
/// creates empty tables so a fresh checkout starts without manual setup.
pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/petals.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    for ddl in SCHEMA {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            ddl.to_string(),
        ))
        .await?;
    }
    tracing::info!("Database ready at {}", db_file);

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("database connection already initialized"))?;
    Ok(())
}

/// Global connection accessor. Panics when called before
/// [`initialize_database`]; that is a startup-ordering bug, not a runtime
/// condition.
pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("database connection not initialized")
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS branches (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id INTEGER PRIMARY KEY,
        code TEXT NOT NULL DEFAULT '',
        name TEXT NOT NULL,
        branch_id INTEGER NOT NULL,
        status INTEGER NOT NULL DEFAULT 1,
        can_enroll_loyalty INTEGER NOT NULL DEFAULT 0,
        is_enrolled_loyalty INTEGER NOT NULL DEFAULT 0
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY,
        company_id INTEGER,
        branch_id INTEGER NOT NULL,
        total REAL NOT NULL DEFAULT 0,
        invoice_date TEXT,
        order_status_id INTEGER NOT NULL DEFAULT 0,
        program_name TEXT
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS company_loyalty_points (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        points_earned INTEGER NOT NULL DEFAULT 0,
        points_redeemed INTEGER NOT NULL DEFAULT 0,
        point_status_id INTEGER NOT NULL,
        created_at TEXT
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS company_redeemed_points (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        points INTEGER NOT NULL DEFAULT 0,
        dollars REAL NOT NULL DEFAULT 0,
        created_at TEXT
    );
    "#,
    // Keyed lookup resolving the loyalty point-status buckets
    // (loyalty_available_status_id, loyalty_pending_status_id, ...).
    r#"
    CREATE TABLE IF NOT EXISTS settings (
        config_key TEXT PRIMARY KEY,
        config_value TEXT
    );
    "#,
];
