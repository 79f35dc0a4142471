use sqlx::SqlitePool;

pub(crate) async fn migrate_state(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS persons (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            photo TEXT,
            entry_created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            entry_created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS dreams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            dream_date TEXT,
            entry_created_at TEXT NOT NULL,
            ai_interpretation TEXT,
            generated_image_url TEXT
        )",
    )
    .execute(pool)
    .await?;

    // Pure membership, no attached metadata. Cascade both ways so deleting
    // a person or tag drops only the links, and deleting a dream cleans up
    // after itself.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS dream_persons (
            dream_id INTEGER NOT NULL REFERENCES dreams(id) ON DELETE CASCADE,
            person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
            PRIMARY KEY (dream_id, person_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS dream_tags (
            dream_id INTEGER NOT NULL REFERENCES dreams(id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (dream_id, tag_id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_dream_persons_person ON dream_persons(person_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_dream_tags_tag ON dream_tags(tag_id)")
        .execute(pool)
        .await?;

    Ok(())
}
