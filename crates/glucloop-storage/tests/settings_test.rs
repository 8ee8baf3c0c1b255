use glucloop_storage::{init_settings_db, SettingsRepository};

#[tokio::test]
async fn settings_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("settings.sqlite3");
    let db_path = format!("sqlite://{}", db_path.display());

    {
        let pool = init_settings_db(&db_path).await.unwrap();
        let repo = SettingsRepository::new(pool);
        assert!(!repo.dosing_enabled().await.unwrap());
        repo.set_dosing_enabled(true).await.unwrap();
    }

    let pool = init_settings_db(&db_path).await.unwrap();
    let repo = SettingsRepository::new(pool);
    assert!(repo.dosing_enabled().await.unwrap());
}
