//! Test helpers: build AppState and router for integration tests.
//!
//! The router is wired with the in-memory metadata store and, for the object-store
//! backend, the in-memory object client, so no database or network is needed.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use filestore_api::setup::routes;
use filestore_api::AppState;
use filestore_core::{Config, FileServiceConfig, StorageType};
use filestore_db::InMemoryFileRecordRepository;
use filestore_storage::{
    DbStorage, FileStorage, FsStorage, GedStorage, InMemoryObjectClient, StorageFacade,
};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

/// Bucket used by the object-store backend in tests.
pub const TEST_BUCKET: &str = "documents";

/// Max upload size used by tests, small enough to exceed cheaply.
pub const TEST_MAX_FILE_SIZE: usize = 64;

/// Test application: server plus the in-memory collaborators behind it.
pub struct TestApp {
    pub server: TestServer,
    pub repository: InMemoryFileRecordRepository,
    pub objects: InMemoryObjectClient,
    pub upload_dir: std::path::PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(storage_type: StorageType, upload_dir: &str, environment: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("ENVIRONMENT", environment.to_string()),
        ("DATABASE_URL", "postgres://localhost/filestore_test".to_string()),
        ("FILE_STORAGE_TYPE", storage_type.to_string()),
        ("FILE_FS_UPLOAD_DIR", upload_dir.to_string()),
        ("FILE_GED_URL", "http://localhost:9000".to_string()),
        ("FILE_GED_USERNAME", "minio".to_string()),
        ("FILE_GED_PASSWORD", "minio123".to_string()),
        ("FILE_GED_BUCKET", TEST_BUCKET.to_string()),
        ("FILE_ALLOWED_EXTENSIONS", "pdf,png,jpg,jpeg,txt,docx".to_string()),
        ("FILE_MAX_SIZE", TEST_MAX_FILE_SIZE.to_string()),
    ]);

    let config = FileServiceConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("test configuration should load");
    Config(Box::new(config))
}

/// Setup a development test app backed by the given storage type.
pub async fn setup_test_app(storage_type: StorageType) -> TestApp {
    setup_test_app_in(storage_type, "development").await
}

/// Setup a test app for a given deployment environment.
pub async fn setup_test_app_in(storage_type: StorageType, environment: &str) -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir");
    let upload_dir = temp_dir.path().join("uploads");
    let config = test_config(
        storage_type,
        upload_dir.to_str().expect("utf-8 temp path"),
        environment,
    );

    let repository = InMemoryFileRecordRepository::new();
    let objects = InMemoryObjectClient::new();

    let backend: Arc<dyn FileStorage> = match storage_type {
        StorageType::Fs => Arc::new(
            FsStorage::new(upload_dir.clone(), Arc::new(repository.clone()))
                .await
                .expect("fs storage"),
        ),
        StorageType::Db => Arc::new(DbStorage::new(Arc::new(repository.clone()))),
        StorageType::Ged => Arc::new(GedStorage::new(
            Arc::new(objects.clone()),
            TEST_BUCKET,
            Arc::new(repository.clone()),
        )),
    };

    let state = Arc::new(AppState::new(config.clone(), StorageFacade::new(backend)));
    let router = routes::setup_routes(&config, state);

    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        repository,
        objects,
        upload_dir,
        _temp_dir: temp_dir,
    }
}

/// Multipart form with a single `file` part.
pub fn file_form(filename: &str, content_type: &str, data: &[u8]) -> MultipartForm {
    let part = Part::bytes(data.to_vec())
        .file_name(filename.to_string())
        .mime_type(content_type.to_string());
    MultipartForm::new().add_part("file", part)
}
