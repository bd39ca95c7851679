pub mod app_store;
pub mod export;
pub mod snapshot;
pub mod state;
pub mod storage;

pub use app_store::AppStore;
pub use export::{backup_file_name, write_backup, write_project, BackupExport, ExportError};
pub use snapshot::PersistedState;
pub use state::AppState;
pub use storage::{JsonFileStorage, MemoryStorage, Storage, StorageError};
