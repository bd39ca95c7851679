pub mod clock;
pub mod config;
pub mod constants;
pub mod events;
pub mod ids;
pub mod models;
pub mod responder;
pub mod stats;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoreConfig;
pub use events::StoreChange;
pub use responder::{send_message, ChatError, ChatExchange, MockResponder};
pub use stats::UsageStats;
pub use store::{
    AppState, AppStore, ExportError, JsonFileStorage, MemoryStorage, PersistedState, Storage,
    StorageError,
};
