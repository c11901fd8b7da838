//! Application state shared by all handlers.

use crate::validation::FileValidator;
use filestore_core::Config;
use filestore_storage::StorageFacade;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: StorageFacade,
    pub validator: FileValidator,
}

impl AppState {
    pub fn new(config: Config, storage: StorageFacade) -> Self {
        let validator = FileValidator::from_config(&config);
        Self {
            config,
            storage,
            validator,
        }
    }
}
