use std::sync::Arc;
use veil_core::ObjectStore;
use veil_uploader::{CreateService, CreateSettings, DeletionService};
use veil_viewer::{RawRetrievalService, RenderService, RenderSettings};

pub type SharedStore = Arc<dyn ObjectStore>;

#[derive(Clone)]
pub struct AppState {
    pub create: CreateService<dyn ObjectStore>,
    pub deletion: DeletionService<dyn ObjectStore>,
    pub raw: RawRetrievalService<dyn ObjectStore>,
    pub render: RenderService<dyn ObjectStore>,
}

impl AppState {
    /// Wires every service to the same store.
    pub fn new(store: SharedStore, create: CreateSettings, render: RenderSettings) -> Self {
        Self {
            create: CreateService::new(Arc::clone(&store), create),
            deletion: DeletionService::new(Arc::clone(&store)),
            raw: RawRetrievalService::new(Arc::clone(&store)),
            render: RenderService::new(store, render),
        }
    }
}
