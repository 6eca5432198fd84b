use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    catalog::{ProductCatalog, ProductEvent},
    client::{FileUploader, ProductApi},
    form::{FormContext, FormController},
};

/// Open form instances by id.
#[derive(Debug, Default)]
pub struct FormSessions {
    forms: Mutex<HashMap<Uuid, Arc<FormController>>>,
}

impl FormSessions {
    pub fn insert(&self, form: FormController) -> Arc<FormController> {
        let form = Arc::new(form);
        self.forms.lock().insert(form.id(), form.clone());
        form
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<FormController>> {
        self.forms.lock().get(&id).cloned()
    }

    pub fn remove(&self, id: Uuid) -> Option<Arc<FormController>> {
        self.forms.lock().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.forms.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct AppState {
    pub ctx: FormContext,
    pub forms: Arc<FormSessions>,
    pub catalog: Arc<ProductCatalog>,
}

impl AppState {
    /// The returned receiver must be handed to [`ProductCatalog::run`].
    pub fn new(
        api: Arc<dyn ProductApi>,
        uploader: Arc<dyn FileUploader>,
        min_price: f64,
    ) -> (Self, mpsc::UnboundedReceiver<ProductEvent>) {
        let (catalog, rx) = ProductCatalog::new();
        let ctx = FormContext {
            api,
            uploader,
            events: catalog.sender(),
            min_price,
        };
        let state = Self {
            ctx,
            forms: Arc::new(FormSessions::default()),
            catalog,
        };
        (state, rx)
    }

    /// Builds the state and spawns the catalog task on the current runtime.
    pub fn spawn(
        api: Arc<dyn ProductApi>,
        uploader: Arc<dyn FileUploader>,
        min_price: f64,
    ) -> Self {
        let (state, rx) = Self::new(api, uploader, min_price);
        tokio::spawn(state.catalog.clone().run(rx));
        state
    }
}
