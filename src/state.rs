use crate::controller::DashboardController;
use crate::models::Notice;
use crate::store::SharedStore;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type Dashboard = DashboardController<SharedStore>;

/// Handlers take the dashboard lock for their whole run, so actions apply
/// one at a time in arrival order.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard>>,
    pub notice: Arc<Mutex<Option<Notice>>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            notice: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn set_notice(&self, notice: Notice) {
        *self.notice.lock().await = Some(notice);
    }

    pub async fn take_notice(&self) -> Option<Notice> {
        self.notice.lock().await.take()
    }
}
