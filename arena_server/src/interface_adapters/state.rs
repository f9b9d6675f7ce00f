use crate::use_cases::ServerHandle;

#[derive(Clone)]
pub struct AppState {
    // Queues into the server loop and its published counters.
    pub server: ServerHandle,
}
