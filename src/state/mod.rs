use crate::blog::SessionID;
use crate::store::PostStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod session;

pub type SharedState = axum::extract::State<Arc<State>>;
pub type NestedRouter = axum::Router<Arc<State>>;

#[derive(Debug)]
pub struct State {
    pub sessions: RwLock<HashMap<SessionID, session::Session>>,
    pub posts: Arc<dyn PostStore>,
    pub session_ttl: std::time::Duration,
}

impl State {
    pub fn new(posts: Arc<dyn PostStore>, session_ttl: std::time::Duration) -> State {
        State {
            sessions: RwLock::new(HashMap::new()),
            posts,
            session_ttl,
        }
    }
}
