//! Access control: who may see the dashboard.
//!
//! The [`AccessGate`] is a pure predicate over an [`Identity`] asserted by
//! the identity provider. Sessions and OAuth state nonces live in memory.

mod allow_list;
mod gate;
mod identity;
mod session;

pub use allow_list::AllowList;
pub use gate::AccessGate;
pub use identity::Identity;
pub use session::{
    LoginStates, Session, SessionStore, LOGIN_STATE_TTL_MINUTES, MAX_PENDING_LOGIN_STATES,
};
