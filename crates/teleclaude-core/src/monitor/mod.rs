//! Status polling: keep the latest snapshot fresh while a view is mounted.

mod poller;

pub use poller::{
    PollHandle, PollState, PollStateReceiver, StatusPoller, DEFAULT_POLL_INTERVAL,
};
