//! MyTube request filtering.
//!
//! Decides, for every URL the embedded view wants to touch, whether the
//! request is dropped (ad/tracking host), loaded inside the view (YouTube
//! and its sign-in flows), or handed to the system's default link handler
//! (everything else).

mod classifier;
pub mod hosts;

pub use classifier::{Classification, HostClassifier, RequestPolicy, HOST_CLASSIFIER};
