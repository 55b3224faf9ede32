//! MyTube update gating.
//!
//! One remote check per launch: fetch the newest version descriptor,
//! compare it against the running version and the persisted first-seen
//! timestamp, and decide whether startup proceeds, prompts, or blocks.
//! Every failure along the way degrades to proceeding; the only way the
//! app stops is the gate's own blocking decision.

mod descriptor;
mod gate;
mod store;

pub use descriptor::{UpdateError, VersionDescriptor, VersionEndpoint};
pub use gate::{GateDecision, GateState, UpdateGate};
pub use store::{StateStore, UpdateState};

use std::time::SystemTime;

use tracing::{info, warn};

/// Run the launch-time update check: fetch, evaluate, persist. Network and
/// decoding failures are swallowed into [`GateDecision::Proceed`].
pub fn run_check(endpoint: &VersionEndpoint, gate: &UpdateGate, store: &StateStore) -> GateDecision {
    let fetched = match endpoint.fetch_latest() {
        Ok(row) => row,
        Err(err) => {
            warn!("update check failed, proceeding: {err}");
            None
        }
    };

    let mut state = store.load();
    let decision = gate.evaluate(fetched, &mut state, SystemTime::now());
    store.persist(&state);

    info!("update gate: {:?}", decision.state());
    decision
}
