// Snipsight state managers
// Managers hold the stateful pieces: the activation guard, the selection
// state machine, and the session that wires them to the pipelines.

pub mod activation_guard;
pub mod selection_session;
pub mod selection_tracker;
