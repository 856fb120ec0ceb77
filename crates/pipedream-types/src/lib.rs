//! Wire types shared between Pipedream step code and the host runtime.
//!
//! Everything here serializes to the exact JSON shapes the host consumes:
//! observations harvested after a step invocation, configurable-prop
//! descriptions rendered by the UI, and serialized exceptions fed into
//! error reporting.

pub mod exception;
pub mod observation;
pub mod prop;

pub use exception::SerializedException;
pub use observation::{Observation, ObservationKind};
pub use prop::{ConfigurableProp, PropType, TimerSchedule};
