// Engine module - Tone engine capability, transport clock and the offline recorder

pub mod clock;
pub mod offline;
pub mod trait_def;

pub use clock::{TempoCurve, TransportClock};
pub use offline::{EngineEvent, EngineEventKind, OfflineEngine};
pub use trait_def::{EngineError, RepeatHandle, ToneEngine};
