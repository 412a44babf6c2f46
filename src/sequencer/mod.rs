// Sequencer module - Cursors, tone mapping, transport scheduling and track control

pub mod cursor;
pub mod scheduler;
pub mod session;
pub mod timeline;
pub mod tone_map;
pub mod track;

pub use cursor::PlaybackCursor;
pub use scheduler::{TickReport, TransportScheduler, TransportState};
pub use session::{Session, SessionContext, UiChannels};
pub use timeline::{NoteValue, Tempo, TickTime};
pub use tone_map::{Pitch, ToneMapper};
pub use track::{LoadOutcome, LoadSource, TrackController, TrackId};
