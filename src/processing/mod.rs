//! The batch engine: filtering, the codec and trash boundaries, and the two jobs.

pub mod codec;
pub mod convert;
pub mod delete;
pub mod filter;
pub mod job;
pub mod remover;

pub use codec::{ImageCodec, WebpCodec, flatten};
pub use convert::ConversionJob;
pub use delete::DeletionJob;
pub use filter::{FilterSpec, FilterSummary, count_matching, filter};
pub use job::{EventReceiver, EventSender, event_channel};
pub use remover::{FileRemover, SystemRemover};
