pub mod matching;
pub mod results;
pub mod statistics;

pub use crate::domain::model::{DrawRecord, NumberSet, TicketMatchResult};
pub use crate::domain::ports::{CollectionQuery, Direction, DocumentStore};
pub use crate::utils::error::Result;
