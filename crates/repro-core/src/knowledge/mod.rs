//! Static tables the engine reads from: topic entries, phrase pools and the software catalog.
//!
//! | Table             | Used for                                        |
//! |-------------------|-------------------------------------------------|
//! | `KnowledgeBase`   | topic keywords and main-content responses       |
//! | `PhraseBook`      | greeting, acknowledgment, teaching, encouragement, closing and clarification phrases |
//! | `SoftwareCatalog` | software mention detection and per-package tips |
//!
//! All three are validated once at construction and never mutated afterwards.

mod phrases;
mod software;
mod store;

pub use phrases::{PhraseBook, PhraseCategory, PhrasePool};
pub use software::{SoftwareCatalog, SoftwareProfile};
pub use store::{KnowledgeBase, KnowledgeEntry, TopicId};
