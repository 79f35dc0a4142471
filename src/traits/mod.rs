mod interpreter;
mod records;
mod store;

pub use interpreter::{DreamInterpreter, Suggestions};
pub use records::{Dream, DreamPatch, Person, PersonDreamCount, PersonPatch, Tag, TagPatch};
pub use store::{DreamStore, PersonStore, TagStore};
