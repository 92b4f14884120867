pub mod admin;
pub mod detail;
pub mod draft;
pub mod envelope;
pub mod hierarchy;
pub mod kind;
pub mod loaders;
pub mod number_text;
pub mod question;

pub use detail::*;
pub use draft::DraftFile;
pub use envelope::{
    is_local_ref, Envelope, Media, MediaType, Meta, QuestionBody, RawEnvelope, Scoring,
    ENVELOPE_VERSION,
};
pub use hierarchy::{Grade, HierarchySnapshot, SubTopic, Subject, Topic};
pub use kind::{Operation, QuestionKind};
pub use loaders::{list_draft_files, load_draft, load_draft_images};
pub use number_text::NumberText;
pub use question::{QuestionFilter, QuestionRecord};
