pub mod toml_loader;

pub use toml_loader::{list_draft_files, load_draft, load_draft_images};
