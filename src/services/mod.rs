//! 业务能力层
//!
//! 每个模块只描述"我能做什么"，不关心调用顺序

pub mod draft_store;
pub mod hierarchy;
pub mod image_upload;
pub mod local_images;

pub use draft_store::{Draft, DraftStore};
pub use hierarchy::{HierarchySelection, HierarchyService, HierarchySource};
pub use image_upload::{collect_local_refs, process_envelope_images, replace_local_refs, ImageUploader};
pub use local_images::{validate_image_file, ImageFile, LocalImageStore};
