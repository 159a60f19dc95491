//! WeedWise Intake
//!
//! Accepts user-supplied image files and turns them into displayable
//! previews:
//! - [`validate`] enforces the type/size [`IntakePolicy`]
//! - [`encode`] reads an [`Accepted`] file into an [`ImageReference`]
//!
//! Files reach this crate through the [`ImageFile`] trait, so a file
//! picker, a drag-and-drop payload or a path on disk all look the same.
//!
//! # Example
//!
//! ```rust,ignore
//! use weedwise_intake::{encode, validate, IntakePolicy, MemoryFile};
//!
//! let file = MemoryFile::new("field.png", "image/png", png_bytes);
//! let accepted = validate(file, &IntakePolicy::default())?;
//! let preview = encode(&accepted, &IntakePolicy::default()).await?;
//! ```
//!
//! [`ImageReference`]: weedwise_model::ImageReference

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod encoder;
pub mod error;
pub mod file;
pub mod validator;

pub use encoder::encode;
pub use error::IntakeError;
pub use file::{media_type_for_path, DiskFile, ImageFile, MemoryFile};
pub use validator::{is_image_media_type, validate, Accepted, IntakePolicy, DEFAULT_MAX_UPLOAD_BYTES};
