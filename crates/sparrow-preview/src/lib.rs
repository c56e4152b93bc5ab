#![doc = include_str!("../README.md")]

pub mod error;
pub mod sandbox;

pub use error::{PreviewError, Result};
pub use sandbox::{
    DEFINE_URL, EmbedOptions, Preview, anchor_url, embed_url, open_url, sandbox_parameters,
};
