//! Metadata-driven transcoding of object graphs into plain data and back.
//!
//! - [`object`]: the dynamic object model, classes and values.
//! - [`transcode`]: the metadata registry, the transformer pipeline and
//!   the [`Serializer`](transcode::Serializer) facade.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_object as object;
pub use vc_transcode as transcode;
