//! Relocalization strategies.
//!
//! When the search loses track it asks a [`Relocalizer`](crate::oracle::Relocalizer)
//! for reference images that plausibly match the next query image.
//! [`DimensionsHashing`] answers from an inverted index over binary feature
//! dimensions.

mod dimensions_hashing;

pub use dimensions_hashing::DimensionsHashing;
