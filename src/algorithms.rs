//! The Huffman coding pipeline, leaves first: frequency analysis, tree construction, code
//! table generation, and bitstream packing. [`huffman`] ties them into a [`Compressor`].
//!
//! [`Compressor`]: crate::compressor::Compressor

pub mod bitstream;
pub mod code_table;
pub mod frequency;
pub mod huffman;
pub mod tree;
