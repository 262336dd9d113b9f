//! Most frequent nouns of a large tagged corpus
//!
//! The pieces here are used by the included binaries: documents are cut out of Wikipedia
//! extractor shards (`docs`), run through a morphological analyzer (`analyzer`, `mecab`) and their
//! nouns counted corpus-wide (`freq`), one shard after another (`corpus`).


#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;
extern crate farmhash;
extern crate glob;
extern crate rayon;
extern crate regex;
#[cfg(test)] extern crate tempfile;
pub mod errors;
pub mod farm;
pub mod docs;
pub mod analyzer;
pub mod mecab;
pub mod freq;
pub mod corpus;
