//! File processors built on the translation driver

pub mod text;
