//! Configuration detection by scoring candidate configurations.
//!
//! Detection narrows the space before expanding it: encodings are chosen
//! from byte-order marks and decode checks, separators from character
//! counts in a short text prefix, and only then is the product with quote
//! and escape characters and the header flag generated and scored against
//! the first rows of the input.

pub mod candidates;
pub mod decimal;
pub mod header;
pub mod patterns;
pub mod score;
