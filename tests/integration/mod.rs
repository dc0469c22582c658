//! End-to-end tests over the file-backed store.

mod helpers;
mod lifecycle;
mod persistence;
