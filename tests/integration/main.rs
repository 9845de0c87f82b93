//! HTTP-level integration tests against an in-memory metadata store.

mod file_test;
mod helpers;
