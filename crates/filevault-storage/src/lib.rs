//! # filevault-storage
//!
//! Blob storage for FileVault. [`ContentStore`] generates collision-free
//! keys and hands bytes to a [`filevault_core::traits::StorageProvider`];
//! [`providers::LocalStorageProvider`] keeps them under a single root
//! directory.

pub mod content;
pub mod naming;
pub mod providers;

pub use content::ContentStore;
pub use providers::LocalStorageProvider;
