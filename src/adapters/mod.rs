// Adapters layer: concrete implementations for external systems.

pub mod connection;
pub mod firestore;
