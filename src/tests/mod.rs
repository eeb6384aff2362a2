//! Fixture payloads for unit tests and doctests
