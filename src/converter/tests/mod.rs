//! Integration-style tests for the conversion engine, organized by concern.
