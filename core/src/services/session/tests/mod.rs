//! Unit tests for the session service

mod mocks;
