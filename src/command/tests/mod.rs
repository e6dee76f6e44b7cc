//! Unit tests for command dispatch.

mod dispatcher_tests;
mod support;
mod template_tests;
