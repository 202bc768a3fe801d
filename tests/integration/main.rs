//! Integration test harness.

mod helpers;

mod health_test;
mod scenario_test;
mod session_test;
