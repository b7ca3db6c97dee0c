//! Integration tests for the cadabra binary.
//!
//! These tests write small tumor/normal BAM pairs and run the `cadabra` executable on
//! them, checking the calls, metrics and exit status.

mod helpers;
mod test_error_paths;
mod test_somatic_command;
