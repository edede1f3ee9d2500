// Integration tests for the undine crate
// Each test module should be publicly declared here

mod analyzer_tests;
mod specificity_tests;
