mod loader_tests;
mod lower_tests;
mod validation_tests;
