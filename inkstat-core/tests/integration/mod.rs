mod collector_tests;
mod cycle_tests;
mod fakes;
