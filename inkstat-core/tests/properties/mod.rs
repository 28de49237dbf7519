mod cache_tests;
mod grid_tests;
mod summary_tests;
