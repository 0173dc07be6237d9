mod search_tests;
pub mod utils;
