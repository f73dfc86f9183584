mod action_tests;
mod saved_search_tests;
mod search_page_tests;
