pub mod json_file_repo;
pub mod place_store;
