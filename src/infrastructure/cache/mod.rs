pub mod path_cache;
