pub mod file_size;
