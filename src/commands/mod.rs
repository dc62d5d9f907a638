/// Each flow returns a result struct instead of printing its summary;
/// main.rs formats it as human-readable text or JSON based on --json.
mod fork_pr;
mod menu;
mod replace_file;
mod upload_dir;

pub use menu::*;
