//! Filesystem tools for file operations

mod copy;
mod create_dir;
mod delete;
mod edit;
mod file_info;
mod list;
mod move_file;
mod path_utils;
mod read;
mod rename;
mod replace;
mod search;
mod write;

// Re-export tools
pub use copy::CopyFile;
pub use create_dir::CreateDirectory;
pub use delete::DeleteFile;
pub use edit::{replace_line_range, EditFile};
pub use file_info::FileInfo;
pub use list::ListFiles;
pub use move_file::MoveFile;
pub use read::ReadFile;
pub use rename::RenameFile;
pub use replace::ReplaceText;
pub use search::{Search, DEFAULT_MAX_RESULTS};
pub use write::WriteFile;

// Re-export path utilities for use by other modules
pub use path_utils::{ensure_parent, normalize_path, path_to_display, relative_display, resolve_path};
