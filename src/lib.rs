/*!
 * context_dump - serialize a directory tree into one Markdown file for LLM context
 *
 * Every selected file becomes a `// File: <path>` header followed by a fenced
 * block of its contents.
 */

pub mod app;

pub use app::error::DumpError;
pub use app::generate_context_dump;
pub use app::models::{Block, DumpConfig, DUMP_FILE_NAME};
