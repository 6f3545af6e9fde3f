/// UI module
///
/// - `layout.rs` - sidebar, navbar and routing shell
/// - `gallery.rs` - dashboard with search and the image grid
/// - `upload.rs` - upload dialog and its background work
/// - `toast.rs` - notification stack
/// - `settings.rs` - read-only configuration page

pub mod gallery;
pub mod layout;
pub mod settings;
pub mod toast;
pub mod upload;
