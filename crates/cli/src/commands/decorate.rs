//! Offline page decoration.
//!
//! Decorates a saved HTML page with the storefront hooks, printing the
//! result. Useful for checking auto-blocking against authored content.
//!
//! ```bash
//! eecol-cli decorate page.html
//! eecol-cli decorate page.html --offline   # skip loading categories
//! ```

use std::path::Path;

use eecol_storefront::state::AppState;
use tracing::info;

/// Decorate the page in `file_path` and print it.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
#[allow(clippy::print_stdout)]
pub async fn decorate(
    state: &AppState,
    file_path: &str,
    offline: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    let html = tokio::fs::read_to_string(path).await?;
    info!(path = %file_path, bytes = html.len(), "Decorating page");

    let decorated = if offline {
        state.decorator().decorate_document(state.hooks(), &html)
    } else {
        state.decorator().decorate(state.hooks(), &html).await
    };

    println!("{decorated}");
    Ok(())
}
