use super::{open_store, CommandHandler};
use crate::config::ResolvedConfig;
use crate::render::render_page;
use crate::Result;
use std::fs;
use std::path::PathBuf;

/// Handler for the `render` command
pub struct RenderCommand {
    pub resolved: ResolvedConfig,
    pub output: Option<PathBuf>,
    pub title: String,
}

impl CommandHandler for RenderCommand {
    fn execute(&self) -> Result<()> {
        let store = open_store(&self.resolved)?;
        let page = render_page(store.schema(), store.list(), &self.title);

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, page)?;
                println!(
                    "Rendered {} items to {}.",
                    store.len(),
                    path.display()
                );
            }
            None => print!("{}", page),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "render"
    }
}

impl RenderCommand {
    /// Create new render command
    pub fn new(resolved: ResolvedConfig, output: Option<PathBuf>, title: String) -> Self {
        Self {
            resolved,
            output,
            title,
        }
    }
}
