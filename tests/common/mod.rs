use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Builds a throwaway module tree for integration tests.
pub struct ModuleBuilder {
    dir: TempDir,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp module"),
        }
    }

    pub fn file(self, path: &str, content: &str) -> Self {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(full, content).expect("write fixture file");
        self
    }

    pub fn manifest(self, content: &str) -> Self {
        self.file("__manifest__.py", content)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A module that satisfies every check when the accepted version is 14.0.
pub fn clean_module() -> ModuleBuilder {
    ModuleBuilder::new()
        .manifest(
            "{'name': 'Demo Module', 'version': '14.0.1.0.0', 'installable': True,\n \
             'images': ['images/main.png']}",
        )
        .file("README.rst", "Demo Module\n===========\n\nAll filled in.\n")
        .file("doc/index.rst", "Usage\n=====\n")
        .file("doc/changelog.rst", "1.0.0\n-----\n")
        .file("static/description/icon.png", "png")
        .file("static/description/index.html", "<html></html>")
        .file("images/main.png", "png")
        .file(
            "views/views.xml",
            r#"<odoo><data><record id="view_demo" model="ir.ui.view"/></data></odoo>"#,
        )
}
