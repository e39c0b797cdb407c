//! Asset kind definitions.
//!
//! The extension table lives here and only here: adding a preprocessor is
//! one new variant plus its arms in [`AssetKind::from_ext`] and
//! [`AssetKind::compiled`].

use std::path::Path;

/// Kind of file found in the asset tree, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// `.js`
    Script,
    /// `.css`
    Stylesheet,
    /// `.coffee`
    CoffeeScript,
    /// `.scss`
    Scss,
    /// `.sass` (indented syntax)
    Sass,
    /// Anything else. Copied, never touched.
    Other,
}

/// What the bundler does with a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handling {
    /// Rewrite in place when the file carries directives.
    Bundle,
    /// Compile into a sibling file with the compiled extension.
    Compile(CompiledKind),
    Ignore,
}

/// The two kinds that survive bundling and get minified/fingerprinted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompiledKind {
    Script,
    Stylesheet,
}

impl AssetKind {
    pub fn from_ext(ext: &str) -> Self {
        match ext {
            "js" => Self::Script,
            "css" => Self::Stylesheet,
            "coffee" => Self::CoffeeScript,
            "scss" => Self::Scss,
            "sass" => Self::Sass,
            _ => Self::Other,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Other, Self::from_ext)
    }

    pub const fn handling(self) -> Handling {
        match self.compiled() {
            Some(target) if self.is_preprocessed() => Handling::Compile(target),
            Some(_) => Handling::Bundle,
            None => Handling::Ignore,
        }
    }

    /// Compiled kind this asset ends up as, if any.
    pub const fn compiled(self) -> Option<CompiledKind> {
        match self {
            Self::Script | Self::CoffeeScript => Some(CompiledKind::Script),
            Self::Stylesheet | Self::Scss | Self::Sass => Some(CompiledKind::Stylesheet),
            Self::Other => None,
        }
    }

    pub const fn is_preprocessed(self) -> bool {
        matches!(self, Self::CoffeeScript | Self::Scss | Self::Sass)
    }

    /// Line comment that introduces a directive (`//= require x`).
    pub const fn directive_comment(self) -> &'static str {
        match self {
            Self::CoffeeScript => "#",
            _ => "//",
        }
    }
}

impl CompiledKind {
    pub const ALL: [Self; 2] = [Self::Script, Self::Stylesheet];

    pub const fn ext(self) -> &'static str {
        match self {
            Self::Script => "js",
            Self::Stylesheet => "css",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        match AssetKind::from_path(path) {
            AssetKind::Script => Some(Self::Script),
            AssetKind::Stylesheet => Some(Self::Stylesheet),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ext() {
        assert_eq!(AssetKind::from_ext("js"), AssetKind::Script);
        assert_eq!(AssetKind::from_ext("css"), AssetKind::Stylesheet);
        assert_eq!(AssetKind::from_ext("coffee"), AssetKind::CoffeeScript);
        assert_eq!(AssetKind::from_ext("scss"), AssetKind::Scss);
        assert_eq!(AssetKind::from_ext("sass"), AssetKind::Sass);
        assert_eq!(AssetKind::from_ext("png"), AssetKind::Other);
        assert_eq!(AssetKind::from_path(Path::new("img/logo")), AssetKind::Other);
    }

    #[test]
    fn test_handling() {
        assert_eq!(AssetKind::Script.handling(), Handling::Bundle);
        assert_eq!(AssetKind::Stylesheet.handling(), Handling::Bundle);
        assert_eq!(
            AssetKind::Scss.handling(),
            Handling::Compile(CompiledKind::Stylesheet)
        );
        assert_eq!(
            AssetKind::Sass.handling(),
            Handling::Compile(CompiledKind::Stylesheet)
        );
        assert_eq!(
            AssetKind::CoffeeScript.handling(),
            Handling::Compile(CompiledKind::Script)
        );
        assert_eq!(AssetKind::Other.handling(), Handling::Ignore);
    }

    #[test]
    fn test_compiled_kind_from_path() {
        assert_eq!(
            CompiledKind::from_path(Path::new("a/app.js")),
            Some(CompiledKind::Script)
        );
        assert_eq!(
            CompiledKind::from_path(Path::new("a/app.min.css")),
            Some(CompiledKind::Stylesheet)
        );
        assert_eq!(CompiledKind::from_path(Path::new("a/app.scss")), None);
    }
}
