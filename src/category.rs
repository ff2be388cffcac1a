//! Extension-based file categorization.
//!
//! Every placed file lands in one of six fixed buckets. The bucket is picked
//! from the file extension alone; anything the table does not know goes to
//! [`Category::Other`].
//!
//! # Examples
//!
//! ```
//! use projorg::category::{Category, classify};
//!
//! assert_eq!(classify("png"), Category::Images);
//! assert_eq!(classify(".PSD"), Category::AdobeProjects);
//! assert_eq!(classify("xyz"), Category::Other);
//! ```
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// One of the six placement buckets of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Category {
    /// Office documents and plain text
    Documents,
    /// Raster images
    Images,
    /// Virtual machine disk images
    Vmdk,
    /// Photoshop, Illustrator, InDesign, Premiere and After Effects projects
    AdobeProjects,
    /// User-managed folder, never chosen by extension
    CustomFolders,
    /// Everything else
    Other,
}

impl Category {
    /// All categories, in folder order.
    pub const ALL: [Category; 6] = [
        Category::Documents,
        Category::Images,
        Category::Vmdk,
        Category::AdobeProjects,
        Category::CustomFolders,
        Category::Other,
    ];

    /// Returns the subfolder name for this category.
    ///
    /// These names are the on-disk layout of every project directory.
    ///
    /// ```
    /// use projorg::category::Category;
    ///
    /// assert_eq!(Category::Vmdk.dir_name(), "VMDK");
    /// assert_eq!(Category::AdobeProjects.dir_name(), "Adobe Projects");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Documents => "Documents",
            Category::Images => "Images",
            Category::Vmdk => "VMDK",
            Category::AdobeProjects => "Adobe Projects",
            Category::CustomFolders => "Custom Folders",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Maps file extensions to categories.
#[derive(Debug, Clone)]
pub struct ExtensionMapper {
    extension_map: HashMap<&'static str, Category>,
}

impl ExtensionMapper {
    /// Creates a mapper holding the standard extension table.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        mapper.populate_standard_mappings();
        mapper
    }

    fn populate_standard_mappings(&mut self) {
        // Documents
        self.add("doc", Category::Documents);
        self.add("docx", Category::Documents);
        self.add("pdf", Category::Documents);
        self.add("txt", Category::Documents);
        self.add("rtf", Category::Documents);

        // Images
        self.add("jpg", Category::Images);
        self.add("jpeg", Category::Images);
        self.add("png", Category::Images);
        self.add("gif", Category::Images);
        self.add("bmp", Category::Images);
        self.add("tiff", Category::Images);

        // Virtual disks
        self.add("vmdk", Category::Vmdk);
        self.add("vdi", Category::Vmdk);
        self.add("vhd", Category::Vmdk);
        self.add("vhdx", Category::Vmdk);

        // Adobe
        self.add("psd", Category::AdobeProjects);
        self.add("ai", Category::AdobeProjects);
        self.add("indd", Category::AdobeProjects);
        self.add("prproj", Category::AdobeProjects);
        self.add("aep", Category::AdobeProjects);
    }

    fn add(&mut self, ext: &'static str, category: Category) {
        self.extension_map.insert(ext, category);
    }

    /// Maps an extension to its category, [`Category::Other`] when unknown.
    ///
    /// Case-insensitive; leading dots are ignored.
    pub fn classify(&self, extension: &str) -> Category {
        let normalized = extension.trim_start_matches('.').to_lowercase();
        self.extension_map
            .get(normalized.as_str())
            .copied()
            .unwrap_or(Category::Other)
    }

    /// Returns the known extensions of one category, sorted.
    pub fn extensions_for(&self, category: Category) -> Vec<&'static str> {
        let mut extensions: Vec<_> = self
            .extension_map
            .iter()
            .filter(|(_, c)| **c == category)
            .map(|(ext, _)| *ext)
            .collect();
        extensions.sort_unstable();
        extensions
    }
}

impl Default for ExtensionMapper {
    fn default() -> Self {
        Self::new()
    }
}

static STANDARD_MAPPER: LazyLock<ExtensionMapper> = LazyLock::new(ExtensionMapper::new);

/// Classifies an extension against the standard table.
pub fn classify(extension: &str) -> Category {
    STANDARD_MAPPER.classify(extension)
}

/// The shared standard mapper.
pub fn standard_mapper() -> &'static ExtensionMapper {
    &STANDARD_MAPPER
}
