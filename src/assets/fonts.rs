//! Font discovery: an explicit font file, or sans-serif faces from the system database.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::error::{CtaError, CtaResult};
use crate::scene::model::FontWeight;

/// Where fonts come from.
#[derive(Clone, Debug, Default)]
pub struct FontOptions {
    /// Use this font file for every weight.
    pub font_file: Option<PathBuf>,
    /// Search the system font database when no file is given.
    pub system_fonts: bool,
}

impl FontOptions {
    /// System fonts, no explicit file.
    pub fn system() -> Self {
        Self {
            font_file: None,
            system_fonts: true,
        }
    }

    /// A single explicit font file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            font_file: Some(path.into()),
            system_fonts: false,
        }
    }
}

/// Raw font face bytes plus identification.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Family name reported by the font.
    pub family: String,
    /// Weight reported by the font.
    pub weight: u16,
    /// Font file bytes (may be a collection).
    pub data: Arc<Vec<u8>>,
    /// Face index inside `data`.
    pub index: u32,
    /// xxh3 of `data`, used as a cache key.
    pub key: u64,
    /// File the face was loaded from, when known.
    pub path: Option<PathBuf>,
}

/// Faces for the three weights the overlay uses.
#[derive(Clone, Debug)]
pub struct FontBook {
    regular: FontFace,
    semibold: FontFace,
    bold: FontFace,
}

impl FontBook {
    /// Resolve fonts according to `opts`.
    ///
    /// Returns `Ok(None)` when system lookup finds no sans-serif face; an explicit file that
    /// cannot be read or parsed is an error.
    pub fn resolve(opts: &FontOptions) -> CtaResult<Option<Self>> {
        if let Some(path) = &opts.font_file {
            return Self::from_file(path).map(Some);
        }
        if !opts.system_fonts {
            return Ok(None);
        }
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Ok(Self::from_database(&db))
    }

    /// Use one font file for every weight.
    pub fn from_file(path: &Path) -> CtaResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            CtaError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        let mut db = fontdb::Database::new();
        db.load_font_data(bytes);
        let id = db.faces().next().map(|f| f.id).ok_or_else(|| {
            CtaError::validation(format!("'{}' contains no font faces", path.display()))
        })?;
        let mut face = face_from_db(&db, id).ok_or_else(|| {
            CtaError::validation(format!("failed to load font '{}'", path.display()))
        })?;
        face.path = Some(path.to_path_buf());
        Ok(Self {
            regular: face.clone(),
            semibold: face.clone(),
            bold: face,
        })
    }

    /// Pick sans-serif faces from a loaded database; `None` only when it holds no faces.
    ///
    /// Tries [`SANS_FAMILIES`] in order, then the database's generic sans-serif, then the
    /// family of any upright face.
    pub fn from_database(db: &fontdb::Database) -> Option<Self> {
        let mut families: Vec<fontdb::Family<'_>> =
            SANS_FAMILIES.iter().map(|&name| fontdb::Family::Name(name)).collect();
        families.push(fontdb::Family::SansSerif);
        if let Some(name) = any_family(db) {
            families.push(fontdb::Family::Name(name));
        }

        let pick = |weight: u16| {
            let query = fontdb::Query {
                families: &families,
                weight: fontdb::Weight(weight),
                stretch: fontdb::Stretch::Normal,
                style: fontdb::Style::Normal,
            };
            db.query(&query).and_then(|id| face_from_db(db, id))
        };
        let regular = pick(400)?;
        let bold = pick(700).unwrap_or_else(|| regular.clone());
        let semibold = pick(600).unwrap_or_else(|| bold.clone());
        Some(Self {
            regular,
            semibold,
            bold,
        })
    }

    /// Face for `weight`.
    pub fn face(&self, weight: FontWeight) -> &FontFace {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Semibold => &self.semibold,
            FontWeight::Bold => &self.bold,
        }
    }

    /// All faces with the weight they serve.
    pub fn faces(&self) -> [(FontWeight, &FontFace); 3] {
        [
            (FontWeight::Regular, &self.regular),
            (FontWeight::Semibold, &self.semibold),
            (FontWeight::Bold, &self.bold),
        ]
    }
}

/// Named sans-serif families tried before the generic fallback.
pub const SANS_FAMILIES: [&str; 6] = [
    "Segoe UI",
    "Roboto",
    "Helvetica",
    "Arial",
    "DejaVu Sans",
    "Liberation Sans",
];

fn any_family(db: &fontdb::Database) -> Option<&str> {
    let upright = db.faces().find(|f| f.style == fontdb::Style::Normal);
    upright
        .or_else(|| db.faces().next())
        .and_then(|f| f.families.first())
        .map(|(name, _)| name.as_str())
}

fn face_from_db(db: &fontdb::Database, id: fontdb::ID) -> Option<FontFace> {
    let info = db.face(id)?;
    let family = info
        .families
        .first()
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| info.post_script_name.clone());
    let path = match &info.source {
        fontdb::Source::File(p) => Some(p.clone()),
        fontdb::Source::SharedFile(p, _) => Some(p.clone()),
        fontdb::Source::Binary(_) => None,
    };
    let weight = info.weight.0;
    let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    let key = xxhash_rust::xxh3::xxh3_64(&data);
    tracing::debug!(%family, weight, ?path, "resolved font face");
    Some(FontFace {
        family,
        weight,
        data: Arc::new(data),
        index,
        key,
        path,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
