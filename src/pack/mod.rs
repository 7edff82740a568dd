use serde::Serialize;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;

use crate::remote::{Fetch, FetchError, TextureFileEntry};

/// Resource pack format written into `pack.mcmeta`
pub const PACK_FORMAT: u32 = 14;

pub const MCMETA_PATH: &str = "pack.mcmeta";
pub const ICON_PATH: &str = "pack.png";
/// Where the game looks up the options menu background
pub const GUI_BACKGROUND_PATH: &str = "assets/minecraft/textures/gui/options_background.png";

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Texture {0} is not in the catalog")]
    NotFound(String),

    #[error("Could not download texture: {0}")]
    Fetch(#[from] FetchError),

    #[error("Could not encode pack metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Could not write archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct PackMcmeta<'a> {
    pack: PackSection<'a>,
}

#[derive(Debug, Serialize)]
struct PackSection<'a> {
    description: &'a str,
    pack_format: u32,
}

/// The three files of a pack, held in memory until zipped
#[derive(Debug, Clone)]
pub struct GeneratedPackFiles {
    pub mcmeta: Vec<u8>,
    pub icon: Vec<u8>,
    pub background: Vec<u8>,
}

impl GeneratedPackFiles {
    pub fn new(display_name: &str, image: Vec<u8>) -> Result<Self, PackError> {
        let description = format!("Options background: {display_name}");
        let mcmeta = serde_json::to_vec_pretty(&PackMcmeta {
            pack: PackSection {
                description: &description,
                pack_format: PACK_FORMAT,
            },
        })?;

        Ok(Self {
            mcmeta,
            background: image.clone(),
            icon: image,
        })
    }

    /// Zip the files into a single buffer
    pub fn into_archive(self) -> Result<Vec<u8>, PackError> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for (path, data) in [
            (MCMETA_PATH, &self.mcmeta),
            (ICON_PATH, &self.icon),
            (GUI_BACKGROUND_PATH, &self.background),
        ] {
            zip.start_file(path, options)?;
            zip.write_all(data)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

/// A finished archive and the name it should be saved under
#[derive(Debug, Clone)]
pub struct BuiltPack {
    pub texture: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[must_use]
pub fn archive_file_name(display_name: &str) -> String {
    format!("Options Background {display_name}.zip")
}

/// Download `entry` and package it as an options background pack
pub fn build_pack(fetcher: &dyn Fetch, entry: &TextureFileEntry) -> Result<BuiltPack, PackError> {
    let image = fetcher.get_bytes(&entry.download_url, "image/png")?;
    let display_name = entry.display_name();

    let bytes = GeneratedPackFiles::new(display_name, image)?.into_archive()?;
    crate::logger::logln(&format!(
        "Built pack for {} ({} bytes)",
        entry.name,
        bytes.len()
    ));

    Ok(BuiltPack {
        texture: entry.name.clone(),
        file_name: archive_file_name(display_name),
        bytes,
    })
}

/// Write the archive into `directory`, returning the full path
pub fn save_pack(pack: &BuiltPack, directory: &Path) -> Result<PathBuf, PackError> {
    std::fs::create_dir_all(directory)?;
    let path = directory.join(&pack.file_name);
    std::fs::write(&path, &pack.bytes)?;
    crate::logger::logln(&format!("Saved {}", path.display()));
    Ok(path)
}
