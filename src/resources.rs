//! Loading program images, either from raw bytes, from a single file
//! or from a zip archive full of programs.

use std::{
    fs::File,
    io::{Read, Seek},
    path::Path,
};

use zip::ZipArchive;

use crate::{definitions::memory, error::RomError};

/// A validated program image, ready to be installed at the program
/// start address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rom {
    name: String,
    data: Box<[u8]>,
}

impl Rom {
    /// Builds a rom from raw bytes, rejecting anything that does not
    /// fit into memory. Odd sized images are padded with a single zero
    /// byte so the last opcode can still be fetched whole.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Result<Self, RomError> {
        let mut data = bytes.into();
        if data.len() > memory::PROGRAM_CAPACITY {
            return Err(RomError::TooLarge {
                len: data.len(),
                max: memory::PROGRAM_CAPACITY,
            });
        }
        if data.len() % 2 != 0 {
            data.push(0);
        }
        Ok(Self {
            name: name.into(),
            data: data.into_boxed_slice(),
        })
    }

    /// Reads a rom from disk, named after the file stem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RomError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let rom = Self::new(name, data)?;
        log::debug!("loaded rom '{}' with {} bytes", rom.name(), rom.data().len());
        Ok(rom)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A zip archive of roms, extracted one by one on request.
pub struct RomArchive<R> {
    archive: ZipArchive<R>,
}

impl RomArchive<File> {
    /// Opens an archive from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RomError> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read + Seek> RomArchive<R> {
    /// Wraps any seekable byte source holding a zip archive.
    pub fn new(reader: R) -> Result<Self, RomError> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// The names of all stored programs.
    pub fn file_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.archive.file_names().collect();
        names.sort_unstable();
        names
    }

    /// Extracts a single rom by name.
    pub fn rom(&mut self, name: &str) -> Result<Rom, RomError> {
        let mut file = self.archive.by_name(name)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Rom::new(name, data)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::{write::FileOptions, ZipWriter};

    use super::*;

    #[test]
    fn keeps_even_sized_programs_as_is() {
        let rom = Rom::new("EVEN", vec![0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(rom.name(), "EVEN");
        assert_eq!(rom.data(), &[0x00, 0xE0, 0x12, 0x00]);
    }

    #[test]
    fn pads_odd_sized_programs() {
        let rom = Rom::new("ODD", vec![0x60, 0x01, 0x12]).unwrap();
        assert_eq!(rom.data(), &[0x60, 0x01, 0x12, 0x00]);
    }

    #[test]
    fn rejects_oversized_programs() {
        let err = Rom::new("BIG", vec![0; memory::PROGRAM_CAPACITY + 1]).unwrap_err();
        assert!(matches!(
            err,
            RomError::TooLarge { len, max }
                if len == memory::PROGRAM_CAPACITY + 1 && max == memory::PROGRAM_CAPACITY
        ));
        assert!(Rom::new("FIT", vec![0; memory::PROGRAM_CAPACITY]).is_ok());
    }

    fn archive_bytes() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        writer.start_file("PONG", options).unwrap();
        writer.write_all(&[0x6A, 0x02, 0x6B]).unwrap();
        writer.start_file("MAZE", options).unwrap();
        writer.write_all(&[0xA2, 0x1E, 0xC2, 0x01]).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn lists_archive_entries_sorted() {
        let archive = RomArchive::new(Cursor::new(archive_bytes())).unwrap();
        assert_eq!(archive.file_names(), vec!["MAZE", "PONG"]);
    }

    #[test]
    fn extracts_archive_entries_by_name() {
        let mut archive = RomArchive::new(Cursor::new(archive_bytes())).unwrap();
        let rom = archive.rom("PONG").unwrap();
        assert_eq!(rom.name(), "PONG");
        // Padded to even length on the way out.
        assert_eq!(rom.data(), &[0x6A, 0x02, 0x6B, 0x00]);
        assert!(matches!(archive.rom("TANK"), Err(RomError::Archive(_))));
    }

    #[test]
    fn reads_roms_from_disk() {
        let path = std::env::temp_dir().join("ocho_rom_from_file.ch8");
        std::fs::write(&path, [0x00, 0xE0, 0x12, 0x00]).unwrap();
        let rom = Rom::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(rom.name(), "ocho_rom_from_file");
        assert_eq!(rom.data(), &[0x00, 0xE0, 0x12, 0x00]);
    }
}
