//! Classification of the executable stub in front of the archive.
//!
//! The stub is carried through byte-for-byte and never validated; the
//! format is only reported so users can tell what kind of binary they hold.

/// Executable formats recognized by their magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubFormat {
    /// Windows PE executable (.exe).
    WindowsPe,
    /// Linux ELF binary.
    LinuxElf,
    /// macOS Mach-O binary.
    MacOsMachO,
    /// Anything else, including a missing stub.
    Generic,
}

impl StubFormat {
    /// Detects the format of a stub from its leading bytes.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(b"MZ") {
            return Self::WindowsPe;
        }

        if data.starts_with(b"\x7FELF") {
            return Self::LinuxElf;
        }

        if data.len() >= 4 {
            let magic = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
            if matches!(magic, 0xFEEDFACE | 0xFEEDFACF | 0xCAFEBABE | 0xBEBAFECA) {
                return Self::MacOsMachO;
            }
            let magic_le = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
            if matches!(magic_le, 0xFEEDFACE | 0xFEEDFACF) {
                return Self::MacOsMachO;
            }
        }

        Self::Generic
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WindowsPe => "Windows PE",
            Self::LinuxElf => "Linux ELF",
            Self::MacOsMachO => "macOS Mach-O",
            Self::Generic => "Generic",
        }
    }
}

impl std::fmt::Display for StubFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
