//! Write options for rebuilding archives.

/// Default compression level (maximum Deflate effort).
pub const DEFAULT_LEVEL: u32 = 9;

/// Options controlling how the rebuilt archive is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Compression level (0-9). Level 0 stores entries uncompressed.
    pub level: u32,
    /// Carry DOS timestamps and Unix permissions over from the source.
    pub preserve_metadata: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            preserve_metadata: true,
        }
    }
}

impl WriteOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level (strict validation).
    ///
    /// Valid values are 0-9, where:
    /// - 0 = no compression (Stored)
    /// - 1 = fastest Deflate
    /// - 9 = best Deflate compression (default)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCompressionLevel`] if level is greater than 9.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lovepatch::write::WriteOptions;
    ///
    /// let opts = WriteOptions::new().level(6)?;
    /// assert_eq!(opts.level, 6);
    ///
    /// assert!(WriteOptions::new().level(15).is_err());
    /// # Ok::<(), lovepatch::Error>(())
    /// ```
    ///
    /// [`Error::InvalidCompressionLevel`]: crate::Error::InvalidCompressionLevel
    pub fn level(mut self, level: u32) -> crate::Result<Self> {
        if level > 9 {
            return Err(crate::Error::InvalidCompressionLevel { level });
        }
        self.level = level;
        Ok(self)
    }

    /// Sets whether source timestamps and permissions are carried over.
    pub fn preserve_metadata(mut self, preserve: bool) -> Self {
        self.preserve_metadata = preserve;
        self
    }

    /// Returns the ZIP compression method implied by the level.
    pub fn compression_method(&self) -> zip::CompressionMethod {
        if self.level == 0 {
            zip::CompressionMethod::Stored
        } else {
            zip::CompressionMethod::Deflated
        }
    }
}
