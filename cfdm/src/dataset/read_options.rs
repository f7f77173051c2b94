/// Options for reading a dataset.
///
/// The default values are:
/// - `uncompress`: `true`
/// - `mask`: `true`
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    uncompress: bool,
    mask: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            uncompress: true,
            mask: true,
        }
    }
}

impl ReadOptions {
    /// Return the uncompress setting.
    ///
    /// If disabled, compressed variables are read as stored, spanning their sample dimension.
    #[must_use]
    pub fn uncompress(&self) -> bool {
        self.uncompress
    }

    /// Set whether or not to uncompress compressed variables.
    pub fn set_uncompress(&mut self, uncompress: bool) -> &mut Self {
        self.uncompress = uncompress;
        self
    }

    /// Set whether or not to uncompress compressed variables.
    #[must_use]
    pub fn with_uncompress(mut self, uncompress: bool) -> Self {
        self.uncompress = uncompress;
        self
    }

    /// Return the mask setting.
    #[must_use]
    pub fn mask(&self) -> bool {
        self.mask
    }

    /// Set whether or not to mask fill and missing values.
    pub fn set_mask(&mut self, mask: bool) -> &mut Self {
        self.mask = mask;
        self
    }

    /// Set whether or not to mask fill and missing values.
    #[must_use]
    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }
}
